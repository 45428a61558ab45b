use crate::CLAP_STYLING;
use clap::arg;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("resfilter")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("resfilter")
        .styles(CLAP_STYLING)
        .about(
            "Scrapes domains from selected MediaBiasFactCheck bias categories and merges \
            them into a Reddit Enhancement Suite domain-filter backup.",
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .help("Path to the RES backup file (.resbackup); prompted for when omitted"),
        )
        .arg(
            arg!(-s --"select" <DIGITS>)
                .required(false)
                .help(
                    "Category selection as digits 1-9 without separators, e.g. \"158\"; \
                    prompted for interactively when omitted",
                ),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the merged document (default: overwrite the input)"),
        )
        .arg(
            arg!(--"cache" <PATH>)
                .required(false)
                .help("Site map cache location")
                .default_value("~/.config/resfilter/sitemap.json"),
        )
        .arg(
            arg!(--"skip-backup")
                .required(false)
                .help("Skip the manual RES settings backup reminder")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress banner and progress spinner")
                .required(false)
                .action(clap::ArgAction::SetTrue),
        )
}
