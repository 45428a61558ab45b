use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use resfilter_core::catalog::{self, CATALOG, Category};
use resfilter_core::run::{RunCategory, RunOptions, RunProgressCallback, execute_run};
use resfilter_core::{FilterDocument, SiteMap, generate_run_report, merge};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const BACKUP_SETTINGS_URL: &str = "https://old.reddit.com/r/all/#res:settings/backupAndRestore";

pub fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!("{}", "  RES DOMAIN FILTERER".bright_white().bold());
    println!(
        "{}",
        "  MediaBiasFactCheck.com -> RES domain filters".bright_blue()
    );
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> String {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().unwrap();
    let mut response = String::new();
    io::stdin().read_line(&mut response).unwrap();
    response.trim().to_string()
}

/// Tilde-expand a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// The merged document overwrites the input unless -o says otherwise.
pub fn output_path(config: &Path, output_arg: Option<&String>) -> PathBuf {
    match output_arg {
        Some(raw) => expand_path(raw),
        None => config.to_path_buf(),
    }
}

/// Resolve the category selection, prompting interactively when the
/// --select flag was omitted.
pub fn select_categories(select_arg: Option<&String>) -> Result<Vec<&'static Category>, String> {
    if let Some(digits) = select_arg {
        return catalog::parse_selection(digits).map_err(|e| e.to_string());
    }

    println!("\nFilter options:");
    for category in &CATALOG {
        println!("  {}. {}", category.id, category.title);
    }
    println!("\nEnter the filters you'd like to create. For multiple filters, enter the");
    println!("digits without spaces or commas, e.g. \"158\" for Left Bias, Right Bias");
    println!("and Questionable Sources.");

    let response = print_prompt("\nEnter your desired filters:");
    catalog::parse_selection(&response).map_err(|e| e.to_string())
}

fn backup_reminder() {
    println!();
    println!("{}", "⚠ BACK UP YOUR RES SETTINGS FIRST".yellow().bold());
    println!("Open the RES settings console and save a backup file before continuing:");
    println!("  {}", BACKUP_SETTINGS_URL.bright_white());
    print_prompt("Press ENTER once your settings are backed up (or use --skip-backup):");
}

pub async fn handle_run(matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let quiet = matches.get_flag("quiet");
    let skip_backup = matches.get_flag("skip-backup");
    let timeout_secs = *matches.get_one::<u64>("timeout").unwrap_or(&10);

    if !skip_backup {
        backup_reminder();
    }

    // The filter document is the one thing we cannot proceed without.
    let config_path = match matches.get_one::<String>("config") {
        Some(raw) => expand_path(raw),
        None => {
            let raw = print_prompt("Path to your RES backup file (probably in Downloads):");
            expand_path(&raw)
        }
    };
    let mut document = match FilterDocument::read(&config_path) {
        Ok(document) => {
            info!("Loaded filter document from {}", config_path.display());
            document
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    let categories = match select_categories(matches.get_one::<String>("select")) {
        Ok(categories) => categories,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !quiet {
        println!("\nYou selected:");
        for category in &categories {
            println!("  {}. {}", category.id, category.title);
        }
        println!();
    }

    let cache_path = expand_path(matches.get_one::<String>("cache").unwrap());
    let mut site_map = SiteMap::load(&cache_path);
    if !quiet && !site_map.is_empty() {
        println!(
            "{} {} previously resolved listing(s) in the site map",
            "ℹ".blue(),
            site_map.len()
        );
    }

    let already_filtered: HashSet<String> = document.domains().into_iter().collect();

    // Spinner + progress callback, CLI-side only.
    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };
    let progress: Option<RunProgressCallback> = spinner.clone().map(|pb| {
        Arc::new(move |msg: String| pb.set_message(msg)) as RunProgressCallback
    });

    let mut options = RunOptions::new(categories.iter().map(|c| RunCategory::from(*c)).collect());
    options.timeout_secs = timeout_secs;

    let summary = match execute_run(options, &already_filtered, &mut site_map, progress).await {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(pb) = &spinner {
                pb.finish_and_clear();
            }
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    // Cached hosts join the merge input so listings skipped by the scanner
    // still land in a freshly restored document.
    let mut merge_input = summary.new_hosts.clone();
    merge_input.extend(site_map.hosts());

    let out_path = output_path(&config_path, matches.get_one::<String>("output"));

    // Snapshot the pre-merge document before anything gets overwritten.
    if let Err(e) = document.write_backup_copy(&out_path) {
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }

    let rules_added = match merge(&mut document, &merge_input) {
        Ok(added) => added,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = document.write(&out_path) {
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "\n{} Merged document written to {}",
        "✓".green().bold(),
        out_path.display().to_string().bright_white()
    );
    print!("{}", generate_run_report(&summary, rules_added));
    println!("Restore the merged file through the same RES settings console to apply it.");
}
