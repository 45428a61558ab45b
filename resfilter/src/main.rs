use resfilter::commands::command_argument_builder;
use resfilter::handlers;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    // Show banner unless --quiet flag is set
    if !matches.get_flag("quiet") {
        handlers::print_banner();
    }

    handlers::handle_run(&matches).await;
}
