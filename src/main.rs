use clap::Parser;
use printfleet::cli::{Cli, Commands};
use printfleet::config::AppSettings;
use printfleet::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so formatted output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("printfleet=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Scan(cmd) => cmd.execute(&settings, cli.verbose, cli.quiet).await,
        Commands::Provision(cmd) => cmd.execute(&settings, cli.quiet).await,
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
