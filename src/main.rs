use clap::Parser;
use gradewatch::{cli, errors};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        cli::Commands::Scan(args) => cli::scan::handle_scan(args).await,
        cli::Commands::Watch(args) => cli::watch::handle_watch(args).await,
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::Grade(args) => cli::grade::handle_grade(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            errors::GradewatchError::Config(_) | errors::GradewatchError::Yaml(_) => 2,
            errors::GradewatchError::ScanService(_)
            | errors::GradewatchError::Transport(_)
            | errors::GradewatchError::MalformedResponse(_)
            | errors::GradewatchError::PollLimit(_) => 3,
            errors::GradewatchError::SessionNotFound(_) => 4,
            errors::GradewatchError::InvalidTarget(_) | errors::GradewatchError::InvalidGrade(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
