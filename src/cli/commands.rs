use clap::{Parser, Subcommand, Args};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_TIMESTAMP"), ")");

#[derive(Parser)]
#[command(
    name = "gradewatch",
    version,
    long_version = LONG_VERSION,
    about = "Watch the TLS grades of the hosts you browse"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan hosts and print their worst-case grade
    Scan(ScanArgs),
    /// Drive the watcher from a stream of browser events
    Watch(WatchArgs),
    /// Start the HTTP API for a browser extension
    Serve(ServeArgs),
    /// Print the numeric scale of letter grades
    Grade(GradeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Hostnames or URLs to scan
    #[arg(required = true)]
    pub hosts: Vec<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Accept cached scan results up to this many hours old
    #[arg(long)]
    pub max_age: Option<u32>,

    /// Keep results off the public scan boards
    #[arg(long)]
    pub no_publish: bool,

    /// Scan even if the certificate does not match the hostname
    #[arg(long)]
    pub ignore_mismatch: bool,

    /// Replay scan responses from a JSON file instead of calling the API
    #[arg(long)]
    pub replay: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct WatchArgs {
    /// JSON-lines event file (default: stdin)
    #[arg(short, long)]
    pub events: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Replay scan responses from a JSON file instead of calling the API
    #[arg(long)]
    pub replay: Option<String>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Replay scan responses from a JSON file instead of calling the API
    #[arg(long)]
    pub replay: Option<String>,
}

#[derive(Args, Clone)]
pub struct GradeArgs {
    /// Letter grades, e.g. A+ B T
    #[arg(required = true)]
    pub letters: Vec<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::parse_from([
            "gradewatch", "-vv", "scan", "a.com", "b.com", "--max-age", "1", "--no-publish",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.hosts, vec!["a.com", "b.com"]);
                assert_eq!(args.max_age, Some(1));
                assert!(args.no_publish);
                assert!(!args.ignore_mismatch);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_requires_host() {
        assert!(Cli::try_parse_from(["gradewatch", "scan"]).is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["gradewatch", "serve"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8080);
                assert_eq!(args.host, "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }
}
