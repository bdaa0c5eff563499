//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// confvault - Versioned configuration backups for FortiGate firewalls
#[derive(Parser, Debug)]
#[command(name = "confvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Back up a single device
    ///
    /// The password is read from an environment variable, never from the
    /// command line.
    ///
    /// Examples:
    ///   confvault capture --address 10.0.0.5 --username backup
    ///   confvault capture --address fw1.lab --port 8443 --username admin --insecure
    Capture(CaptureArgs),

    /// Back up every device listed in a settings file
    Run {
        /// Settings file (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show recorded revisions of a device
    History {
        /// Device address
        #[arg(short, long)]
        address: String,

        /// Backup root directory
        #[arg(short, long, default_value = "backups")]
        root: PathBuf,

        /// Maximum number of revisions to show
        #[arg(short = 'n', long = "max-count", default_value_t = 10)]
        max_count: usize,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CaptureArgs {
    /// Device host name or IP address
    #[arg(short, long)]
    pub address: String,

    /// HTTPS management port
    #[arg(short, long, default_value_t = confvault_api::DEFAULT_HTTPS_PORT)]
    pub port: u16,

    /// Administrator account
    #[arg(short, long)]
    pub username: String,

    /// Environment variable holding the password
    #[arg(long, default_value = "CONFVAULT_PASSWORD")]
    pub password_env: String,

    /// Backup root directory
    #[arg(short, long, default_value = "backups")]
    pub root: PathBuf,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Talk plain HTTP (lab devices only)
    #[arg(long, hide = true)]
    pub plain_http: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_capture_defaults() {
        let cli = Cli::parse_from([
            "confvault",
            "capture",
            "--address",
            "10.0.0.5",
            "--username",
            "admin",
        ]);

        let Commands::Capture(args) = cli.command else {
            panic!("Expected Capture command");
        };
        assert_eq!(args.address, "10.0.0.5");
        assert_eq!(args.port, 443);
        assert_eq!(args.password_env, "CONFVAULT_PASSWORD");
        assert_eq!(args.root, PathBuf::from("backups"));
        assert!(!args.insecure);
        assert!(!args.plain_http);
    }

    #[test]
    fn parse_capture_overrides() {
        let cli = Cli::parse_from([
            "confvault",
            "capture",
            "-a",
            "fw1",
            "-p",
            "8443",
            "-u",
            "backup",
            "--password-env",
            "FW1_PASSWORD",
            "--root",
            "/srv/backups",
            "--insecure",
        ]);

        let Commands::Capture(args) = cli.command else {
            panic!("Expected Capture command");
        };
        assert_eq!(args.port, 8443);
        assert_eq!(args.password_env, "FW1_PASSWORD");
        assert_eq!(args.root, PathBuf::from("/srv/backups"));
        assert!(args.insecure);
    }

    #[test]
    fn capture_requires_username() {
        let result = Cli::try_parse_from(["confvault", "capture", "--address", "10.0.0.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_run_command() {
        let cli = Cli::parse_from(["confvault", "run", "--config", "fleet.toml", "--json"]);
        assert_eq!(
            cli.command,
            Commands::Run {
                config: PathBuf::from("fleet.toml"),
                json: true
            }
        );
    }

    #[test]
    fn parse_history_command() {
        let cli = Cli::parse_from(["confvault", "history", "-a", "10.0.0.5", "-n", "3"]);
        assert_eq!(
            cli.command,
            Commands::History {
                address: "10.0.0.5".into(),
                root: PathBuf::from("backups"),
                max_count: 3,
                json: false
            }
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["confvault", "run", "-c", "fleet.toml", "--verbose"]);
        assert!(cli.verbose);
    }
}
