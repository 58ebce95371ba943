use std::path::PathBuf;

use clap::Parser;

/// Command-line flags for the `scf-server` binary. Flags override the
/// layered configuration.
#[derive(Debug, Parser)]
#[command(name = "scf-server", version, about = "SCF project bootstrapping service")]
pub struct Cli {
    /// Extra TOML config file, layered above discovered files
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database path (`:memory:` for a throwaway database)
    #[arg(long)]
    pub db: Option<String>,

    /// Listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// JSON catalog file (risks, threats, framework mappings) to import at startup
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Create an organization with this name at startup and log its id
    #[arg(long)]
    pub seed_org: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "scf-server",
            "--db",
            ":memory:",
            "--port",
            "9090",
            "--seed-org",
            "Acme",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some(":memory:"));
        assert_eq!(cli.port, Some(9090));
        assert_eq!(cli.seed_org.as_deref(), Some("Acme"));
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Cli::try_parse_from(["scf-server", "--port", "70000"]).is_err());
    }
}
