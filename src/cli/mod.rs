//! CLI module for Analytics Relay
//!
//! `serve` (the default) runs the HTTP server.

pub mod serve;

use clap::{Parser, Subcommand};

pub use serve::ServeArgs;

/// Analytics Relay - resolves usable statistics JSON from an analytics deployment
#[derive(Parser)]
#[command(name = "analytics-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve(ServeArgs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::parse_from(["analytics-relay"]);

        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Serve(args) if args.port.is_none()));
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::parse_from(["analytics-relay", "serve", "--port", "9000"]);

        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(9000));
    }
}
