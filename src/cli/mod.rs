//! CLI module for gamebuster-auth
//!
//! - `serve`: run the HTTP host with bearer authentication
//! - `issue`: print a freshly signed access token

pub mod issue;
pub mod serve;

use clap::{Parser, Subcommand};

/// Gamebuster JWT authentication service
#[derive(Parser)]
#[command(name = "gamebuster-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Issue an access token for the given claims
    Issue(issue::IssueArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_issue() {
        let cli = Cli::try_parse_from([
            "gamebuster-auth",
            "issue",
            "--sub",
            "u1",
            "--name",
            "Ann",
            "--email",
            "ann@example.com",
            "--claim",
            "role=admin",
        ])
        .unwrap();

        match cli.command {
            Command::Issue(args) => {
                assert_eq!(args.sub, "u1");
                assert_eq!(args.claims, vec![("role".to_string(), "admin".to_string())]);
            }
            Command::Serve => panic!("expected issue"),
        }
    }
}
