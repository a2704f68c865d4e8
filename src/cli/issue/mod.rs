//! Issue command - signs a token with the configured options

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{ClaimSet, TokenIssuer};
use crate::infrastructure::auth::JwtService;

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Subject identifier
    #[arg(long)]
    pub sub: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub birthdate: Option<String>,

    #[arg(long)]
    pub gender: Option<String>,

    /// Picture URL
    #[arg(long)]
    pub picture: Option<String>,

    #[arg(long)]
    pub locale: Option<String>,

    /// Extra claim as NAME=VALUE, repeatable
    #[arg(long = "claim", value_parser = parse_claim)]
    pub claims: Vec<(String, String)>,
}

impl IssueArgs {
    fn into_claim_set(self) -> ClaimSet {
        let mut claims = ClaimSet::new(self.sub, self.name, self.email);
        claims.birthdate = self.birthdate;
        claims.gender = self.gender;
        claims.picture = self.picture;
        claims.locale = self.locale;
        claims.additional.extend(self.claims);
        claims
    }
}

fn parse_claim(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

/// Print a token for the given claims to stdout
pub fn run(args: IssueArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let service = JwtService::with_system_clock(config.jwt);
    let token = service.generate(&args.into_claim_set())?;

    println!("{}", token);
    Ok(())
}
