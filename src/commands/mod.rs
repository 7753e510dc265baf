pub mod carbon;
pub mod clear;
pub mod config;
pub mod export;
pub mod history;
pub mod login;
pub mod recommend;

use agrosmart::advisor::Advisor;
use agrosmart::config::{Config, ENV_PASSWORD};
use agrosmart::fields::ValidationError;
use agrosmart::service::{self, Client, LoginOutcome};
use agrosmart::{HistoryStore, StorageBackend};
use anyhow::{Context, Result};
use colored::*;
use console::Term;
use tracing::debug;

/// Open the history store backing this invocation
pub fn open_history(config: &Config) -> HistoryStore {
    HistoryStore::open(StorageBackend::open_file(config.data_dir()))
}

/// Build the backend client from config
pub fn connect(config: &Config) -> Result<Client> {
    service::connect(config)
        .with_context(|| format!("Failed to set up client for {}", config.server))
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print a validation banner followed by one line per bad field
pub fn report_validation(err: &ValidationError) {
    failure(&err.to_string());
    for problem in &err.problems {
        eprintln!("  - {}", problem);
    }
}

/// Resolve credentials: explicit username, then config, then prompt.
/// The password comes from `AGROSMART_PASSWORD` or a masked prompt.
fn credentials(config: &Config, username: Option<String>) -> Result<(String, String)> {
    let term = Term::stderr();

    let username = match username.or_else(|| config.username.clone()) {
        Some(name) => name,
        None => {
            term.write_str("Username: ")?;
            term.read_line().context("Failed to read username")?
        }
    };

    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) => password,
        Err(_) => {
            term.write_str("Password: ")?;
            term.read_secure_line().context("Failed to read password")?
        }
    };

    Ok((username, password))
}

/// Log in through the advisor, printing the outcome. Returns true when signed in.
pub fn authenticate(
    advisor: &Advisor<'_>,
    config: &Config,
    username: Option<String>,
) -> Result<bool> {
    let (username, password) = credentials(config, username)?;

    match advisor.login(&username, &password) {
        Ok(LoginOutcome::Authenticated { location }) => {
            debug!(%location, "redirected after login");
            success(&format!("Signed in as {}", username.trim()));
            Ok(true)
        }
        Ok(LoginOutcome::Rejected) => {
            failure("Invalid username or password");
            Ok(false)
        }
        Ok(LoginOutcome::Unconfirmed) => {
            warning("The server did not confirm the login");
            Ok(false)
        }
        Err(e) => {
            failure(&e.to_string());
            Ok(false)
        }
    }
}
