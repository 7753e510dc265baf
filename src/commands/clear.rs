use agrosmart::config::Config;
use agrosmart::HistoryStore;
use anyhow::{Context, Result};
use std::io::{self, Write};

const QUESTION: &str = "Are you sure you want to clear all recommendation history?";

/// Empty the recommendation history after confirmation
pub fn execute(config: &Config, yes: bool) -> Result<i32> {
    let mut history = super::open_history(config);
    let interactive = atty::is(atty::Stream::Stdin);
    clear_history(&mut history, yes, interactive, || confirm(QUESTION))
}

/// Clear once the user has agreed: `--yes`, or a confirmed prompt on a terminal
fn clear_history<F>(
    history: &mut HistoryStore,
    yes: bool,
    interactive: bool,
    ask: F,
) -> Result<i32>
where
    F: FnOnce() -> Result<bool>,
{
    if !yes {
        if !interactive {
            super::failure("Refusing to clear history without a terminal; pass --yes");
            return Ok(1);
        }
        if !ask()? {
            println!("History kept.");
            return Ok(0);
        }
    }

    history.clear().context("Failed to clear history")?;
    super::success("History cleared successfully");
    Ok(0)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    let answer = response.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
