//! Terminal input: credentials and the OAuth consent round trip.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use instaai_core::oauth::{AuthorizationAttempt, ConsentOutcome, ConsentPrompt};

pub fn read_line(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

pub fn read_password(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

/// Consent step for a terminal: print the provider URL, then read back the
/// URL the browser was redirected to. An empty line cancels.
pub struct TerminalPrompt;

#[async_trait]
impl ConsentPrompt for TerminalPrompt {
    async fn request_consent(&self, attempt: &AuthorizationAttempt) -> ConsentOutcome {
        eprintln!(
            "Open this URL to sign in with {}:\n\n  {}\n",
            attempt.provider().display_name(),
            attempt.url()
        );

        let line = tokio::task::spawn_blocking(|| {
            read_line("Paste the URL you were redirected to (empty to cancel): ")
        })
        .await;

        match line {
            Ok(Ok(line)) => redirect_outcome(&line),
            Ok(Err(e)) => ConsentOutcome::Error {
                message: e.to_string(),
            },
            Err(e) => ConsentOutcome::Error {
                message: format!("Input task failed: {}", e),
            },
        }
    }
}

fn redirect_outcome(line: &str) -> ConsentOutcome {
    if line.trim().is_empty() {
        ConsentOutcome::Cancelled
    } else {
        ConsentOutcome::from_redirect_url(line)
    }
}
