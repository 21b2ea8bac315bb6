//! Subcommand handlers.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use futures::future::join_all;
use instaai_core::models::NewScheduledPost;
use instaai_core::{
    ApiClient, Config, OAuthFlow, OAuthProvider, OnboardingStatus, RegisterRequest,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::prompt::{read_line, read_password, TerminalPrompt};
use crate::{OnboardingAction, ScheduleCommands};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn register(api: &ApiClient, email: &str, name: Option<String>) -> Result<()> {
    let full_name = match name {
        Some(name) => name,
        None => read_line("Full name: ")?,
    };
    let password = read_password("Password: ")?;
    let confirm = read_password("Confirm password: ")?;

    let request = RegisterRequest::new(email, password, full_name).with_confirmation(confirm);
    let auth = api.register(&request).await?;
    eprintln!("Welcome, {}!", auth.user.display_name());
    print_json(&auth.user)
}

pub async fn login(api: &ApiClient, email: &str) -> Result<()> {
    let password = read_password("Password: ")?;
    let auth = api.login(email, &password).await?;
    eprintln!("Signed in as {}", auth.user.display_name());
    Ok(())
}

pub async fn logout(api: &ApiClient) -> Result<()> {
    api.logout().await.context("Failed to clear stored session")?;
    eprintln!("Signed out");
    Ok(())
}

pub async fn whoami(api: &ApiClient) -> Result<()> {
    if !api.is_authenticated() {
        bail!("Not signed in. Run `instaai login` first.");
    }
    print_json(&api.refresh_profile().await?)
}

pub fn status(api: &ApiClient, config: &Config) -> Result<()> {
    let onboarding = match api.store().onboarding_status() {
        OnboardingStatus::Seen => "seen",
        OnboardingStatus::NotSeen => "not seen",
        OnboardingStatus::Unavailable => "unavailable",
    };
    let oauth = config.oauth_settings();
    let providers: Vec<&str> = OAuthProvider::ALL
        .iter()
        .filter(|p| oauth.is_configured(**p))
        .map(|p| p.as_str())
        .collect();

    print_json(&json!({
        "authenticated": api.is_authenticated(),
        "user": api.stored_user(),
        "onboarding": onboarding,
        "api_base_url": api.base_url(),
        "platform": oauth.platform(),
        "oauth_providers": providers,
    }))
}

pub async fn oauth(api: &ApiClient, config: &Config, provider: OAuthProvider) -> Result<()> {
    let flow = OAuthFlow::new(api.clone(), config.oauth_settings());
    let result = flow.sign_in(provider, &TerminalPrompt).await;

    if result.is_cancelled() {
        eprintln!("Sign-in cancelled");
        return Ok(());
    }
    if !result.success {
        bail!(
            "{} sign-in failed: {}",
            provider.display_name(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    // The exchange only returns a minimal profile; cache the full one
    if let Err(e) = api.refresh_profile().await {
        warn!(error = %e, "Signed in but could not load profile");
    }
    eprintln!("Signed in with {}", provider.display_name());
    print_json(&result)
}

pub async fn connect(api: &ApiClient, code: Option<String>) -> Result<()> {
    let code = match code {
        Some(code) => code,
        None => {
            let auth = api.instagram_auth_url().await?;
            eprintln!("Authorize Instagram access here:\n\n  {}\n", auth.authorization_url);
            read_line("Authorization code: ")?
        }
    };
    if code.is_empty() {
        bail!("No authorization code given");
    }

    let account = api.connect_instagram(&code).await?;
    eprintln!("Linked {}", account.handle());
    print_json(&account)
}

pub async fn schedule(api: &ApiClient, cmd: ScheduleCommands) -> Result<()> {
    match cmd {
        ScheduleCommands::List { account_id, status } => {
            print_json(&api.scheduled_posts(account_id, status.as_deref()).await?)
        }
        ScheduleCommands::Add {
            content_id,
            account_id,
            time,
            caption,
        } => {
            let mut post = NewScheduledPost::new(content_id, account_id, time);
            if let Some(caption) = caption {
                post = post.with_caption(caption);
            }
            print_json(&api.schedule_post(&post).await?)
        }
        ScheduleCommands::Cancel { schedule_id } => {
            api.cancel_scheduled_post(schedule_id).await?;
            eprintln!("Cancelled scheduled post {}", schedule_id);
            Ok(())
        }
    }
}

/// Accounts and content are fetched together, then each account's schedule.
pub async fn dashboard(api: &ApiClient) -> Result<()> {
    let (accounts, content) = futures::try_join!(api.instagram_accounts(), api.content(None))?;

    let schedules = join_all(
        accounts
            .iter()
            .map(|account| api.scheduled_posts(account.id, Some("pending"))),
    )
    .await;

    let accounts_summary: Vec<_> = accounts
        .iter()
        .zip(schedules)
        .map(|(account, scheduled)| {
            let upcoming = match scheduled {
                Ok(posts) => json!(posts.len()),
                Err(e) => {
                    warn!(account_id = account.id, error = %e, "Could not load schedule");
                    serde_json::Value::Null
                }
            };
            json!({
                "id": account.id,
                "handle": account.handle(),
                "followers": account.followers_count,
                "upcoming_posts": upcoming,
            })
        })
        .collect();

    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &content {
        *by_status.entry(item.status.as_str()).or_default() += 1;
    }
    let awaiting_review = content.iter().filter(|c| c.status.is_reviewable()).count();

    print_json(&json!({
        "user": api.stored_user(),
        "accounts": accounts_summary,
        "content": {
            "total": content.len(),
            "by_status": by_status,
            "awaiting_review": awaiting_review,
        },
    }))
}

pub fn onboarding(api: &ApiClient, action: OnboardingAction) -> Result<()> {
    let store = api.store();
    match action {
        OnboardingAction::Show => {
            let status = store.onboarding_status();
            let seen = match status {
                OnboardingStatus::Seen => json!(true),
                OnboardingStatus::NotSeen => json!(false),
                OnboardingStatus::Unavailable => serde_json::Value::Null,
            };
            print_json(&json!({ "seen": seen }))
        }
        OnboardingAction::Done => {
            store
                .mark_onboarding_seen()
                .context("Failed to save onboarding flag")?;
            eprintln!("Onboarding marked as seen");
            Ok(())
        }
        OnboardingAction::Reset => {
            store
                .reset_onboarding()
                .context("Failed to reset onboarding flag")?;
            eprintln!("Onboarding will show again");
            Ok(())
        }
    }
}

