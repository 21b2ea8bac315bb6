//! Backend paths, relative to the API base URL.

pub const REGISTER: &str = "/auth/register";
pub const LOGIN: &str = "/auth/login";
pub const ME: &str = "/auth/me";

pub const INSTAGRAM_AUTH_URL: &str = "/instagram/auth-url";
pub const INSTAGRAM_CONNECT: &str = "/instagram/connect";
pub const INSTAGRAM_ACCOUNTS: &str = "/instagram/accounts";

pub const CONTENT: &str = "/content";
pub const GENERATE_CONTENT: &str = "/content/generate";

pub const SCHEDULE: &str = "/schedule";

pub fn instagram_account(account_id: i64) -> String {
    format!("{}/{}", INSTAGRAM_ACCOUNTS, account_id)
}

pub fn insights(account_id: i64) -> String {
    format!("/insights/{}", account_id)
}

pub fn analyze_with_goal(account_id: i64) -> String {
    format!("/insights/{}/analyze", account_id)
}

pub fn content_item(content_id: i64) -> String {
    format!("{}/{}", CONTENT, content_id)
}

pub fn approve_content(content_id: i64) -> String {
    format!("{}/{}/approve", CONTENT, content_id)
}

pub fn scheduled_post(schedule_id: i64) -> String {
    format!("{}/{}", SCHEDULE, schedule_id)
}

/// OAuth code-exchange callback for a provider (`google`, `facebook`, `apple`)
pub fn oauth_callback(provider: &str) -> String {
    format!("/auth/{}/callback", provider)
}
