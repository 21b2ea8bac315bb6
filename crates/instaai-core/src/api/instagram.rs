use serde::Serialize;
use tracing::info;

use super::{endpoints, ApiClient, ApiError};
use crate::models::{InstagramAccount, InstagramAuthUrl};

#[derive(Serialize)]
struct ConnectBody<'a> {
    authorization_code: &'a str,
}

impl ApiClient {
    /// Authorization URL for linking an Instagram account
    pub async fn instagram_auth_url(&self) -> Result<InstagramAuthUrl, ApiError> {
        self.get(endpoints::INSTAGRAM_AUTH_URL).await
    }

    /// Exchange an Instagram authorization code for a linked account
    pub async fn connect_instagram(
        &self,
        authorization_code: &str,
    ) -> Result<InstagramAccount, ApiError> {
        let body = ConnectBody { authorization_code };
        let account: InstagramAccount = self.post(endpoints::INSTAGRAM_CONNECT, &body).await?;
        info!(account_id = account.id, username = %account.username, "Linked Instagram account");
        Ok(account)
    }

    pub async fn instagram_accounts(&self) -> Result<Vec<InstagramAccount>, ApiError> {
        self.get(endpoints::INSTAGRAM_ACCOUNTS).await
    }

    pub async fn disconnect_instagram(&self, account_id: i64) -> Result<(), ApiError> {
        self.delete(&endpoints::instagram_account(account_id)).await?;
        info!(account_id, "Unlinked Instagram account");
        Ok(())
    }
}
