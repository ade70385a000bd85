use async_trait::async_trait;
use tracing::info;

use crate::account::masking::mask_email;

/// Delivers password-reset links. Swapped at startup like the guide generator.
#[async_trait]
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(&self, email: &str, link: &str) -> anyhow::Result<()>;
}

/// Writes the link to the structured log. Used until a mail transport is configured.
pub struct LogResetNotifier;

#[async_trait]
impl ResetNotifier for LogResetNotifier {
    async fn send_reset_link(&self, email: &str, link: &str) -> anyhow::Result<()> {
        info!(to = %mask_email(email), %link, "Password reset link issued");
        Ok(())
    }
}

/// Builds `<redirect>?token=<token>`, appending with `&` when the redirect
/// already carries a query string.
pub fn reset_link(redirect_url: &str, token: &str) -> String {
    let sep = if redirect_url.contains('?') { '&' } else { '?' };
    format!("{redirect_url}{sep}token={token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_query_joining() {
        assert_eq!(
            reset_link("http://localhost:5173/reset-password", "abc"),
            "http://localhost:5173/reset-password?token=abc"
        );
        assert_eq!(
            reset_link("https://anchor.app/reset?lang=es", "abc"),
            "https://anchor.app/reset?lang=es&token=abc"
        );
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        LogResetNotifier
            .send_reset_link("maria@example.org", "https://x/reset?token=t")
            .await
            .unwrap();
    }
}
