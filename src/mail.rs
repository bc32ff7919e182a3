use async_trait::async_trait;
use tracing::{error, info};

use crate::state::AppState;

/// Outbound mail collaborator. Delivery transport lives outside this
/// service; the contract is fire-and-forget from the caller's perspective.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_email(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Default implementation: record the send in the log stream. Swapped for a
/// real transport at the composition root without touching callers.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_email(&self, to: &str, code: &str) -> anyhow::Result<()> {
        info!(%to, %code, "verification email queued");
        Ok(())
    }
}

/// Spawn the verification mail without awaiting it. Delivery failure is
/// logged, never surfaced to the request that triggered it.
pub fn send_verification(state: &AppState, to: String, code: String) {
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification_email(&to, &code).await {
            error!(error = %e, %to, "verification email failed");
        }
    });
}
