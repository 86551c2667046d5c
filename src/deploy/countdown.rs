//! Pre-commit countdown: a cooperative delay that doubles as the operator's
//! abort window. Cancelling the token (Ctrl-C, or programmatically) stops
//! the countdown and the commit is skipped.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Tick down `seconds`, returning false as soon as `token` is cancelled.
pub async fn wait_or_abort(seconds: u64, token: &CancellationToken) -> bool {
    for remaining in (1..=seconds).rev() {
        info!(remaining, "commit pending, Ctrl-C aborts");
        tokio::select! {
            _ = token.cancelled() => return false,
            _ = sleep(Duration::from_secs(1)) => {}
        }
    }
    !token.is_cancelled()
}

/// Run the countdown wired to Ctrl-C. True means proceed with the commit.
pub async fn run(seconds: u64) -> bool {
    if seconds == 0 {
        return true;
    }
    let token = CancellationToken::new();
    tokio::select! {
        proceed = wait_or_abort(seconds, &token) => proceed,
        _ = tokio::signal::ctrl_c() => {
            token.cancel();
            info!("commit aborted by operator");
            false
        }
    }
}
