use crate::attempt::Attempt;
use crate::credentials::Wordlists;
use crate::endpoint::Endpoint;
use std::sync::Arc;
use tokio::{select, sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// BurstSummary is what one endpoint's burst did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurstSummary {
    /// Attempts actually started
    pub launched: usize,
    /// Attempts that authenticated
    pub succeeded: usize,
    /// Scheduling stopped early because of a success
    pub cancelled: bool,
}

/// burst tries every username x password pair against one endpoint with
/// at most `budget` attempts in flight. The first success stops further
/// scheduling; attempts already running are left to finish. Returns once
/// every launched attempt has completed.
pub async fn burst<A: Attempt>(
    endpoint: Endpoint,
    wordlists: &Wordlists,
    attempt: Arc<A>,
    budget: usize,
) -> BurstSummary {
    let endpoint = Arc::new(endpoint);
    let token = CancellationToken::new();
    let limiter = Arc::new(Semaphore::new(budget.max(1)));
    let mut tasks = JoinSet::new();
    let mut summary = BurstSummary::default();

    for credential in wordlists.pairs() {
        // Cancellation wins over a freed permit
        let permit = select! {
            biased;
            _ = token.cancelled() => break,
            permit = Arc::clone(&limiter).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let endpoint = Arc::clone(&endpoint);
        let attempt = Arc::clone(&attempt);
        let token = token.clone();
        summary.launched += 1;

        tasks.spawn(async move {
            let ok = attempt.try_login(&endpoint, &credential).await;
            if ok {
                token.cancel();
            }
            // Release only after cancelling so the scheduler sees the success
            drop(permit);
            ok
        });
    }

    // Draining
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => summary.succeeded += 1,
            Ok(false) => {}
            Err(e) => warn!("attempt against {} aborted: {}", endpoint, e),
        }
    }

    summary.cancelled = token.is_cancelled();

    // DEBUG
    debug!(
        "burst on {} done: {} launched, {} succeeded",
        endpoint, summary.launched, summary.succeeded
    );
    if summary.cancelled {
        info!("{}: credentials found, stopped after {} attempts", endpoint, summary.launched);
    }

    summary
}
