use crate::attempt::Attempt;
use crate::burst::{BurstSummary, burst};
use crate::credentials::Wordlists;
use crate::endpoint::Endpoint;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// FleetSummary collects each endpoint's burst, in target order
#[derive(Debug, Default, Clone)]
pub struct FleetSummary {
    pub bursts: Vec<(Endpoint, BurstSummary)>,
}

impl FleetSummary {
    pub fn launched(&self) -> usize {
        self.bursts.iter().map(|(_, s)| s.launched).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.bursts.iter().map(|(_, s)| s.succeeded).sum()
    }

    /// Endpoints with at least one working credential
    pub fn cracked(&self) -> impl Iterator<Item = &Endpoint> {
        self.bursts
            .iter()
            .filter(|(_, s)| s.succeeded > 0)
            .map(|(e, _)| e)
    }
}

/// run starts one burst per endpoint, all concurrently, each with its own
/// budget and cancellation. `max_hosts` optionally caps how many
/// endpoints are worked on at once. Returns when every burst is done.
pub async fn run<A: Attempt>(
    endpoints: Vec<Endpoint>,
    wordlists: Wordlists,
    attempt: Arc<A>,
    budget: usize,
    max_hosts: Option<usize>,
) -> FleetSummary {
    let host_limiter = max_hosts.map(|n| Arc::new(Semaphore::new(n.max(1))));

    info!(
        "probing {} endpoint(s), {} credential pair(s) each, {} in flight per endpoint",
        endpoints.len(),
        wordlists.combinations(),
        budget
    );

    let mut handles = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let wordlists = wordlists.clone();
        let attempt = Arc::clone(&attempt);
        let host_limiter = host_limiter.clone();
        let target = endpoint.clone();

        let handle = tokio::spawn(async move {
            // Held for the whole burst when a host cap is set
            let _slot = match host_limiter {
                Some(limiter) => limiter.acquire_owned().await.ok(),
                None => None,
            };

            // DEBUG
            debug!("burst starting on {}", target);

            burst(target, &wordlists, attempt, budget).await
        });
        handles.push((endpoint, handle));
    }

    let mut summary = FleetSummary::default();
    for (endpoint, handle) in handles {
        // A burst that dies counts as an exhausted endpoint with no hits
        let burst = handle.await.unwrap_or_else(|e| {
            warn!("burst on {} failed: {}", endpoint, e);
            BurstSummary::default()
        });
        summary.bursts.push((endpoint, burst));
    }

    info!(
        "finished: {} attempt(s), {} success(es) across {} endpoint(s)",
        summary.launched(),
        summary.succeeded(),
        summary.bursts.len()
    );

    summary
}
