//! Background sweep of expired cache entries and idle rate-limit buckets.
//!
//! Lookups already ignore expired entries; the sweep only reclaims memory
//! for keys nobody asks for again.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::main_lib::AppState;

/// Starts the periodic cache sweeper.
pub fn start_cache_sweeper(state: Arc<AppState>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Cache sweeper started ({:?} interval)", every);

        let mut sweep_interval = interval(every);
        sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; nothing can have expired yet.
        sweep_interval.tick().await;

        loop {
            sweep_interval.tick().await;
            run_sweep(&state);
        }
    })
}

fn run_sweep(state: &AppState) {
    let purged = state.hospital_service.purge_expired_cache();
    let pruned = state.rate_limiter.prune_idle();
    if purged > 0 || pruned > 0 {
        info!(
            "Sweep removed {} expired cache entries and {} idle clients",
            purged, pruned
        );
    } else {
        debug!("Sweep found nothing to remove");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::ClientRateLimiter;
    use async_trait::async_trait;
    use hospitals::{HospitalServiceTrait, HospitalsResponse, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingService {
        purges: AtomicUsize,
    }

    #[async_trait]
    impl HospitalServiceTrait for CountingService {
        async fn get_hospitals(&self, _wilaya: &str, _limit: u32) -> Result<HospitalsResponse> {
            unreachable!("the sweeper never queries")
        }

        fn purge_expired_cache(&self) -> usize {
            self.purges.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_every_interval() {
        let service = Arc::new(CountingService::default());
        let state = Arc::new(AppState {
            hospital_service: service.clone(),
            rate_limiter: Arc::new(ClientRateLimiter::new(30)),
        });

        let handle = start_cache_sweeper(state, Duration::from_secs(600));
        tokio::time::sleep(Duration::from_secs(1801)).await;
        handle.abort();

        assert_eq!(service.purges.load(Ordering::SeqCst), 3);
    }
}
