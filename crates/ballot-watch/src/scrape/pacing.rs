use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Upstream courtesy delay bound used by the historical runs.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(3);

/// Random pause between consecutive upstream requests, uniform in `[0, max_delay]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    max_delay: Duration,
}

impl Pacing {
    pub const fn new(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    /// No pause at all; used for offline sources.
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_delay.is_zero() {
            return Duration::ZERO;
        }
        let secs = rng.random_range(0.0..=self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub async fn pause(&self) {
        let delay = self.sample(&mut rand::rng());
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "pacing before next request");
        tokio::time::sleep(delay).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_within_bound() {
        let pacing = Pacing::new(Duration::from_millis(1500));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let delay = pacing.sample(&mut rng);
            assert!(delay <= Duration::from_millis(1500), "{delay:?} over bound");
        }
    }

    #[test]
    fn zero_bound_never_waits() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Pacing::immediate().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn default_matches_upstream_courtesy_delay() {
        assert_eq!(Pacing::default().max_delay(), Duration::from_secs(3));
    }
}
