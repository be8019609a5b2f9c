use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, warn};

/// Query string of the `/api/chaos/*` endpoints.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChaosParams {
    /// Milliseconds to wait before answering (default: 0)
    pub delay_ms: Option<u64>,
    /// Probability in [0, 1] of answering with the synthetic error (default: 0)
    pub fail_rate: Option<f64>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ChaosError {
    #[error("failRate must be a finite number between 0 and 1")]
    InvalidFailRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosOutcome {
    Pass,
    Fail,
}

/// Validated chaos settings for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosPlan {
    pub delay: Duration,
    pub fail_rate: f64,
}

impl ChaosPlan {
    /// Delay is capped at `max_delay`; the fail rate is clamped into [0, 1].
    pub fn from_params(params: &ChaosParams, max_delay: Duration) -> Result<Self, ChaosError> {
        let fail_rate = params.fail_rate.unwrap_or(0.0);
        if !fail_rate.is_finite() {
            return Err(ChaosError::InvalidFailRate);
        }

        Ok(Self {
            delay: Duration::from_millis(params.delay_ms.unwrap_or(0)).min(max_delay),
            fail_rate: fail_rate.clamp(0.0, 1.0),
        })
    }

    pub fn decide<R: Rng + ?Sized>(&self, rng: &mut R) -> ChaosOutcome {
        if rng.gen_bool(self.fail_rate) {
            ChaosOutcome::Fail
        } else {
            ChaosOutcome::Pass
        }
    }

    /// Sleeps for the planned delay, then rolls the dice. Other requests keep
    /// being served while this one waits.
    pub async fn run(&self, target: &str) -> ChaosOutcome {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut rng = StdRng::from_entropy();
        let outcome = self.decide(&mut rng);

        match outcome {
            ChaosOutcome::Fail => warn!(
                target_fixture = target,
                delay_ms = self.delay.as_millis() as u64,
                fail_rate = self.fail_rate,
                "Chaos injected failure"
            ),
            ChaosOutcome::Pass => debug!(
                target_fixture = target,
                delay_ms = self.delay.as_millis() as u64,
                fail_rate = self.fail_rate,
                "Chaos let request through"
            ),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const MAX: Duration = Duration::from_secs(30);

    fn params(delay_ms: Option<u64>, fail_rate: Option<f64>) -> ChaosParams {
        ChaosParams { delay_ms, fail_rate }
    }

    #[test]
    fn defaults_are_no_delay_no_failure() {
        let plan = ChaosPlan::from_params(&ChaosParams::default(), MAX).unwrap();
        assert_eq!(plan.delay, Duration::ZERO);
        assert_eq!(plan.fail_rate, 0.0);
    }

    #[test]
    fn fail_rate_is_clamped() {
        let high = ChaosPlan::from_params(&params(None, Some(7.5)), MAX).unwrap();
        let low = ChaosPlan::from_params(&params(None, Some(-0.3)), MAX).unwrap();
        assert_eq!(high.fail_rate, 1.0);
        assert_eq!(low.fail_rate, 0.0);
    }

    #[test]
    fn non_finite_fail_rate_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                ChaosPlan::from_params(&params(None, Some(bad)), MAX),
                Err(ChaosError::InvalidFailRate)
            );
        }
    }

    #[test]
    fn delay_is_capped() {
        let plan = ChaosPlan::from_params(&params(Some(10_000_000), None), MAX).unwrap();
        assert_eq!(plan.delay, MAX);
    }

    #[test]
    fn zero_fail_rate_never_fails() {
        let plan = ChaosPlan::from_params(&params(None, Some(0.0)), MAX).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1_000).all(|_| plan.decide(&mut rng) == ChaosOutcome::Pass));
    }

    #[test]
    fn full_fail_rate_always_fails() {
        let plan = ChaosPlan::from_params(&params(None, Some(1.0)), MAX).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1_000).all(|_| plan.decide(&mut rng) == ChaosOutcome::Fail));
    }

    #[test]
    fn half_fail_rate_fails_roughly_half_the_time() {
        let plan = ChaosPlan::from_params(&params(None, Some(0.5)), MAX).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let failures = (0..10_000)
            .filter(|_| plan.decide(&mut rng) == ChaosOutcome::Fail)
            .count();
        assert!((4_000..6_000).contains(&failures), "got {} failures", failures);
    }

    #[tokio::test]
    async fn run_waits_for_the_delay() {
        let plan = ChaosPlan::from_params(&params(Some(100), Some(0.0)), MAX).unwrap();
        let start = Instant::now();
        let outcome = plan.run("test").await;
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(outcome, ChaosOutcome::Pass);
    }

    #[tokio::test]
    async fn delays_do_not_block_each_other() {
        let plan = ChaosPlan::from_params(&params(Some(200), Some(0.0)), MAX).unwrap();
        let start = Instant::now();
        let (a, b) = tokio::join!(plan.run("a"), plan.run("b"));
        let elapsed = start.elapsed();
        assert_eq!((a, b), (ChaosOutcome::Pass, ChaosOutcome::Pass));
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(400), "took {:?}", elapsed);
    }
}
