//! Telemetry rate decimation

/// Forwards one telemetry frame out of every `period`
///
/// Holds no counters of its own; the caller owns the frame count and lap context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySampler {
    period: u64,
}

impl TelemetrySampler {
    /// A zero period is treated as 1 (forward everything)
    pub fn new(period: u64) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    /// True when `counter` lands on the period and a lap exists to attach to
    pub fn should_forward(&self, counter: u64, has_lap_context: bool) -> bool {
        has_lap_context && counter % self.period == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_k_over_n() {
        let sampler = TelemetrySampler::new(40);
        for k in [0u64, 39, 40, 41, 120, 1000] {
            let forwarded = (1..=k).filter(|c| sampler.should_forward(*c, true)).count();
            assert_eq!(forwarded as u64, k / 40);
        }
    }

    #[test]
    fn test_no_context_forwards_nothing() {
        let sampler = TelemetrySampler::new(3);
        assert_eq!(
            (1..=300).filter(|c| sampler.should_forward(*c, false)).count(),
            0
        );
    }

    #[test]
    fn test_zero_period_forwards_every_frame() {
        let sampler = TelemetrySampler::new(0);
        assert_eq!(sampler.period(), 1);
        assert!(sampler.should_forward(7, true));
    }
}
