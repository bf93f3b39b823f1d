use serde::{Deserialize, Serialize};

/// Sentinel for "no record has been matched yet" in a run
pub const NO_PRIOR_MATCH: f64 = -1.0;

/// Tier boundaries and bonus values for the temporal plausibility score
///
/// A deliberate step function: a gap of roughly half a minute to two
/// minutes between consecutive answers is rewarded most, very short or
/// very long gaps progressively less. All values are tunable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemporalTiers {
    /// Flat bonus when nothing has been matched yet
    pub first_match_bonus: f64,
    /// Lower bound of the ideal gap band (seconds)
    pub ideal_gap_min: f64,
    /// Upper bound of the ideal gap band (seconds)
    pub ideal_gap_max: f64,
    /// Lower bound of the short-gap band (seconds)
    pub short_gap_min: f64,
    /// Upper bound of the long-gap band (seconds)
    pub long_gap_max: f64,
    /// Bonus for gaps inside the ideal band
    pub ideal_bonus: f64,
    /// Bonus for short but plausible gaps
    pub short_bonus: f64,
    /// Bonus for long but still plausible gaps
    pub long_bonus: f64,
}

impl Default for TemporalTiers {
    fn default() -> Self {
        Self {
            first_match_bonus: 0.1,
            ideal_gap_min: 30.0,
            ideal_gap_max: 120.0,
            short_gap_min: 10.0,
            long_gap_max: 300.0,
            ideal_bonus: 0.3,
            short_bonus: 0.2,
            long_bonus: 0.1,
        }
    }
}

/// Bonus in [0, 0.3] for how plausible the gap between a candidate segment
/// and the last matched segment is
///
/// `last_matched_start < 0` is the "no prior match" sentinel and earns the
/// flat first-match bonus so the very first record is not starved. Negative
/// gaps, near-zero gaps and gaps beyond the long band score zero.
pub fn temporal_bonus(candidate_start: f64, last_matched_start: f64, tiers: &TemporalTiers) -> f64 {
    if last_matched_start < 0.0 {
        return tiers.first_match_bonus;
    }

    let gap = candidate_start - last_matched_start;

    if (tiers.ideal_gap_min..=tiers.ideal_gap_max).contains(&gap) {
        tiers.ideal_bonus
    } else if (tiers.short_gap_min..tiers.ideal_gap_min).contains(&gap) {
        tiers.short_bonus
    } else if gap > tiers.ideal_gap_max && gap <= tiers.long_gap_max {
        tiers.long_bonus
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> TemporalTiers {
        TemporalTiers::default()
    }

    #[test]
    fn test_no_prior_match_sentinel() {
        assert_eq!(temporal_bonus(0.0, NO_PRIOR_MATCH, &tiers()), 0.1);
        assert_eq!(temporal_bonus(500.0, NO_PRIOR_MATCH, &tiers()), 0.1);
    }

    #[test]
    fn test_ideal_gap_band() {
        assert_eq!(temporal_bonus(160.0, 100.0, &tiers()), 0.3);
        // Band boundaries are inclusive
        assert_eq!(temporal_bonus(130.0, 100.0, &tiers()), 0.3);
        assert_eq!(temporal_bonus(220.0, 100.0, &tiers()), 0.3);
    }

    #[test]
    fn test_short_gap_band() {
        assert_eq!(temporal_bonus(115.0, 100.0, &tiers()), 0.2);
        assert_eq!(temporal_bonus(110.0, 100.0, &tiers()), 0.2);
        // Gap of exactly 30 belongs to the ideal band
        assert_eq!(temporal_bonus(129.9, 100.0, &tiers()), 0.2);
    }

    #[test]
    fn test_long_gap_band() {
        assert_eq!(temporal_bonus(300.0, 100.0, &tiers()), 0.1);
        assert_eq!(temporal_bonus(400.0, 100.0, &tiers()), 0.1);
    }

    #[test]
    fn test_zero_bonus_outside_bands() {
        // Too close
        assert_eq!(temporal_bonus(105.0, 100.0, &tiers()), 0.0);
        // Too far
        assert_eq!(temporal_bonus(500.0, 100.0, &tiers()), 0.0);
        // Going backwards in time
        assert_eq!(temporal_bonus(50.0, 100.0, &tiers()), 0.0);
    }
}
