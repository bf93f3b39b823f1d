use serde::{Deserialize, Serialize};

/// A time range already claimed during the current run, by a real match
/// (with its buffer) or by an earlier synthetic allocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocatedInterval {
    pub start: f64,
    pub end: f64,
}

impl AllocatedInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A synthetic time slot produced for a record with no confident match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl TimeSlot {
    fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            duration: end - start,
        }
    }
}

/// Find a free slot of roughly `desired_duration` seconds on the timeline
///
/// Scans `allocated` (which must be sorted by ascending start) with a
/// cursor, returning the first gap that fits at least
/// `max(min_slot, desired_duration)` seconds, then falls back to the tail
/// of the timeline. If the timeline is saturated, a minimal slot is
/// squeezed in at the very end even though it overlaps earlier claims;
/// allocation never fails. Callers that need strict non-overlap must treat
/// that fallback as a degraded result.
pub fn allocate_gap(
    allocated: &[AllocatedInterval],
    desired_duration: f64,
    timeline_length: f64,
    min_slot: f64,
) -> TimeSlot {
    let needed = min_slot.max(desired_duration);
    let mut cursor = 0.0f64;

    for interval in allocated {
        if interval.start - cursor >= needed {
            return TimeSlot::new(cursor, (cursor + desired_duration).min(interval.start));
        }
        cursor = cursor.max(interval.end);
    }

    if timeline_length - cursor >= needed {
        return TimeSlot::new(cursor, (cursor + desired_duration).min(timeline_length));
    }

    // Saturated timeline: squeeze a minimal slot at the end, overlap allowed
    let squeeze = needed.min(min_slot);
    TimeSlot::new((timeline_length - squeeze).max(0.0), timeline_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_SLOT: f64 = 5.0;

    #[test]
    fn test_fills_leading_gap_first() {
        let allocated = [AllocatedInterval::new(10.0, 20.0)];
        let slot = allocate_gap(&allocated, 5.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 0.0);
        assert_eq!(slot.end, 5.0);
        assert_eq!(slot.duration, 5.0);
    }

    #[test]
    fn test_fills_gap_between_intervals() {
        let allocated = [
            AllocatedInterval::new(0.0, 30.0),
            AllocatedInterval::new(50.0, 80.0),
        ];
        let slot = allocate_gap(&allocated, 10.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 30.0);
        assert_eq!(slot.end, 40.0);
    }

    #[test]
    fn test_small_request_rounds_up_to_min_slot() {
        // A 3-second request still requires a 5-second gap, but only the
        // requested duration is claimed
        let allocated = [
            AllocatedInterval::new(0.0, 30.0),
            AllocatedInterval::new(42.0, 80.0),
        ];
        let slot = allocate_gap(&allocated, 3.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 30.0);
        assert_eq!(slot.end, 33.0);
    }

    #[test]
    fn test_falls_back_to_tail() {
        let allocated = [AllocatedInterval::new(0.0, 60.0)];
        let slot = allocate_gap(&allocated, 20.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 60.0);
        assert_eq!(slot.end, 80.0);
    }

    #[test]
    fn test_gap_smaller_than_min_slot_skipped() {
        // 3-second leading gap is below the minimum, so the tail wins
        let allocated = [AllocatedInterval::new(3.0, 90.0)];
        let slot = allocate_gap(&allocated, 5.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 90.0);
        assert_eq!(slot.end, 95.0);
    }

    #[test]
    fn test_saturated_timeline_overlapping_fallback() {
        let allocated = [AllocatedInterval::new(0.0, 100.0)];
        let slot = allocate_gap(&allocated, 5.0, 100.0, MIN_SLOT);
        // Documented never-fail behavior: the slot overlaps but ends at the
        // timeline boundary
        assert_eq!(slot.end, 100.0);
        assert_eq!(slot.start, 95.0);
    }

    #[test]
    fn test_empty_allocations_use_timeline_head() {
        let slot = allocate_gap(&[], 30.0, 100.0, MIN_SLOT);
        assert_eq!(slot.start, 0.0);
        assert_eq!(slot.end, 30.0);
    }

    #[test]
    fn test_degenerate_timeline_never_panics() {
        let slot = allocate_gap(&[], 30.0, 0.0, MIN_SLOT);
        assert_eq!(slot.end, 0.0);
        assert!(slot.start >= 0.0);
    }
}
