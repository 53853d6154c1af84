//! The rep ladder: 6 → 8 → 10 → 12 → 15.

pub const REP_LADDER: [u32; 5] = [6, 8, 10, 12, 15];
pub const LADDER_FLOOR: u32 = 6;
pub const LADDER_CEILING: u32 = 15;

/// Rung reached after hitting `target` in full.
pub fn next_rung(target: u32) -> u32 {
    REP_LADDER
        .iter()
        .copied()
        .find(|&rung| rung > target)
        .unwrap_or(LADDER_CEILING)
}

/// Target reached after falling one rep short of `target`.
pub fn near_miss_step(target: u32) -> u32 {
    (target + 1).min(LADDER_CEILING)
}

/// Smallest rung at or above `reps`, or the ceiling past the top.
pub fn rung_for(reps: u32) -> u32 {
    REP_LADDER
        .iter()
        .copied()
        .find(|&rung| rung >= reps)
        .unwrap_or(LADDER_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_rung_stays_on_ladder() {
        assert_eq!(next_rung(6), 8);
        assert_eq!(next_rung(8), 10);
        assert_eq!(next_rung(10), 12);
        assert_eq!(next_rung(12), 15);
        assert_eq!(next_rung(9), 10);
        assert_eq!(next_rung(14), 15);
        for rung in [6, 8, 10, 12] {
            assert!(REP_LADDER.contains(&next_rung(rung)));
        }
    }

    #[test]
    fn test_near_miss_step_caps_at_ceiling() {
        assert_eq!(near_miss_step(8), 9);
        assert_eq!(near_miss_step(14), 15);
        assert_eq!(near_miss_step(15), 15);
    }

    #[test]
    fn test_rung_for() {
        assert_eq!(rung_for(1), 6);
        assert_eq!(rung_for(6), 6);
        assert_eq!(rung_for(7), 8);
        assert_eq!(rung_for(13), 15);
        assert_eq!(rung_for(20), 15);
    }
}
