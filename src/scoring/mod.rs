//! # Scoring Module
//!
//! Combat Rating (CR): the single integer cost that both individual
//! combatants and whole parties are measured in.
//!
//! The scorer is intentionally unclamped. Armor class below 10 lowers the
//! durability term, and under the AP multiplier a combatant with very few
//! action points is discounted, so a sufficiently weak stat block can score
//! zero or below.

pub mod party;
pub mod role;

use crate::config;
use crate::CombatantStats;

/// Multiplier applied when AP scaling is enabled: 5% per action point
/// above or below the baseline of 10.
///
/// # Examples
///
/// ```
/// use encounter_forge::ap_multiplier;
///
/// assert_eq!(ap_multiplier(10), 1.0);
/// assert!((ap_multiplier(12) - 1.1).abs() < 1e-9);
/// assert!((ap_multiplier(6) - 0.8).abs() < 1e-9);
/// ```
pub fn ap_multiplier(ap: i32) -> f64 {
    1.0 + (ap as f64 - config::AP_BASELINE as f64) * config::AP_MULTIPLIER_STEP
}

/// Unrounded CR before truncation.
pub fn raw_score(stats: &CombatantStats, use_ap_multiplier: bool) -> f64 {
    let base = stats.level as f64 * 5.0;
    let durability = (stats.hp as f64 + stats.sp as f64) / 2.0
        + stats.dt as f64 * 4.0
        + (stats.ac as f64 - 10.0) * 2.0;
    let capability = stats.ap as f64 * 2.0 + stats.special.total() as f64 / 2.0;

    let total = base + durability + capability;
    if use_ap_multiplier {
        total * ap_multiplier(stats.ap)
    } else {
        total
    }
}

/// Scores a combatant or party member, truncating toward zero.
///
/// # Examples
///
/// ```
/// use encounter_forge::{score, CombatantStats};
///
/// let stats = CombatantStats::new(4, 20, 10, 12, 2, 10);
/// assert_eq!(score(&stats, false), 84);
/// assert_eq!(score(&stats, true), 84);
/// ```
pub fn score(stats: &CombatantStats, use_ap_multiplier: bool) -> i64 {
    raw_score(stats, use_ap_multiplier) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Special, SpecialAttribute};

    fn reference_stats() -> CombatantStats {
        CombatantStats::new(4, 20, 10, 12, 2, 10)
    }

    #[test]
    fn test_reference_breakdown() {
        // 20 base + (15 + 8 + 4) durability + (20 + 17.5) capability
        let stats = reference_stats();
        assert_eq!(raw_score(&stats, false), 84.5);
        assert_eq!(score(&stats, false), 84);
        assert_eq!(score(&stats, true), 84);
    }

    #[test]
    fn test_defaults_score() {
        // 5 base + 0 durability + 17.5 capability
        assert_eq!(score(&CombatantStats::default(), false), 22);
    }

    #[test]
    fn test_odd_hp_sp_uses_real_division() {
        let even = CombatantStats::new(0, 10, 0, 10, 0, 0).with_special(Special::uniform(0));
        let odd = CombatantStats::new(0, 11, 0, 10, 0, 0).with_special(Special::uniform(0));
        assert_eq!(raw_score(&even, false), 5.0);
        assert_eq!(raw_score(&odd, false), 5.5);
        assert_eq!(score(&odd, false), 5);
    }

    #[test]
    fn test_low_armor_lowers_cost() {
        let base = reference_stats();
        let mut weak = base.clone();
        weak.ac = 4;
        assert_eq!(score(&base, false) - score(&weak, false), 16);
    }

    #[test]
    fn test_ap_multiplier_taxes_and_discounts() {
        let mut fast = reference_stats();
        fast.ap = 12;
        // 20 + 27 + (24 + 17.5) = 88.5, times 1.1
        assert_eq!(score(&fast, false), 88);
        assert_eq!(score(&fast, true), 97);

        let mut slow = reference_stats();
        slow.ap = 6;
        // 20 + 27 + (12 + 17.5) = 76.5, times 0.8
        assert_eq!(score(&slow, true), 61);
    }

    #[test]
    fn test_score_can_go_negative() {
        let stats = CombatantStats::new(0, 0, 0, 0, 0, 0).with_special(Special::uniform(0));
        assert_eq!(score(&stats, false), -20);
    }

    #[test]
    fn test_truncation_is_toward_zero() {
        // -20 + 0.5 from a single SPECIAL point: -19.5 truncates to -19
        let stats = CombatantStats::new(0, 0, 0, 0, 0, 0)
            .with_special(Special::uniform(0).with(SpecialAttribute::Luck, 1));
        assert_eq!(raw_score(&stats, false), -19.5);
        assert_eq!(score(&stats, false), -19);
    }

    #[test]
    fn test_extreme_stats_do_not_overflow() {
        let extreme = |value: i32| {
            CombatantStats::new(value, value, value, value, value, value)
                .with_special(Special::uniform(value))
        };

        let floor = extreme(i32::MIN);
        assert!(raw_score(&floor, true).is_finite());
        assert!(score(&floor, false) < 0);

        let ceiling = extreme(i32::MAX);
        assert!(raw_score(&ceiling, true).is_finite());
        assert!(score(&ceiling, true) > 0);

        assert!(ap_multiplier(i32::MIN) < 0.0);
        assert!(ap_multiplier(i32::MAX) > 1.0);
    }
}
