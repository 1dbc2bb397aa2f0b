//! # Party Budget Estimation
//!
//! Turns an ordered party into the CR baseline that difficulty presets
//! scale into a target budget.

use super::score;
use crate::{config, CombatantStats, ForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate CR of a party.
///
/// Members are taxed by position when `group_multiplier` is set: the member
/// at index `i` costs `1 + i * 0.08` times its score. Pass members in a
/// stable order (usually selection order), since reordering changes the
/// result.
///
/// # Examples
///
/// ```
/// use encounter_forge::{estimate, CombatantStats};
///
/// assert_eq!(estimate(&[], true, true), 0);
///
/// let member = CombatantStats::new(4, 20, 10, 12, 2, 10);
/// assert_eq!(estimate(&[member.clone()], false, false), 84);
/// assert_eq!(estimate(&[member.clone(), member], false, true), 84 + 90);
/// ```
pub fn estimate(
    members: &[CombatantStats],
    use_ap_multiplier: bool,
    group_multiplier: bool,
) -> i64 {
    members
        .iter()
        .enumerate()
        .map(|(position, member)| {
            let cost = score(member, use_ap_multiplier) as f64;
            if group_multiplier {
                (cost * (1.0 + position as f64 * config::GROUP_MULTIPLIER_STEP)) as i64
            } else {
                cost as i64
            }
        })
        .fold(0i64, i64::saturating_add)
}

/// Preset difficulty targets, expressed as a multiple of the party baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Deadly,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Deadly,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Deadly => 2.0,
        }
    }

    /// Scales a party baseline into a target budget, truncating.
    pub fn target_budget(self, baseline: i64) -> i64 {
        (baseline as f64 * self.multiplier()) as i64
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Deadly => "deadly",
        };
        f.write_str(label)
    }
}

impl FromStr for Difficulty {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "deadly" => Ok(Difficulty::Deadly),
            other => Err(ForgeError::InvalidInput(format!(
                "unknown difficulty '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> CombatantStats {
        CombatantStats::new(4, 20, 10, 12, 2, 10)
    }

    #[test]
    fn test_empty_party() {
        assert_eq!(estimate(&[], false, false), 0);
        assert_eq!(estimate(&[], true, true), 0);
    }

    #[test]
    fn test_single_member_matches_score() {
        let stats = member();
        assert_eq!(estimate(&[stats.clone()], true, false), score(&stats, true));
        // Position 0 carries no group tax either way
        assert_eq!(estimate(&[stats.clone()], false, true), score(&stats, false));
    }

    #[test]
    fn test_group_multiplier_is_positional() {
        let party = vec![member(), member(), member()];
        // 84, 84 * 1.08 = 90.72, 84 * 1.16 = 97.44
        assert_eq!(estimate(&party, false, false), 252);
        assert_eq!(estimate(&party, false, true), 84 + 90 + 97);
    }

    #[test]
    fn test_order_matters_under_group_multiplier() {
        let strong = CombatantStats::new(10, 100, 50, 15, 5, 12);
        let weak = CombatantStats::default();
        let forward = estimate(&[strong.clone(), weak.clone()], false, true);
        let reverse = estimate(&[weak, strong], false, true);
        assert_ne!(forward, reverse);
    }

    #[test]
    fn test_difficulty_targets() {
        assert_eq!(Difficulty::Easy.target_budget(251), 125);
        assert_eq!(Difficulty::Medium.target_budget(251), 251);
        assert_eq!(Difficulty::Hard.target_budget(251), 376);
        assert_eq!(Difficulty::Deadly.target_budget(251), 502);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" deadly".parse::<Difficulty>().unwrap(), Difficulty::Deadly);
        assert!("nightmare".parse::<Difficulty>().is_err());
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse::<Difficulty>().unwrap(), difficulty);
        }
    }

    #[test]
    fn test_huge_party_saturates() {
        let giant = CombatantStats::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX, 0, i32::MAX)
            .with_special(crate::Special::uniform(i32::MAX));
        let party = vec![giant; 64];
        assert_eq!(estimate(&party, true, true), i64::MAX);
    }
}
