//! # Role Classification
//!
//! Tags a combatant as Tank, Striker or Controller from its stat block and
//! action texts.

use crate::{CombatantStats, Role};
use serde::{Deserialize, Serialize};

/// Forced-condition vocabulary used when no list is configured.
///
/// Entries are matched as lowercase substrings, so "paraly" covers both
/// "paralyze" and "paralysis".
pub const DEFAULT_CONTROLLER_KEYWORDS: &[&str] = &[
    "stun",
    "prone",
    "blind",
    "fatigue",
    "paraly",
    "unconscious",
    "grapple",
    "restrain",
    "knock down",
    "cripple",
];

/// Classifier holding the forced-condition keyword list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleClassifier {
    keywords: Vec<String>,
}

impl Default for RoleClassifier {
    fn default() -> Self {
        Self::with_keywords(DEFAULT_CONTROLLER_KEYWORDS.iter().copied())
    }
}

impl RoleClassifier {
    /// Creates a classifier with the default keyword list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier with a custom keyword list.
    ///
    /// Keywords are lowercased; blank entries are dropped since they would
    /// match every action.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if any action text mentions a forced-condition keyword.
    pub fn imposes_conditions(&self, stats: &CombatantStats) -> bool {
        stats.actions.iter().any(|action| {
            let text = action.to_lowercase();
            self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
        })
    }

    /// Classifies a combatant.
    ///
    /// Keyword matches win outright. Otherwise durability is weighed against
    /// offence and ties go to Striker.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::{CombatantStats, Role, RoleClassifier};
    ///
    /// let classifier = RoleClassifier::new();
    /// let brute = CombatantStats::new(2, 80, 20, 10, 3, 6);
    /// assert_eq!(classifier.classify(&brute), Role::Tank);
    ///
    /// let stunner = brute.clone().with_action("Stun Baton: target is stunned");
    /// assert_eq!(classifier.classify(&stunner), Role::Controller);
    /// ```
    pub fn classify(&self, stats: &CombatantStats) -> Role {
        if self.imposes_conditions(stats) {
            return Role::Controller;
        }

        let tank_score = (stats.hp as i64 + stats.sp as i64) + stats.dt as i64 * 10;
        let striker_score = stats.level as i64 * 5 + stats.ap as i64 * 5;

        if tank_score > striker_score {
            Role::Tank
        } else {
            Role::Striker
        }
    }
}

/// Classifies with the default keyword list.
pub fn classify(stats: &CombatantStats) -> Role {
    RoleClassifier::default().classify(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tank_when_durable() {
        // tank 30 + 20 = 50 vs striker 20 + 25 = 45
        let stats = CombatantStats::new(4, 20, 10, 12, 2, 5);
        assert_eq!(classify(&stats), Role::Tank);
    }

    #[test]
    fn test_striker_when_offensive() {
        // tank 30 + 20 = 50 vs striker 20 + 50 = 70
        let stats = CombatantStats::new(4, 20, 10, 12, 2, 10);
        assert_eq!(classify(&stats), Role::Striker);
    }

    #[test]
    fn test_tie_goes_to_striker() {
        // tank 50 vs striker 5 + 45 = 50
        let stats = CombatantStats::new(1, 30, 20, 10, 0, 9);
        assert_eq!(classify(&stats), Role::Striker);
    }

    #[test]
    fn test_keyword_overrides_stats() {
        let stats = CombatantStats::new(1, 500, 500, 20, 10, 0)
            .with_action("Slam")
            .with_action("Tail Sweep: knocks the target PRONE");
        assert_eq!(classify(&stats), Role::Controller);
    }

    #[test]
    fn test_keyword_substring_match() {
        let stats = CombatantStats::default().with_action("Venom: paralysis for 1 round");
        assert_eq!(classify(&stats), Role::Controller);
    }

    #[test]
    fn test_custom_keywords() {
        let classifier = RoleClassifier::with_keywords(["Frighten", "  ", ""]);
        assert_eq!(classifier.keywords(), &["frighten".to_string()]);

        let scary = CombatantStats::default().with_action("Howl: all enemies are frightened");
        let stunner = CombatantStats::default().with_action("Stun");
        assert_eq!(classifier.classify(&scary), Role::Controller);
        assert_ne!(classifier.classify(&stunner), Role::Controller);
    }

    #[test]
    fn test_no_keywords_never_controller() {
        let classifier = RoleClassifier::with_keywords(Vec::<String>::new());
        let stats = CombatantStats::default().with_action("Stun everything");
        assert_ne!(classifier.classify(&stats), Role::Controller);
    }
}
