//! Property tests for the CR scorer, role classifier and party estimator.

use encounter_forge::{classify, estimate, score, CombatantStats, Role, RoleClassifier, Special};
use proptest::prelude::*;

fn stats_strategy() -> impl Strategy<Value = CombatantStats> {
    (
        (0i32..40, 0i32..500, 0i32..200),
        (0i32..25, 0i32..20, 0i32..20),
        prop::array::uniform7(1i32..11),
    )
        .prop_map(|((level, hp, sp), (ac, dt, ap), s)| {
            CombatantStats::new(level, hp, sp, ac, dt, ap).with_special(Special {
                strength: s[0],
                perception: s[1],
                endurance: s[2],
                charisma: s[3],
                intelligence: s[4],
                agility: s[5],
                luck: s[6],
            })
        })
}

proptest! {
    #[test]
    fn score_is_deterministic(stats in stats_strategy(), ap_scaling in any::<bool>()) {
        prop_assert_eq!(score(&stats, ap_scaling), score(&stats.clone(), ap_scaling));
    }

    #[test]
    fn ap_multiplier_is_neutral_at_baseline(mut stats in stats_strategy()) {
        stats.ap = 10;
        prop_assert_eq!(score(&stats, true), score(&stats, false));
    }

    #[test]
    fn score_matches_formula(stats in stats_strategy()) {
        let expected = stats.level as f64 * 5.0
            + (stats.hp + stats.sp) as f64 / 2.0
            + stats.dt as f64 * 4.0
            + (stats.ac - 10) as f64 * 2.0
            + stats.ap as f64 * 2.0
            + stats.special.total() as f64 / 2.0;
        prop_assert_eq!(score(&stats, false), expected as i64);
    }

    #[test]
    fn armor_below_ten_lowers_cost(mut stats in stats_strategy(), drop in 1i32..10) {
        stats.ac = 10;
        let baseline = score(&stats, false);
        stats.ac = 10 - drop;
        prop_assert!(score(&stats, false) < baseline);
    }

    #[test]
    fn classify_is_total_and_deterministic(stats in stats_strategy()) {
        let role = classify(&stats);
        prop_assert_eq!(role, classify(&stats));
        prop_assert!(matches!(role, Role::Tank | Role::Striker | Role::Controller));
        prop_assert_ne!(role, Role::Controller);
    }

    #[test]
    fn keyword_always_wins(stats in stats_strategy(), prefix in "[a-z ]{0,12}") {
        let classifier = RoleClassifier::new();
        let stats = stats.with_action(format!("{}grapples the target", prefix));
        prop_assert_eq!(classifier.classify(&stats), Role::Controller);
    }

    #[test]
    fn estimate_single_member_equals_score(stats in stats_strategy(), ap_scaling in any::<bool>()) {
        prop_assert_eq!(estimate(&[stats.clone()], ap_scaling, false), score(&stats, ap_scaling));
    }

    #[test]
    fn estimate_without_group_tax_is_sum(party in prop::collection::vec(stats_strategy(), 0..6)) {
        let sum: i64 = party.iter().map(|m| score(m, false)).sum();
        prop_assert_eq!(estimate(&party, false, false), sum);
    }

    #[test]
    fn group_tax_never_discounts(party in prop::collection::vec(stats_strategy(), 0..6)) {
        prop_assume!(party.iter().all(|m| score(m, false) >= 0));
        prop_assert!(estimate(&party, false, true) >= estimate(&party, false, false));
    }
}
