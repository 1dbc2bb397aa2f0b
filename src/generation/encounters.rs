//! # Encounter Composition
//!
//! Randomized greedy filling of a threat budget from a candidate pool.
//!
//! A composition call runs up to ten independent fill attempts (trials).
//! Each trial keeps picking affordable candidates until the budget is spent,
//! nothing fits, or fifty picks have been tried. The most-filled trial wins,
//! and the call stops early once a trial uses at least 70% of the budget.
//! The result is a good, varied encounter rather than an optimal one.

use super::pool::PoolEntry;
use super::random::{weighted_index, RandomSource};
use super::{ComposerOptions, EncounterRequest, Generator};
use crate::{config, ForgeError, ForgeResult, Role};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;

/// One combatant type in a composition, with how many were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub name: String,
    pub count: u32,
}

/// Result of a single fill attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Picks merged by name, in first-pick order
    pub entries: Vec<CompositionEntry>,
    /// Budget left over; negative when the last pick used the overflow
    pub remaining: i64,
    /// Insertion attempts made, accepted or rejected
    pub attempts: usize,
}

impl TrialOutcome {
    fn untouched(effective_budget: i64) -> Self {
        Self {
            entries: Vec::new(),
            remaining: effective_budget,
            attempts: 0,
        }
    }

    /// Budget consumed by this attempt.
    pub fn filled(&self, effective_budget: i64) -> i64 {
        effective_budget.saturating_sub(self.remaining)
    }

    pub fn total_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

/// Running state of one fill attempt.
struct TrialState {
    entries: Vec<CompositionEntry>,
    remaining: i64,
    picked: u32,
    has_tank: bool,
    has_striker: bool,
}

impl TrialState {
    fn new(budget: i64) -> Self {
        Self {
            entries: Vec::new(),
            remaining: budget,
            picked: 0,
            has_tank: false,
            has_striker: false,
        }
    }

    /// A Striker joining a Tank, or a Tank joining a Striker.
    fn role_conflict(&self, role: Role) -> bool {
        match role {
            Role::Striker => self.has_tank,
            Role::Tank => self.has_striker,
            Role::Controller => false,
        }
    }

    fn add(&mut self, entry: &PoolEntry, cost: f64) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => existing.count += 1,
            None => self.entries.push(CompositionEntry {
                name: entry.name.clone(),
                count: 1,
            }),
        }
        self.remaining = self.remaining.saturating_sub(cost.floor() as i64);
        self.picked += 1;
        match entry.role {
            Role::Tank => self.has_tank = true,
            Role::Striker => self.has_striker = true,
            Role::Controller => {}
        }
    }
}

/// Runs one fill attempt against an already-perturbed budget.
///
/// Candidates are affordable while their base CR is within the remaining
/// budget plus the overflow allowance. A pick whose modified cost breaks
/// that ceiling is rejected but still counts toward the attempt cap.
pub fn run_trial<R: RandomSource + ?Sized>(
    pool: &[PoolEntry],
    effective_budget: i64,
    options: &ComposerOptions,
    rng: &mut R,
) -> TrialOutcome {
    let overflow = effective_budget as f64 * options.overflow_allowance;
    let mut state = TrialState::new(effective_budget);
    let mut attempts = 0;

    while state.remaining > 0 && attempts < config::MAX_ATTEMPTS_PER_TRIAL {
        let ceiling = state.remaining as f64 + overflow;
        let affordable: Vec<&PoolEntry> =
            pool.iter().filter(|e| e.cr as f64 <= ceiling).collect();
        if affordable.is_empty() {
            break;
        }

        let index = if options.weight_bias {
            let weights: Vec<f64> = affordable.iter().map(|e| e.cr as f64).collect();
            weighted_index(&weights, rng).unwrap_or(0)
        } else {
            rng.next_index(affordable.len())
        };
        let pick = affordable[index];

        let mut cost = pick.cr as f64;
        if options.group_multiplier {
            cost *= 1.0 + state.picked as f64 * config::GROUP_MULTIPLIER_STEP;
        }
        if options.synergy_tax && state.role_conflict(pick.role) {
            cost *= config::SYNERGY_TAX;
        }

        attempts += 1;
        if cost > ceiling {
            trace!("Rejected {} at cost {:.2} (ceiling {:.2})", pick.name, cost, ceiling);
            continue;
        }
        state.add(pick, cost);
    }

    TrialOutcome {
        entries: state.entries,
        remaining: state.remaining,
        attempts,
    }
}

/// Final encounter returned by the composer.
///
/// Entries keep first-pick order. The composition is a plain value: nothing
/// in the composer touches it after returning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    entries: Vec<CompositionEntry>,
    budget_remaining: i64,
    effective_budget: i64,
    trials: usize,
}

impl Composition {
    fn empty(effective_budget: i64) -> Self {
        Self {
            entries: Vec::new(),
            budget_remaining: effective_budget,
            effective_budget,
            trials: 0,
        }
    }

    pub fn entries(&self) -> &[CompositionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Budget left after the best trial. May dip below zero by at most the
    /// overflow allowance.
    pub fn budget_remaining(&self) -> i64 {
        self.budget_remaining
    }

    /// Target actually filled, after any budget variation.
    pub fn effective_budget(&self) -> i64 {
        self.effective_budget
    }

    /// Trials run before stopping.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Number of combatants in the encounter.
    pub fn total_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// How many of a given combatant were picked.
    pub fn count_of(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map_or(0, |e| e.count)
    }

    /// Budget consumed, including any modifier surcharges.
    pub fn filled(&self) -> i64 {
        self.effective_budget.saturating_sub(self.budget_remaining)
    }

    /// Fraction of the effective budget consumed. Zero for a non-positive
    /// budget.
    pub fn utilization(&self) -> f64 {
        if self.effective_budget <= 0 {
            0.0
        } else {
            self.filled() as f64 / self.effective_budget as f64
        }
    }

    /// Sum of base CR over every picked combatant, for reporting.
    ///
    /// Names missing from `pool` contribute nothing.
    pub fn base_cost(&self, pool: &[PoolEntry]) -> i64 {
        self.entries
            .iter()
            .filter_map(|entry| {
                pool.iter()
                    .find(|p| p.name == entry.name)
                    .map(|p| p.cr.saturating_mul(entry.count as i64))
            })
            .fold(0i64, i64::saturating_add)
    }
}

impl fmt::Display for Composition {
    /// Renders as `2x Raider, 1x Sentry Bot`, or `(empty)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("(empty)");
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}x {}", e.count, e.name))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Budget-constrained encounter composer.
///
/// # Examples
///
/// ```
/// use encounter_forge::{ComposerOptions, EncounterComposer, PoolEntry, Role};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let composer = EncounterComposer::new(ComposerOptions::for_testing());
/// let pool = vec![PoolEntry::new("Mole Rat", 25, Role::Striker)];
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let encounter = composer.compose(&pool, 100, &mut rng);
/// assert_eq!(encounter.count_of("Mole Rat"), 4);
/// assert_eq!(encounter.budget_remaining(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncounterComposer {
    options: ComposerOptions,
}

impl EncounterComposer {
    pub fn new(options: ComposerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    /// The budget a call will actually fill: the target itself, or a
    /// uniform integer within 10% of it when variation is on.
    pub fn effective_budget<R: RandomSource + ?Sized>(
        &self,
        target_budget: i64,
        rng: &mut R,
    ) -> i64 {
        if !self.options.budget_variation {
            return target_budget;
        }
        let spread = (target_budget.unsigned_abs() as f64 * config::BUDGET_VARIATION) as i64;
        rng.next_in_range(
            target_budget.saturating_sub(spread),
            target_budget.saturating_add(spread),
        )
    }

    /// Composes an encounter for `target_budget` from `pool`.
    ///
    /// Never fails. An empty pool or a non-positive effective budget yields
    /// an empty composition with the whole budget remaining; callers should
    /// surface that as "could not generate".
    pub fn compose<R: RandomSource + ?Sized>(
        &self,
        pool: &[PoolEntry],
        target_budget: i64,
        rng: &mut R,
    ) -> Composition {
        let effective = self.effective_budget(target_budget, rng);
        if pool.is_empty() || effective <= 0 {
            debug!(
                "Nothing to compose: {} candidates, effective budget {}",
                pool.len(),
                effective
            );
            return Composition::empty(effective);
        }

        let good_enough = |outcome: &TrialOutcome| {
            outcome.filled(effective) as f64 / effective as f64 >= config::GOOD_ENOUGH_FILL
        };

        let start = (TrialOutcome::untouched(effective), 0usize);
        let flow = (0..config::MAX_TRIALS)
            .map(|_| run_trial(pool, effective, &self.options, rng))
            .try_fold(start, |(best, trials), trial| {
                let trials = trials + 1;
                debug!(
                    "Trial {}: filled {}/{} with {} combatants",
                    trials,
                    trial.filled(effective),
                    effective,
                    trial.total_count()
                );
                let done = good_enough(&trial);
                let best = if trial.filled(effective) > best.filled(effective) {
                    trial
                } else {
                    best
                };
                if done {
                    ControlFlow::Break((best, trials))
                } else {
                    ControlFlow::Continue((best, trials))
                }
            });

        let (best, trials) = match flow {
            ControlFlow::Break(result) | ControlFlow::Continue(result) => result,
        };

        Composition {
            entries: best.entries,
            budget_remaining: best.remaining,
            effective_budget: effective,
            trials,
        }
    }
}

impl Generator<Composition> for EncounterComposer {
    /// Checks the options, composes, and validates the result.
    fn generate<R: RandomSource + ?Sized>(
        &self,
        request: &EncounterRequest<'_>,
        rng: &mut R,
    ) -> ForgeResult<Composition> {
        self.options.validate()?;
        let composition = self.compose(request.pool, request.target_budget, rng);
        self.validate(&composition, request)?;
        debug!(
            "{} produced {} after {} trial(s)",
            self.generator_type(),
            composition,
            composition.trials
        );
        Ok(composition)
    }

    /// Every entry must name a pool candidate exactly once with a non-zero
    /// count, a non-empty result must consume budget, and the leftover may
    /// not undershoot the overflow allowance.
    fn validate(&self, content: &Composition, request: &EncounterRequest<'_>) -> ForgeResult<()> {
        let known: HashSet<&str> = request.pool.iter().map(|p| p.name.as_str()).collect();
        let mut seen = HashSet::new();
        for entry in &content.entries {
            if entry.count == 0 {
                return Err(ForgeError::GenerationFailed(format!(
                    "'{}' listed with a zero count",
                    entry.name
                )));
            }
            if !known.contains(entry.name.as_str()) {
                return Err(ForgeError::GenerationFailed(format!(
                    "'{}' is not in the candidate pool",
                    entry.name
                )));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ForgeError::GenerationFailed(format!(
                    "'{}' listed more than once",
                    entry.name
                )));
            }
        }

        if !content.is_empty() && content.filled() <= 0 {
            return Err(ForgeError::GenerationFailed(format!(
                "{} combatants consumed no budget",
                content.total_count()
            )));
        }

        let overflow = content.effective_budget as f64 * self.options.overflow_allowance;
        if (content.budget_remaining as f64) < -overflow {
            return Err(ForgeError::GenerationFailed(format!(
                "remaining budget {} is past the overflow allowance of {:.0}",
                content.budget_remaining, overflow
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterComposer"
    }
}

/// Composes with one-off options.
pub fn compose<R: RandomSource + ?Sized>(
    pool: &[PoolEntry],
    target_budget: i64,
    options: &ComposerOptions,
    rng: &mut R,
) -> Composition {
    EncounterComposer::new(options.clone()).compose(pool, target_budget, rng)
}
