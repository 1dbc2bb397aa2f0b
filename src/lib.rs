//! # Encounter Forge
//!
//! Budget-driven encounter composition for a tabletop combat simulator.
//!
//! ## Architecture Overview
//!
//! Data flows one way through the crate:
//!
//! - **Combatants**: raw catalog and party records, normalised into [`CombatantStats`]
//! - **Scoring**: the Combat Rating (CR) scorer, the role classifier and the
//!   party budget estimator, all pure functions over [`CombatantStats`]
//! - **Generation**: pool construction and the stochastic, budget-constrained
//!   [`EncounterComposer`]
//!
//! The composer never touches a global random source. Every call takes a
//! [`RandomSource`], which any [`rand::Rng`] satisfies, so a seeded
//! `StdRng` reproduces an encounter exactly.
//!
//! ```
//! use encounter_forge::{compose, ComposerOptions, PoolEntry, Role};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let pool = vec![
//!     PoolEntry::new("Raider", 40, Role::Striker),
//!     PoolEntry::new("Sentry Bot", 90, Role::Tank),
//! ];
//! let mut rng = StdRng::seed_from_u64(7);
//! let encounter = compose(&pool, 200, &ComposerOptions::default(), &mut rng);
//! assert!(encounter.total_count() > 0);
//! ```

pub mod combatant;
pub mod generation;
pub mod scoring;

pub use combatant::*;
pub use generation::*;
pub use scoring::*;

pub use combatant::records::{load_party, Catalog, CharacterRecord, CombatantRecord};
pub use generation::encounters::{
    compose, run_trial, Composition, CompositionEntry, EncounterComposer, TrialOutcome,
};
pub use generation::pool::{build_pool, CandidateFilter, PoolEntry};
pub use generation::random::RandomSource;
pub use scoring::party::{estimate, Difficulty};
pub use scoring::role::{classify, RoleClassifier};

/// Core error type for Encounter Forge.
///
/// Loading, configuration and post-generation validation can fail. Scoring
/// and the raw composer always produce a (possibly empty) result.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generated content failed validation
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Encounter Forge codebase.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tuning constants for scoring and composition.
pub mod config {
    /// Value assumed for any SPECIAL attribute missing from a record
    pub const DEFAULT_SPECIAL: i32 = 5;

    /// Level assumed when a record omits it
    pub const DEFAULT_LEVEL: i32 = 1;

    /// Armor class assumed when a record omits it
    pub const DEFAULT_AC: i32 = 10;

    /// Action points at which the AP multiplier is neutral
    pub const AP_BASELINE: i32 = 10;

    /// Cost change per action point above or below the baseline
    pub const AP_MULTIPLIER_STEP: f64 = 0.05;

    /// Positional tax per already-counted party member or picked combatant
    pub const GROUP_MULTIPLIER_STEP: f64 = 0.08;

    /// Surcharge when a Tank and a Striker end up side by side
    pub const SYNERGY_TAX: f64 = 1.15;

    /// Half-width of the random budget perturbation, as a fraction of target
    pub const BUDGET_VARIATION: f64 = 0.10;

    /// Default tolerance above the remaining budget, as a fraction of target
    pub const DEFAULT_OVERFLOW_ALLOWANCE: f64 = 0.15;

    /// Fill attempts per composition call
    pub const MAX_TRIALS: usize = 10;

    /// Insertion attempts per fill attempt
    pub const MAX_ATTEMPTS_PER_TRIAL: usize = 50;

    /// Budget utilisation at which the composer stops trying
    pub const GOOD_ENOUGH_FILL: f64 = 0.70;
}
