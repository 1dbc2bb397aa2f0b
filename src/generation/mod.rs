//! # Generation Module
//!
//! Encounter composition: candidate pools, the injected random source and
//! the budget-constrained composer.
//!
//! Configuration lives here too. [`ComposerOptions`] controls a single
//! composition call; [`ForgeConfig`] bundles it with the scoring switches
//! and the controller vocabulary so a whole setup can be kept in one JSON
//! file.

pub mod encounters;
pub mod pool;
pub mod random;

use crate::scoring::role::{RoleClassifier, DEFAULT_CONTROLLER_KEYWORDS};
use crate::{config, ForgeError, ForgeResult};
use pool::PoolEntry;
use random::RandomSource;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for one composition call.
///
/// Every modifier toggles independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerOptions {
    /// Weight candidate selection by base CR instead of picking uniformly
    pub weight_bias: bool,
    /// Tax each pick by 8% per combatant already in the attempt
    pub group_multiplier: bool,
    /// Surcharge a Tank joining Strikers, or a Striker joining Tanks
    pub synergy_tax: bool,
    /// Perturb the target budget by up to 10% either way before filling
    pub budget_variation: bool,
    /// How far past the remaining budget a pick may go, as a fraction of
    /// the effective budget
    pub overflow_allowance: f64,
}

impl ComposerOptions {
    /// Creates the default options: weighted selection, no cost modifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::ComposerOptions;
    ///
    /// let options = ComposerOptions::new();
    /// assert!(options.weight_bias);
    /// assert_eq!(options.overflow_allowance, 0.15);
    /// assert!(options.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            weight_bias: true,
            group_multiplier: false,
            synergy_tax: false,
            budget_variation: false,
            overflow_allowance: config::DEFAULT_OVERFLOW_ALLOWANCE,
        }
    }

    /// Creates options for testing: uniform selection, every modifier off.
    pub fn for_testing() -> Self {
        Self {
            weight_bias: false,
            ..Self::new()
        }
    }

    /// Creates options with every modifier on, for the most varied results.
    pub fn for_variety() -> Self {
        Self {
            weight_bias: true,
            group_multiplier: true,
            synergy_tax: true,
            budget_variation: true,
            overflow_allowance: config::DEFAULT_OVERFLOW_ALLOWANCE,
        }
    }

    /// Checks that the overflow allowance is a usable fraction.
    pub fn validate(&self) -> ForgeResult<()> {
        if !self.overflow_allowance.is_finite() || self.overflow_allowance < 0.0 {
            return Err(ForgeError::InvalidConfig(format!(
                "overflow_allowance must be a non-negative number, got {}",
                self.overflow_allowance
            )));
        }
        Ok(())
    }
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete scoring and composition setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Scale CR by action points around the baseline of 10
    pub use_ap_multiplier: bool,
    /// Apply the positional tax when estimating party budgets
    pub party_group_multiplier: bool,
    pub composer: ComposerOptions,
    /// Forced-condition vocabulary for the role classifier
    pub controller_keywords: Vec<String>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            use_ap_multiplier: false,
            party_group_multiplier: false,
            composer: ComposerOptions::default(),
            controller_keywords: DEFAULT_CONTROLLER_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl ForgeConfig {
    /// Parses and validates a JSON configuration. Omitted fields keep
    /// their defaults.
    pub fn from_json_str(json: &str) -> ForgeResult<Self> {
        let config: ForgeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ForgeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ForgeResult<()> {
        self.composer.validate()
    }

    /// Builds the role classifier for this configuration's vocabulary.
    pub fn classifier(&self) -> RoleClassifier {
        RoleClassifier::with_keywords(&self.controller_keywords)
    }
}

/// What a generator is asked to fill: a scored pool and a target budget.
#[derive(Debug, Clone, Copy)]
pub struct EncounterRequest<'a> {
    pub pool: &'a [PoolEntry],
    pub target_budget: i64,
}

impl<'a> EncounterRequest<'a> {
    pub fn new(pool: &'a [PoolEntry], target_budget: i64) -> Self {
        Self {
            pool,
            target_budget,
        }
    }
}

/// Trait for content generators.
///
/// `generate` produces content and is expected to run `validate` on it
/// before handing it back, so a caller never sees content that breaks the
/// generator's own guarantees.
pub trait Generator<T> {
    /// Generates content for the request, drawing from `rng`.
    fn generate<R: RandomSource + ?Sized>(
        &self,
        request: &EncounterRequest<'_>,
        rng: &mut R,
    ) -> ForgeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, request: &EncounterRequest<'_>) -> ForgeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Creates a generator seeded from the operating system.
    pub fn create_entropy_rng() -> StdRng {
        StdRng::from_entropy()
    }
}
