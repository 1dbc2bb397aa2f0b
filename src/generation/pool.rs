//! # Candidate Pool
//!
//! Filtering catalog candidates by tags and turning the survivors into
//! scored, classified [`PoolEntry`] values for the composer.

use crate::scoring::{role::RoleClassifier, score};
use crate::{CombatantStats, Role};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A scored candidate as the composer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub name: String,
    /// Base CR, before any per-pick modifiers
    pub cr: i64,
    pub role: Role,
}

impl PoolEntry {
    pub fn new(name: impl Into<String>, cr: i64, role: Role) -> Self {
        Self {
            name: name.into(),
            cr,
            role,
        }
    }
}

/// Scores and classifies candidates in the order given.
///
/// Names must be unique within a pool; a repeated name keeps its first
/// occurrence. The pool is meant to be rebuilt for every composition run.
///
/// # Examples
///
/// ```
/// use encounter_forge::{build_pool, CombatantStats, Role, RoleClassifier};
///
/// let candidates = vec![
///     ("Raider".to_string(), CombatantStats::new(4, 20, 10, 12, 2, 10)),
/// ];
/// let pool = build_pool(&candidates, &RoleClassifier::new(), false);
/// assert_eq!(pool[0].cr, 84);
/// assert_eq!(pool[0].role, Role::Striker);
/// ```
pub fn build_pool(
    candidates: &[(String, CombatantStats)],
    classifier: &RoleClassifier,
    use_ap_multiplier: bool,
) -> Vec<PoolEntry> {
    let mut seen = HashSet::new();
    let mut pool = Vec::with_capacity(candidates.len());

    for (name, stats) in candidates {
        if !seen.insert(name.as_str()) {
            warn!("Duplicate candidate '{}' left out of the pool", name);
            continue;
        }
        pool.push(PoolEntry::new(
            name.clone(),
            score(stats, use_ap_multiplier),
            classifier.classify(stats),
        ));
    }

    debug!("Built pool of {} candidates", pool.len());
    pool
}

/// Tag and level criteria for narrowing the catalog.
///
/// Empty tag sets and unset level bounds accept everything. A non-empty tag
/// set accepts a candidate sharing at least one tag with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    pub biomes: BTreeSet<String>,
    pub sites: BTreeSet<String>,
    pub factions: BTreeSet<String>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
}

impl CandidateFilter {
    /// Creates a filter that accepts every candidate.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_biome(mut self, biome: impl Into<String>) -> Self {
        self.biomes.insert(biome.into());
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.sites.insert(site.into());
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.factions.insert(faction.into());
        self
    }

    pub fn with_level_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_level = min;
        self.max_level = max;
        self
    }

    /// Checks a candidate against every criterion.
    pub fn matches(&self, stats: &CombatantStats) -> bool {
        fn overlaps(wanted: &BTreeSet<String>, have: &BTreeSet<String>) -> bool {
            wanted.is_empty() || !wanted.is_disjoint(have)
        }

        overlaps(&self.biomes, &stats.tags.biomes)
            && overlaps(&self.sites, &stats.tags.sites)
            && overlaps(&self.factions, &stats.tags.factions)
            && self.min_level.map_or(true, |min| stats.level >= min)
            && self.max_level.map_or(true, |max| stats.level <= max)
    }
}
