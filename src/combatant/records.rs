//! # Input Records
//!
//! Serde shapes for the catalog and party data stores, and their mapping
//! onto [`CombatantStats`]. Records are lenient: a missing, `null` or
//! wrong-typed field falls back to its documented default instead of failing
//! the whole file.

use super::{CombatantStats, CombatantTags, Special, SpecialAttribute};
use crate::generation::pool::CandidateFilter;
use crate::{config, ForgeResult};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Field deserializers that degrade wrong-typed values to the field default
/// instead of rejecting the whole record.
mod lenient {
    use super::*;

    /// Integers are clamped into `i32`, fractional numbers truncate toward
    /// zero. Anything that is not a number reads as absent.
    fn int_from_value(value: &Value) -> Option<i32> {
        match value {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Some(int.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
                } else {
                    number.as_f64().map(|float| float as i32)
                }
            }
            Value::Null => None,
            other => {
                debug!("Ignoring non-numeric stat value {}", other);
                None
            }
        }
    }

    fn strings_from_value(value: Value) -> Option<Vec<String>> {
        match value {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        other => {
                            debug!("Ignoring non-string list entry {}", other);
                            None
                        }
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
        Ok(int_from_value(&Value::deserialize(deserializer)?))
    }

    pub fn special<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, i32>, D::Error> {
        let map = match Value::deserialize(deserializer)? {
            Value::Object(entries) => entries
                .into_iter()
                .filter_map(|(key, value)| int_from_value(&value).map(|v| (key, v)))
                .collect(),
            _ => BTreeMap::new(),
        };
        Ok(map)
    }

    pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(strings_from_value(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_strings<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(strings_from_value(Value::deserialize(deserializer)?))
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let name = match Value::deserialize(deserializer)? {
            Value::String(text) => text,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(name)
    }
}

/// Builds a SPECIAL block from a loosely keyed map.
///
/// Keys may be full names or one-letter abbreviations in any case. Unknown
/// keys are skipped.
fn special_from_map(map: &BTreeMap<String, i32>) -> Special {
    let mut special = Special::default();
    for (key, &value) in map {
        match key.parse::<SpecialAttribute>() {
            Ok(attr) => special.set(attr, value),
            Err(reason) => debug!("Ignoring SPECIAL entry: {}", reason),
        }
    }
    special
}

/// A combatant definition as stored in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantRecord {
    #[serde(deserialize_with = "lenient::int")]
    pub level: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub hp: Option<i32>,
    #[serde(alias = "stamina", deserialize_with = "lenient::int")]
    pub sp: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub ac: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub dt: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub ap: Option<i32>,
    #[serde(deserialize_with = "lenient::special")]
    pub special: BTreeMap<String, i32>,
    #[serde(deserialize_with = "lenient::optional_strings")]
    pub actions: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::strings")]
    pub biomes: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub sites: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub factions: Vec<String>,
}

impl CombatantRecord {
    /// Normalises the record, applying defaults for anything missing.
    pub fn to_stats(&self) -> CombatantStats {
        CombatantStats {
            level: self.level.unwrap_or(config::DEFAULT_LEVEL),
            hp: self.hp.unwrap_or(0),
            sp: self.sp.unwrap_or(0),
            ac: self.ac.unwrap_or(config::DEFAULT_AC),
            dt: self.dt.unwrap_or(0),
            ap: self.ap.unwrap_or(0),
            special: special_from_map(&self.special),
            actions: self.actions.clone().unwrap_or_default(),
            tags: CombatantTags {
                biomes: self.biomes.iter().cloned().collect(),
                sites: self.sites.iter().cloned().collect(),
                factions: self.factions.iter().cloned().collect(),
            },
        }
    }
}

/// A party member as stored by the character sheet layer.
///
/// Character sheets spell out `stamina` and `action_points`; both map
/// directly onto the combatant stat block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::int")]
    pub level: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub hp: Option<i32>,
    #[serde(alias = "sp", deserialize_with = "lenient::int")]
    pub stamina: Option<i32>,
    #[serde(alias = "ap", deserialize_with = "lenient::int")]
    pub action_points: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub ac: Option<i32>,
    #[serde(deserialize_with = "lenient::int")]
    pub dt: Option<i32>,
    #[serde(alias = "SPECIAL", deserialize_with = "lenient::special")]
    pub special: BTreeMap<String, i32>,
}

impl CharacterRecord {
    /// Maps the character onto the shared stat block.
    pub fn to_stats(&self) -> CombatantStats {
        CombatantStats {
            level: self.level.unwrap_or(config::DEFAULT_LEVEL),
            hp: self.hp.unwrap_or(0),
            sp: self.stamina.unwrap_or(0),
            ac: self.ac.unwrap_or(config::DEFAULT_AC),
            dt: self.dt.unwrap_or(0),
            ap: self.action_points.unwrap_or(0),
            special: special_from_map(&self.special),
            ..CombatantStats::default()
        }
    }
}

/// Parses a party from a JSON array of character records.
pub fn party_from_json_str(json: &str) -> ForgeResult<Vec<CharacterRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a party file. Member order in the file is the order used for the
/// positional group multiplier.
pub fn load_party<P: AsRef<Path>>(path: P) -> ForgeResult<Vec<CharacterRecord>> {
    let text = std::fs::read_to_string(path)?;
    party_from_json_str(&text)
}

/// Name-keyed combatant catalog.
///
/// Backed by a `BTreeMap` so iteration, and therefore pool order, is the
/// same on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CombatantRecord>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from a JSON object of `name -> record`.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::Catalog;
    ///
    /// let catalog = Catalog::from_json_str(r#"{"Mole Rat": {"level": 1, "hp": 12}}"#).unwrap();
    /// assert_eq!(catalog.len(), 1);
    /// assert_eq!(catalog.stats("Mole Rat").unwrap().ac, 10);
    /// ```
    pub fn from_json_str(json: &str) -> ForgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> ForgeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Inserts or replaces a record.
    pub fn insert(&mut self, name: impl Into<String>, record: CombatantRecord) {
        self.entries.insert(name.into(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalised stats for a single combatant.
    pub fn stats(&self, name: &str) -> Option<CombatantStats> {
        self.entries.get(name).map(CombatantRecord::to_stats)
    }

    /// Every combatant as `(name, stats)`, in name order.
    pub fn candidates(&self) -> Vec<(String, CombatantStats)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.clone(), record.to_stats()))
            .collect()
    }

    /// Combatants passing `filter`, in name order.
    pub fn filtered(&self, filter: &CandidateFilter) -> Vec<(String, CombatantStats)> {
        self.candidates()
            .into_iter()
            .filter(|(_, stats)| filter.matches(stats))
            .collect()
    }
}
