//! # Combatant Module
//!
//! The normalised stat block shared by catalog combatants and party members.
//!
//! Everything downstream (the CR scorer, the role classifier, the party
//! estimator) reads [`CombatantStats`] only, so an enemy and a player
//! character with identical numbers always cost the same.

pub mod records;

use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The seven SPECIAL attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecialAttribute {
    Strength,
    Perception,
    Endurance,
    Charisma,
    Intelligence,
    Agility,
    Luck,
}

impl SpecialAttribute {
    /// All attributes in S.P.E.C.I.A.L. order.
    pub const ALL: [SpecialAttribute; 7] = [
        SpecialAttribute::Strength,
        SpecialAttribute::Perception,
        SpecialAttribute::Endurance,
        SpecialAttribute::Charisma,
        SpecialAttribute::Intelligence,
        SpecialAttribute::Agility,
        SpecialAttribute::Luck,
    ];

    /// Full lowercase name, as used in record keys.
    pub fn name(self) -> &'static str {
        match self {
            SpecialAttribute::Strength => "strength",
            SpecialAttribute::Perception => "perception",
            SpecialAttribute::Endurance => "endurance",
            SpecialAttribute::Charisma => "charisma",
            SpecialAttribute::Intelligence => "intelligence",
            SpecialAttribute::Agility => "agility",
            SpecialAttribute::Luck => "luck",
        }
    }
}

impl FromStr for SpecialAttribute {
    type Err = String;

    /// Accepts the full name or the one-letter abbreviation, in any case.
    ///
    /// # Examples
    ///
    /// ```
    /// use encounter_forge::SpecialAttribute;
    ///
    /// assert_eq!("Agility".parse::<SpecialAttribute>(), Ok(SpecialAttribute::Agility));
    /// assert_eq!("p".parse::<SpecialAttribute>(), Ok(SpecialAttribute::Perception));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        SpecialAttribute::ALL
            .into_iter()
            .find(|attr| attr.name() == key || attr.name()[..1] == key)
            .ok_or_else(|| format!("unknown SPECIAL attribute '{}'", s))
    }
}

impl fmt::Display for SpecialAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SPECIAL attribute block.
///
/// Every attribute defaults to 5 when a record leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Special {
    pub strength: i32,
    pub perception: i32,
    pub endurance: i32,
    pub charisma: i32,
    pub intelligence: i32,
    pub agility: i32,
    pub luck: i32,
}

impl Default for Special {
    fn default() -> Self {
        Self::uniform(config::DEFAULT_SPECIAL)
    }
}

impl Special {
    /// Creates a block with every attribute set to `value`.
    pub fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            perception: value,
            endurance: value,
            charisma: value,
            intelligence: value,
            agility: value,
            luck: value,
        }
    }

    /// Gets a single attribute.
    pub fn get(&self, attr: SpecialAttribute) -> i32 {
        match attr {
            SpecialAttribute::Strength => self.strength,
            SpecialAttribute::Perception => self.perception,
            SpecialAttribute::Endurance => self.endurance,
            SpecialAttribute::Charisma => self.charisma,
            SpecialAttribute::Intelligence => self.intelligence,
            SpecialAttribute::Agility => self.agility,
            SpecialAttribute::Luck => self.luck,
        }
    }

    /// Sets a single attribute.
    pub fn set(&mut self, attr: SpecialAttribute, value: i32) {
        let slot = match attr {
            SpecialAttribute::Strength => &mut self.strength,
            SpecialAttribute::Perception => &mut self.perception,
            SpecialAttribute::Endurance => &mut self.endurance,
            SpecialAttribute::Charisma => &mut self.charisma,
            SpecialAttribute::Intelligence => &mut self.intelligence,
            SpecialAttribute::Agility => &mut self.agility,
            SpecialAttribute::Luck => &mut self.luck,
        };
        *slot = value;
    }

    /// Builder-style variant of [`Special::set`].
    pub fn with(mut self, attr: SpecialAttribute, value: i32) -> Self {
        self.set(attr, value);
        self
    }

    /// Sum of all seven attributes.
    pub fn total(&self) -> i64 {
        SpecialAttribute::ALL
            .iter()
            .map(|&attr| self.get(attr) as i64)
            .sum()
    }
}

/// Combat archetype assigned by the role classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Soaks damage: durability outweighs offence
    Tank,
    /// Deals damage: level and action economy outweigh durability
    Striker,
    /// Imposes forced conditions through its actions
    Controller,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Tank => "Tank",
            Role::Striker => "Striker",
            Role::Controller => "Controller",
        };
        f.write_str(label)
    }
}

/// Biome, site and faction tags. Only candidate filtering reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantTags {
    pub biomes: BTreeSet<String>,
    pub sites: BTreeSet<String>,
    pub factions: BTreeSet<String>,
}

/// Normalised stat block for a combatant or party member.
///
/// # Examples
///
/// ```
/// use encounter_forge::CombatantStats;
///
/// let stats = CombatantStats::default();
/// assert_eq!(stats.level, 1);
/// assert_eq!(stats.ac, 10);
/// assert_eq!(stats.special.luck, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantStats {
    pub level: i32,
    pub hp: i32,
    /// Stamina points
    pub sp: i32,
    /// Armor class
    pub ac: i32,
    /// Damage threshold
    pub dt: i32,
    /// Action points
    pub ap: i32,
    pub special: Special,
    /// Action descriptions, in sheet order
    pub actions: Vec<String>,
    pub tags: CombatantTags,
}

impl Default for CombatantStats {
    fn default() -> Self {
        Self {
            level: config::DEFAULT_LEVEL,
            hp: 0,
            sp: 0,
            ac: config::DEFAULT_AC,
            dt: 0,
            ap: 0,
            special: Special::default(),
            actions: Vec::new(),
            tags: CombatantTags::default(),
        }
    }
}

impl CombatantStats {
    /// Creates a stat block from the core numbers, leaving SPECIAL at 5.
    pub fn new(level: i32, hp: i32, sp: i32, ac: i32, dt: i32, ap: i32) -> Self {
        Self {
            level,
            hp,
            sp,
            ac,
            dt,
            ap,
            ..Self::default()
        }
    }

    /// Replaces the SPECIAL block.
    pub fn with_special(mut self, special: Special) -> Self {
        self.special = special;
        self
    }

    /// Appends an action description.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// Replaces the tag sets.
    pub fn with_tags(mut self, tags: CombatantTags) -> Self {
        self.tags = tags;
        self
    }
}
