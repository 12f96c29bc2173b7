use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bounty difficulty floor, ordered lowest to highest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Floor {
    I,
    II,
    III,
    IV,
}

impl Floor {
    /// Suffix used by node names and template file names
    pub fn value(&self) -> &'static str {
        match self {
            Floor::I => "i",
            Floor::II => "ii",
            Floor::III => "iii",
            Floor::IV => "iv",
        }
    }
}

impl std::fmt::Display for Floor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

/// Decision profile for one bounty boss
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BountyProfile {
    /// Candidate floors in ascending order; the last available one wins
    pub floors: Vec<Floor>,
    /// OCR patterns that identify the boss in the boss list
    pub recognition: Vec<String>,
}

/// Config form of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BountyEntry {
    pub name: String,
    #[serde(flatten)]
    pub profile: BountyProfile,
}

/// Immutable boss name → profile table
#[derive(Debug, Clone, PartialEq)]
pub struct BountyCatalog {
    entries: HashMap<String, BountyProfile>,
}

impl BountyCatalog {
    /// Bosses currently on the bounty board
    pub fn builtin() -> Self {
        use Floor::*;

        let table: [(&str, &[Floor], &[&str]); 11] = [
            ("Deity of Weaving", &[II, III, IV], &["Weaving"]),
            ("Contractor of the Stem", &[II, III, IV], &["Contractor"]),
            ("Skyrogue Mutant", &[III, IV], &["Skyrogue"]),
            ("Legionnaire Mutant", &[III, IV], &["Legionnaire"]),
            ("Pyromancer Mutant", &[III, IV], &["Pyromancer"]),
            ("Colossus Breaker", &[III, IV], &["Colossus", "Breaker"]),
            (
                "Warped Orkean Sharpshooter",
                &[III, IV],
                &["Warped Orkean", "Sharpshooter"],
            ),
            ("Frost Orb", &[III, IV], &["Frost", "Orb"]),
            ("Deity of Thunder", &[III, IV], &["Deity", "Thunder"]),
            ("Shadow Knight", &[III, IV], &["Shadow", "Knight"]),
            (
                "Shade Of False Dreams",
                &[III, IV],
                &["Shade", "False", "Dreams"],
            ),
        ];

        let entries = table
            .iter()
            .map(|(name, floors, recognition)| {
                (
                    name.to_string(),
                    BountyProfile {
                        floors: floors.to_vec(),
                        recognition: recognition.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect();

        Self { entries }
    }

    /// Built-in table with config entries added or replacing same-named bosses
    pub fn with_overrides(overrides: &[BountyEntry]) -> Result<Self, AgentError> {
        let mut catalog = Self::builtin();

        for entry in overrides {
            if entry.profile.floors.is_empty() {
                return Err(AgentError::Config(format!(
                    "bounty '{}' has no floors",
                    entry.name
                )));
            }
            if entry.profile.recognition.is_empty() {
                return Err(AgentError::Config(format!(
                    "bounty '{}' has no recognition text",
                    entry.name
                )));
            }
            catalog
                .entries
                .insert(entry.name.clone(), entry.profile.clone());
        }

        Ok(catalog)
    }

    /// Look up a boss; an unknown name is a caller/config mismatch
    pub fn get(&self, name: &str) -> Result<&BountyProfile, AgentError> {
        self.entries
            .get(name)
            .ok_or_else(|| AgentError::UnknownTarget {
                kind: "bounty",
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BountyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
