//! Gochara scoring: favorability of a transit's house-count for its body.
//!
//! Favorable and difficult houses are configuration data keyed by body, held
//! in a [`GocharaTable`]. Two tables ship as presets; any other table can be
//! supplied and is validated once at construction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::weights::{check_unit, ConfigError};
use crate::domain::Body;

/// Scores assigned to favorable, unlisted, and difficult houses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GocharaLevels {
    pub high: f64,
    pub mid: f64,
    pub low: f64,
}

/// Favorable and difficult house-counts for one body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HouseSets {
    pub favorable: BTreeSet<u8>,
    pub difficult: BTreeSet<u8>,
}

impl HouseSets {
    fn new(favorable: &[u8], difficult: &[u8]) -> Self {
        Self {
            favorable: favorable.iter().copied().collect(),
            difficult: difficult.iter().copied().collect(),
        }
    }

    /// Sets where every house outside `favorable` and `neutral` is difficult.
    fn with_neutral(favorable: &[u8], neutral: &[u8]) -> Self {
        let difficult = (1..=12)
            .filter(|h| !favorable.contains(h) && !neutral.contains(h))
            .collect();
        Self {
            favorable: favorable.iter().copied().collect(),
            difficult,
        }
    }
}

/// Named built-in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GocharaPreset {
    /// Favorable/difficult sets; 1.0 / 0.6 / 0.25.
    #[default]
    Classical,
    /// Favorable/neutral sets with everything else difficult; 0.85 / 0.55 / 0.25.
    NeutralBand,
}

/// Validated per-body house table plus the three score levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGocharaTable", into = "RawGocharaTable")]
pub struct GocharaTable {
    levels: GocharaLevels,
    sets: BTreeMap<Body, HouseSets>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGocharaTable {
    levels: GocharaLevels,
    sets: BTreeMap<Body, HouseSets>,
}

impl TryFrom<RawGocharaTable> for GocharaTable {
    type Error = ConfigError;

    fn try_from(raw: RawGocharaTable) -> Result<Self, Self::Error> {
        GocharaTable::new(raw.levels, raw.sets)
    }
}

impl From<GocharaTable> for RawGocharaTable {
    fn from(table: GocharaTable) -> Self {
        Self {
            levels: table.levels,
            sets: table.sets,
        }
    }
}

impl GocharaTable {
    /// Validate and build a table. Every [`Body`] must have an entry.
    pub fn new(levels: GocharaLevels, sets: BTreeMap<Body, HouseSets>) -> Result<Self, ConfigError> {
        check_unit("gochara high score", levels.high)?;
        check_unit("gochara mid score", levels.mid)?;
        check_unit("gochara low score", levels.low)?;

        for body in Body::ALL {
            let entry = sets.get(&body).ok_or(ConfigError::MissingGocharaEntry(body))?;
            for &house in entry.favorable.iter().chain(entry.difficult.iter()) {
                if !(1..=12).contains(&house) {
                    return Err(ConfigError::GocharaHouse { body, house });
                }
            }
            if let Some(&house) = entry.favorable.intersection(&entry.difficult).next() {
                return Err(ConfigError::GocharaOverlap { body, house });
            }
        }

        Ok(Self { levels, sets })
    }

    pub fn preset(preset: GocharaPreset) -> Self {
        match preset {
            GocharaPreset::Classical => Self::classical(),
            GocharaPreset::NeutralBand => Self::neutral_band(),
        }
    }

    pub fn classical() -> Self {
        let sets = BTreeMap::from([
            (Body::Sun, HouseSets::new(&[3, 6, 10, 11], &[4, 7, 8, 9, 12])),
            (Body::Moon, HouseSets::new(&[1, 3, 6, 7, 10, 11], &[4, 8, 9, 12])),
            (Body::Mars, HouseSets::new(&[3, 6, 11], &[2, 4, 5, 7, 8, 9, 12])),
            (Body::Mercury, HouseSets::new(&[2, 4, 6, 8, 10, 11], &[7, 9, 12])),
            (Body::Jupiter, HouseSets::new(&[2, 5, 7, 9, 11], &[3, 12])),
            (Body::Venus, HouseSets::new(&[1, 2, 3, 4, 5, 8, 9, 11, 12], &[6, 7, 10])),
            (Body::Saturn, HouseSets::new(&[3, 6, 11], &[4, 5, 7, 8, 9, 12])),
            (Body::Rahu, HouseSets::new(&[3, 6, 10, 11], &[4, 7, 8, 9, 12])),
            (Body::Ketu, HouseSets::new(&[3, 6, 10, 11], &[4, 7, 8, 9, 12])),
        ]);
        Self {
            levels: GocharaLevels {
                high: 1.0,
                mid: 0.6,
                low: 0.25,
            },
            sets,
        }
    }

    pub fn neutral_band() -> Self {
        let sets = BTreeMap::from([
            (Body::Sun, HouseSets::with_neutral(&[3, 6, 10, 11], &[1, 2, 5])),
            (Body::Moon, HouseSets::with_neutral(&[1, 3, 6, 7, 10, 11], &[2, 5])),
            (Body::Mars, HouseSets::with_neutral(&[3, 6, 11], &[1, 10])),
            (Body::Mercury, HouseSets::with_neutral(&[2, 4, 6, 8, 10, 11], &[1, 3, 5])),
            (Body::Jupiter, HouseSets::with_neutral(&[2, 5, 7, 9, 11], &[1, 4, 6, 8, 10])),
            (Body::Venus, HouseSets::with_neutral(&[1, 2, 3, 4, 5, 8, 9, 11, 12], &[6, 7, 10])),
            (Body::Saturn, HouseSets::with_neutral(&[3, 6, 11], &[1, 2, 10])),
            (Body::Rahu, HouseSets::with_neutral(&[3, 6, 10, 11], &[1, 2, 5])),
            (Body::Ketu, HouseSets::with_neutral(&[3, 6, 10, 11], &[1, 2, 5])),
        ]);
        Self {
            levels: GocharaLevels {
                high: 0.85,
                mid: 0.55,
                low: 0.25,
            },
            sets,
        }
    }

    pub fn levels(&self) -> &GocharaLevels {
        &self.levels
    }

    pub fn sets(&self, body: Body) -> Option<&HouseSets> {
        self.sets.get(&body)
    }
}

/// Maps a body's house-count to a normalized favorability in `[0, 1]`.
pub trait GocharaScorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, body: Body, house: u8) -> f64;
}

/// Table-driven scorer: high if favorable, low if difficult, mid otherwise.
#[derive(Debug, Clone)]
pub struct TableGocharaScorer {
    table: GocharaTable,
}

impl TableGocharaScorer {
    pub fn new(table: GocharaTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GocharaTable {
        &self.table
    }
}

impl Default for TableGocharaScorer {
    fn default() -> Self {
        Self::new(GocharaTable::classical())
    }
}

impl GocharaScorer for TableGocharaScorer {
    fn name(&self) -> &str {
        "table_gochara"
    }

    fn score(&self, body: Body, house: u8) -> f64 {
        let levels = &self.table.levels;
        // Every body has an entry once the table is validated.
        match self.table.sets.get(&body) {
            Some(sets) if sets.favorable.contains(&house) => levels.high,
            Some(sets) if sets.difficult.contains(&house) => levels.low,
            _ => levels.mid,
        }
    }
}
