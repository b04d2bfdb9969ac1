use crate::scrape::{SessionQuery, TownProfile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Flat search endpoint of the availability service.
pub const FLAT_SEARCH_URL: &str =
    "http://services2.hdb.gov.sg/webapp/BP13AWFlatAvail/BP13EBSFlatSearch";

const TWO_ROOM_FLEXI: &str = "2-Room Flexi (Short Lease/99-Year Lease)";

/// Names accepted by [`BallotExercise::preset`].
pub const PRESET_NAMES: [&str; 2] = ["bidadari-2015-11", "bidadari-2016-02"];

#[derive(Debug, thiserror::Error)]
pub enum ExerciseError {
    #[error("failed to read exercise file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid exercise definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset '{0}' (expected one of: {})", PRESET_NAMES.join(", "))]
    UnknownPreset(String),
    #[error("exercise lists no blocks")]
    NoBlocks,
    #[error("block {0} lists no flat types")]
    EmptyBlock(String),
    #[error("block {0} is listed more than once")]
    DuplicateBlock(String),
    #[error("block {block} lists {flat_type} more than once")]
    DuplicateFlatType { block: String, flat_type: String },
    #[error("exercise has an empty {0}")]
    MissingField(&'static str),
}

/// One building and the flat types balloted in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPlan {
    pub block: String,
    pub contract: String,
    pub flat_types: Vec<String>,
}

impl BlockPlan {
    pub fn new(block: &str, contract: &str, flat_types: &[&str]) -> Self {
        Self {
            block: block.to_string(),
            contract: contract.to_string(),
            flat_types: flat_types.iter().map(|flat| flat.to_string()).collect(),
        }
    }
}

/// Everything a scrape run needs to know about one ballot exercise.
///
/// Blocks are visited in list order; call [`BallotExercise::sorted`] for
/// deterministic output when the source order is arbitrary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotExercise {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_town")]
    pub town: String,
    #[serde(default = "default_neighbourhood")]
    pub neighbourhood: String,
    #[serde(default = "default_session_flat_type")]
    pub session_flat_type: String,
    pub ballot_date: String,
    pub output_stem: String,
    pub blocks: Vec<BlockPlan>,
    pub expected_counts: BTreeMap<String, usize>,
}

fn default_url() -> String {
    FLAT_SEARCH_URL.to_string()
}

fn default_town() -> String {
    "Toa Payoh".to_string()
}

fn default_neighbourhood() -> String {
    "N9".to_string()
}

fn default_session_flat_type() -> String {
    "4-Room".to_string()
}

impl BallotExercise {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExerciseError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ExerciseError> {
        let exercise: Self = serde_json::from_reader(reader)?;
        exercise.validate()?;
        Ok(exercise)
    }

    pub fn preset(name: &str) -> Result<Self, ExerciseError> {
        match name {
            "bidadari-2015-11" => Ok(Self::bidadari_2015_11()),
            "bidadari-2016-02" => Ok(Self::bidadari_2016_02()),
            other => Err(ExerciseError::UnknownPreset(other.to_string())),
        }
    }

    /// Bidadari, November 2015 selection exercise.
    pub fn bidadari_2015_11() -> Self {
        let blocks = vec![
            BlockPlan::new("101A", "C1", &[TWO_ROOM_FLEXI, "3-Room", "4-Room"]),
            BlockPlan::new("102A", "C1", &[TWO_ROOM_FLEXI, "4-Room"]),
            BlockPlan::new("102B", "C1", &["3-Room", "4-Room"]),
            BlockPlan::new("103A", "C1", &["3-Room", "4-Room"]),
            BlockPlan::new("103B", "C1", &["3-Room", "4-Room"]),
            BlockPlan::new("104A", "C1", &[TWO_ROOM_FLEXI, "3-Room", "4-Room"]),
            BlockPlan::new("105A", "C4", &["4-Room", "5-Room"]),
            BlockPlan::new("105B", "C4", &["4-Room", "5-Room"]),
            BlockPlan::new("106A", "C4", &["4-Room", "5-Room"]),
            BlockPlan::new("106B", "C4", &["4-Room", "5-Room"]),
            BlockPlan::new("115A", "C3", &["3-Room", "4-Room"]),
            BlockPlan::new("115C", "C3", &["3-Room", "4-Room"]),
            BlockPlan::new("118A", "C3", &["3-Room", "4-Room"]),
        ];

        Self::toa_payoh(
            "201511",
            "bidadari",
            blocks,
            &[
                (TWO_ROOM_FLEXI, 192),
                ("3-Room", 567),
                ("4-Room", 1229),
                ("5-Room", 151),
            ],
        )
    }

    /// Bidadari, February 2016 selection exercise.
    pub fn bidadari_2016_02() -> Self {
        let blocks = vec![
            BlockPlan::new("107A", "C7", &["3-Room", "4-Room", "5-Room"]),
            BlockPlan::new("107B", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("108A", "C7", &["3-Room", "4-Room"]),
            BlockPlan::new("108B", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("109A", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("109B", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("110A", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("110B", "C7", &["4-Room", "5-Room"]),
            BlockPlan::new("111A", "C6", &[TWO_ROOM_FLEXI, "4-Room"]),
            BlockPlan::new("111B", "C6", &[TWO_ROOM_FLEXI, "4-Room"]),
            BlockPlan::new("112A", "C6", &[TWO_ROOM_FLEXI, "4-Room"]),
            BlockPlan::new("112B", "C6", &["3-Room", "4-Room"]),
            BlockPlan::new("113A", "C6", &["3-Room", "4-Room"]),
            BlockPlan::new("113B", "C6", &["3-Room", "4-Room"]),
            BlockPlan::new("114A", "C6", &[TWO_ROOM_FLEXI, "3-Room", "4-Room"]),
            BlockPlan::new("114B", "C6", &[TWO_ROOM_FLEXI, "3-Room", "4-Room"]),
        ];

        Self::toa_payoh(
            "201602",
            "bidadari_2",
            blocks,
            &[
                (TWO_ROOM_FLEXI, 218),
                ("3-Room", 340),
                ("4-Room", 800),
                ("5-Room", 236),
            ],
        )
    }

    fn toa_payoh(
        ballot_date: &str,
        output_stem: &str,
        blocks: Vec<BlockPlan>,
        expected: &[(&str, usize)],
    ) -> Self {
        Self {
            url: default_url(),
            town: default_town(),
            neighbourhood: default_neighbourhood(),
            session_flat_type: default_session_flat_type(),
            ballot_date: ballot_date.to_string(),
            output_stem: output_stem.to_string(),
            blocks,
            expected_counts: expected
                .iter()
                .map(|(flat_type, count)| (flat_type.to_string(), *count))
                .collect(),
        }
    }

    /// Same exercise with blocks ordered by identifier.
    pub fn sorted(mut self) -> Self {
        self.blocks.sort_by(|a, b| a.block.cmp(&b.block));
        self
    }

    pub fn validate(&self) -> Result<(), ExerciseError> {
        if self.ballot_date.trim().is_empty() {
            return Err(ExerciseError::MissingField("ballot date"));
        }
        if self.output_stem.trim().is_empty() {
            return Err(ExerciseError::MissingField("output stem"));
        }
        if self.blocks.is_empty() {
            return Err(ExerciseError::NoBlocks);
        }

        let mut seen = HashSet::new();
        for plan in &self.blocks {
            if plan.flat_types.is_empty() {
                return Err(ExerciseError::EmptyBlock(plan.block.clone()));
            }
            if !seen.insert(plan.block.as_str()) {
                return Err(ExerciseError::DuplicateBlock(plan.block.clone()));
            }

            let mut flat_types = HashSet::new();
            for flat_type in &plan.flat_types {
                if !flat_types.insert(flat_type.as_str()) {
                    return Err(ExerciseError::DuplicateFlatType {
                        block: plan.block.clone(),
                        flat_type: flat_type.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn town_profile(&self) -> TownProfile<'_> {
        TownProfile {
            town: &self.town,
            neighbourhood: &self.neighbourhood,
        }
    }

    pub fn session_query(&self) -> SessionQuery {
        SessionQuery::new(&self.town, &self.session_flat_type, &self.ballot_date)
    }

    /// Number of (block, flat type) requests a run issues.
    pub fn cohort_count(&self) -> usize {
        self.blocks.iter().map(|plan| plan.flat_types.len()).sum()
    }
}
