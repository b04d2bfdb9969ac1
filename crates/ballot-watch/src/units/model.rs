use serde::{Deserialize, Serialize};
use std::fmt;

/// Field names of the JSON unit schema, in the order they are emitted.
///
/// The order is alphabetical and is fixed by the declaration order of [`Unit`].
/// Adding or renaming a field is a schema change and needs a new list.
pub const UNIT_FIELDS_V1: [&str; 8] = [
    "block",
    "booked",
    "cost",
    "flat_type",
    "floor",
    "size",
    "stack",
    "unit_no",
];

/// Raised when a unit number does not split into exactly one floor and one stack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unit number '{unit_no}' does not split into floor and stack")]
pub struct MalformedUnitId {
    pub unit_no: String,
}

/// Booking state shown for a unit slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Booked,
    Available,
}

impl UnitStatus {
    pub const fn from_booked(booked: bool) -> Self {
        if booked {
            Self::Booked
        } else {
            Self::Available
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Available => "available",
        }
    }

    pub const fn is_booked(self) -> bool {
        matches!(self, Self::Booked)
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One housing unit within a block and flat-type cohort.
///
/// Fields are declared in alphabetical order so the serialized JSON object
/// matches [`UNIT_FIELDS_V1`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    block: String,
    booked: bool,
    cost: String,
    flat_type: String,
    floor: String,
    size: String,
    stack: String,
    unit_no: String,
}

impl Unit {
    /// Builds a unit from the raw cell fields, deriving floor and stack from
    /// `unit_no`. Block and flat type stay empty until [`Unit::placed`].
    pub fn new(
        unit_no: impl Into<String>,
        booked: bool,
        cost: impl Into<String>,
        size: impl Into<String>,
    ) -> Result<Self, MalformedUnitId> {
        let unit_no = unit_no.into();
        let (floor, stack) = split_unit_no(&unit_no)?;

        Ok(Self {
            block: String::new(),
            booked,
            cost: cost.into(),
            flat_type: String::new(),
            floor,
            size: size.into(),
            stack,
            unit_no,
        })
    }

    pub fn booked(unit_no: impl Into<String>) -> Result<Self, MalformedUnitId> {
        Self::new(unit_no, true, String::new(), String::new())
    }

    pub fn available(
        unit_no: impl Into<String>,
        cost: impl Into<String>,
        size: impl Into<String>,
    ) -> Result<Self, MalformedUnitId> {
        Self::new(unit_no, false, cost, size)
    }

    /// Assigns the cohort the unit was fetched for.
    pub fn placed(mut self, block: impl Into<String>, flat_type: impl Into<String>) -> Self {
        self.block = block.into();
        self.flat_type = flat_type.into();
        self
    }

    pub fn unit_no(&self) -> &str {
        &self.unit_no
    }

    pub fn is_booked(&self) -> bool {
        self.booked
    }

    pub fn status(&self) -> UnitStatus {
        UnitStatus::from_booked(self.booked)
    }

    pub fn cost(&self) -> &str {
        &self.cost
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn floor(&self) -> &str {
        &self.floor
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn flat_type(&self) -> &str {
        &self.flat_type
    }

    /// Ordering key for output artifacts. Comparison is lexicographic on the
    /// strings exactly as the upstream page reports them.
    pub fn sort_key(&self) -> (&str, &str, &str, &str) {
        (&self.block, &self.flat_type, &self.stack, &self.floor)
    }

    pub fn row(&self) -> UnitRow {
        UnitRow {
            block: self.block.clone(),
            flat_type: self.flat_type.clone(),
            unit_no: self.unit_no.clone(),
            floor: self.floor.clone(),
            stack: self.stack.clone(),
            status: self.status(),
            size: self.size.clone(),
            cost: self.cost.clone(),
        }
    }

    pub const fn row_header() -> [&'static str; 8] {
        [
            "block",
            "flat_type",
            "unit_no",
            "floor",
            "stack",
            "status",
            "size",
            "cost",
        ]
    }
}

impl TryFrom<UnitRow> for Unit {
    type Error = MalformedUnitId;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        let unit = Unit::new(row.unit_no, row.status.is_booked(), row.cost, row.size)?;
        Ok(unit.placed(row.block, row.flat_type))
    }
}

/// Flat CSV view of a unit, columns in [`Unit::row_header`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRow {
    pub block: String,
    pub flat_type: String,
    pub unit_no: String,
    pub floor: String,
    pub stack: String,
    pub status: UnitStatus,
    pub size: String,
    pub cost: String,
}

fn split_unit_no(unit_no: &str) -> Result<(String, String), MalformedUnitId> {
    let malformed = || MalformedUnitId {
        unit_no: unit_no.to_string(),
    };

    let mut chars = unit_no.chars();
    chars.next().ok_or_else(malformed)?;
    let remainder = chars.as_str();

    let mut parts = remainder.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(floor), Some(stack), None) => Ok((floor.to_string(), stack.to_string())),
        _ => Err(malformed()),
    }
}
