use crate::config::BallotExercise;
use crate::units::Unit;
use chrono::DateTime;
use chrono::TimeZone;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Line written when retrieved totals agree with the expected table.
pub const HEALTH_OK_MARKER: &str = "###OK###";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("no {flat_type} units retrieved{}; the exercise lists a cohort that does not exist", block_suffix(.block))]
    ZeroAvailableUnits {
        block: Option<String>,
        flat_type: String,
    },
}

fn block_suffix(block: &Option<String>) -> String {
    match block {
        Some(block) => format!(" in block {block}"),
        None => String::new(),
    }
}

/// Retrieved versus expected unit totals per flat type, sorted by flat type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub retrieved: Vec<(String, usize)>,
    pub expected: Vec<(String, usize)>,
}

impl HealthCheck {
    pub fn is_ok(&self) -> bool {
        self.retrieved == self.expected
    }
}

/// Counts retrieved units for every flat type named in the expected table.
/// Flat types missing from the table are not counted.
pub fn reconcile(units: &[Unit], expected: &BTreeMap<String, usize>) -> HealthCheck {
    let retrieved = expected
        .keys()
        .map(|flat_type| {
            let count = units
                .iter()
                .filter(|unit| unit.flat_type() == flat_type.as_str())
                .count();
            (flat_type.clone(), count)
        })
        .collect();

    HealthCheck {
        retrieved,
        expected: expected
            .iter()
            .map(|(flat_type, count)| (flat_type.clone(), *count))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionStat {
    pub flat_type: String,
    pub booked: usize,
    pub total: usize,
    pub percent: f64,
}

impl SelectionStat {
    fn tally<'a>(
        flat_type: &str,
        block: Option<&str>,
        units: impl Iterator<Item = &'a Unit>,
    ) -> Result<Self, StatsError> {
        let (booked, total) = units
            .filter(|unit| unit.flat_type() == flat_type)
            .fold((0, 0), |(booked, total), unit| {
                (booked + usize::from(unit.is_booked()), total + 1)
            });

        if total == 0 {
            return Err(StatsError::ZeroAvailableUnits {
                block: block.map(str::to_string),
                flat_type: flat_type.to_string(),
            });
        }

        Ok(Self {
            flat_type: flat_type.to_string(),
            booked,
            total,
            percent: booked as f64 / total as f64 * 100.0,
        })
    }
}

impl Display for SelectionStat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} ({:.2}%) selected",
            self.flat_type, self.booked, self.total, self.percent
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStats {
    pub block: String,
    pub entries: Vec<SelectionStat>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatsReport {
    /// Totals reconciled; selection rates follow.
    Matched {
        cumulative: Vec<SelectionStat>,
        per_block: Vec<BlockStats>,
    },
    /// Totals disagree, so no rates are computed.
    Mismatch(HealthCheck),
}

impl StatsReport {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Reconciles the units against the expected table and, only when the
/// totals agree, computes selection rates overall and per block.
pub fn compute_stats(units: &[Unit], exercise: &BallotExercise) -> Result<StatsReport, StatsError> {
    let health = reconcile(units, &exercise.expected_counts);
    if !health.is_ok() {
        return Ok(StatsReport::Mismatch(health));
    }

    let cumulative = exercise
        .expected_counts
        .keys()
        .map(|flat_type| SelectionStat::tally(flat_type, None, units.iter()))
        .collect::<Result<Vec<_>, _>>()?;

    let per_block = exercise
        .blocks
        .iter()
        .map(|plan| {
            let entries = plan
                .flat_types
                .iter()
                .map(|flat_type| {
                    SelectionStat::tally(
                        flat_type,
                        Some(plan.block.as_str()),
                        units.iter().filter(|unit| unit.block() == plan.block),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BlockStats {
                block: plan.block.clone(),
                entries,
            })
        })
        .collect::<Result<Vec<_>, StatsError>>()?;

    Ok(StatsReport::Matched {
        cumulative,
        per_block,
    })
}

/// Renders counts as a tuple of pairs, e.g. `(('3-Room', 340), ('4-Room', 800))`.
pub fn count_tuple(counts: &[(String, usize)]) -> String {
    let pairs: Vec<String> = counts
        .iter()
        .map(|(flat_type, count)| format!("({}, {count})", quoted(flat_type)))
        .collect();

    match pairs.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", pairs.join(", ")),
    }
}

/// String literal notation: single quotes unless the text holds a single
/// quote and no double quote, with backslashes and control characters escaped.
fn quoted(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_ascii_control() => out.push_str(&format!("\\x{:02x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out.push(quote);
    out
}

/// Human-readable health and statistics report.
pub fn render_log<Tz>(report: &StatsReport, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![
        format!("Time: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
        "Health check".to_string(),
    ];

    match report {
        StatsReport::Mismatch(health) => {
            lines.push(String::new());
            lines.push("\tTotal retrieved flats did not match expected count.".to_string());
            lines.push(format!("\tRetrieved: {}", count_tuple(&health.retrieved)));
            lines.push(format!("\tExpected: {}", count_tuple(&health.expected)));
        }
        StatsReport::Matched {
            cumulative,
            per_block,
        } => {
            lines.push(HEALTH_OK_MARKER.to_string());

            lines.push(String::new());
            lines.push("Cumulative Selected Stats".to_string());
            lines.extend(cumulative.iter().map(|stat| format!("\t{stat}")));

            lines.push(String::new());
            lines.push("Per Block Selected Stats".to_string());
            for block in per_block {
                lines.push(format!("\t{}", block.block));
                lines.extend(block.entries.iter().map(|stat| format!("\t{stat}")));
                lines.push(String::new());
            }
        }
    }

    lines.into_iter().map(|line| line + "\n").collect()
}
