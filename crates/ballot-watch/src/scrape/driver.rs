use super::pacing::Pacing;
use super::request::FlatQuery;
use super::source::{FetchError, PageSource};
use crate::config::BallotExercise;
use crate::units::{parse_units, ParseError, Unit};
use chrono::{DateTime, Utc};
use tracing::info;

/// A failed step of a scrape run. Any one of these aborts the whole run.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("could not open upstream session: {0}")]
    Session(#[source] FetchError),
    #[error("fetching {block} {flat_type} failed: {source}")]
    Fetch {
        block: String,
        flat_type: String,
        #[source]
        source: FetchError,
    },
    #[error("parsing {block} {flat_type} failed: {source}")]
    Parse {
        block: String,
        flat_type: String,
        #[source]
        source: ParseError,
    },
}

/// Every unit retrieved by one run, sorted for output.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSnapshot {
    pub timestamp: DateTime<Utc>,
    pub units: Vec<Unit>,
}

impl RunSnapshot {
    pub fn new(timestamp: DateTime<Utc>, mut units: Vec<Unit>) -> Self {
        sort_units(&mut units);
        Self { timestamp, units }
    }
}

/// Stable sort by [`Unit::sort_key`].
pub fn sort_units(units: &mut [Unit]) {
    units.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Visits every (block, flat type) pair of the exercise in order, one request
/// at a time, and returns the sorted collection.
pub async fn collect_units<S: PageSource>(
    pages: &mut S,
    exercise: &BallotExercise,
    pacing: Pacing,
) -> Result<RunSnapshot, ScrapeError> {
    info!(
        ballot_date = %exercise.ballot_date,
        requests = exercise.cohort_count(),
        "starting scrape"
    );

    pages.open_session().await.map_err(ScrapeError::Session)?;

    let mut units = Vec::new();
    let mut issued = 0usize;

    for plan in &exercise.blocks {
        for flat_type in &plan.flat_types {
            if issued > 0 {
                pacing.pause().await;
            }
            issued += 1;

            let query = FlatQuery::new(
                &plan.block,
                flat_type,
                &plan.contract,
                &exercise.ballot_date,
                exercise.town_profile(),
            );

            let html = pages
                .fetch_page(&query)
                .await
                .map_err(|source| ScrapeError::Fetch {
                    block: plan.block.clone(),
                    flat_type: flat_type.clone(),
                    source,
                })?;

            let found = parse_units(&html).map_err(|source| ScrapeError::Parse {
                block: plan.block.clone(),
                flat_type: flat_type.clone(),
                source,
            })?;

            info!(block = %plan.block, flat_type = %flat_type, count = found.len(), "found units");

            units.extend(
                found
                    .into_iter()
                    .map(|unit| unit.placed(plan.block.as_str(), flat_type.as_str())),
            );
        }
    }

    let snapshot = RunSnapshot::new(Utc::now(), units);
    info!(units = snapshot.units.len(), "scrape finished");
    Ok(snapshot)
}
