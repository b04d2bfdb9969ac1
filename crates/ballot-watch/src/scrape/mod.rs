//! Fetching availability pages and assembling one run's unit collection.

mod driver;
mod pacing;
mod request;
mod source;

pub use driver::{collect_units, sort_units, RunSnapshot, ScrapeError};
pub use pacing::{Pacing, DEFAULT_MAX_DELAY};
pub use request::{FlatQuery, SessionQuery, TownProfile, FLAT_CATEGORY};
pub use source::{FetchError, HttpPageSource, PageSource};
