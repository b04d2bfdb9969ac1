//! Housing unit records and the HTML parser that produces them.

mod model;
mod parser;

pub use model::{MalformedUnitId, Unit, UnitRow, UnitStatus, UNIT_FIELDS_V1};
pub use parser::{parse_units, ParseError, TITLE_DELIMITER};
