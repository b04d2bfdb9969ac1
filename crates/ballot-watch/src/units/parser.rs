use super::model::{MalformedUnitId, Unit};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Separator between cost and size inside an available unit's `title` attribute.
pub const TITLE_DELIMITER: &str = "____________________";

/// Position (0-indexed) of the `.row` element that holds the unit table.
const UNIT_ROW_INDEX: usize = 4;

static BLOCK_DETAILS: LazyLock<Selector> = LazyLock::new(|| selector("#blockDetails"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector(".row"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static FONT: LazyLock<Selector> = LazyLock::new(|| selector("font"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// The response page did not have the layout the parser expects.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("page has no element with id 'blockDetails'")]
    MissingBlockDetails,
    #[error("block details hold {found} row(s); the unit table is row {}", UNIT_ROW_INDEX + 1)]
    MissingUnitRow { found: usize },
    #[error("unit cell {cell} has no font element")]
    MissingFont { cell: usize },
    #[error("unit cell {cell} font element has no '{attribute}' attribute")]
    MissingAttribute {
        cell: usize,
        attribute: &'static str,
    },
    #[error("unit cell {cell} title does not split into cost and size: {title:?}")]
    MalformedTitle { cell: usize, title: String },
    #[error(transparent)]
    UnitId(#[from] MalformedUnitId),
}

/// Extracts one [`Unit`] per table cell of the unit row, in document order.
///
/// Block and flat type are left unassigned. An unexpected layout is an error
/// rather than an empty list, since it usually means an error page came back.
pub fn parse_units(html: &str) -> Result<Vec<Unit>, ParseError> {
    let document = Html::parse_document(html);

    let block_details = document
        .select(&BLOCK_DETAILS)
        .next()
        .ok_or(ParseError::MissingBlockDetails)?;

    let rows: Vec<ElementRef<'_>> = block_details.select(&ROW).collect();
    let unit_row = rows
        .get(UNIT_ROW_INDEX)
        .ok_or(ParseError::MissingUnitRow { found: rows.len() })?;

    unit_row
        .select(&CELL)
        .enumerate()
        .map(|(cell, element)| parse_cell(cell, element))
        .collect()
}

fn parse_cell(cell: usize, element: ElementRef<'_>) -> Result<Unit, ParseError> {
    let font = element
        .select(&FONT)
        .next()
        .ok_or(ParseError::MissingFont { cell })?;

    // Only selectable (unbooked) units are rendered as links.
    if element.select(&ANCHOR).next().is_none() {
        let unit_no = font.text().collect::<String>();
        return Ok(Unit::booked(unit_no.trim())?);
    }

    let unit_no = attribute(cell, font, "id")?;
    let title = attribute(cell, font, "title")?;
    let (cost, size) = split_title(&title).ok_or_else(|| ParseError::MalformedTitle {
        cell,
        title: title.clone(),
    })?;

    Ok(Unit::available(unit_no, cost, size)?)
}

fn attribute(cell: usize, font: ElementRef<'_>, attribute: &'static str) -> Result<String, ParseError> {
    font.value()
        .attr(attribute)
        .map(str::to_string)
        .ok_or(ParseError::MissingAttribute { cell, attribute })
}

fn split_title(title: &str) -> Option<(String, String)> {
    let normalized = title.replace('\u{a0}', " ").replace("<br/>", "\n");
    let mut parts = normalized.split(TITLE_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cost), Some(size), None) => Some((cost.trim().to_string(), size.trim().to_string())),
        _ => None,
    }
}
