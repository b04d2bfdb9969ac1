use crate::units::{MalformedUnitId, Unit, UnitRow};
use ::csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CsvImportError {
    #[error("failed to read unit table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid unit table: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("unexpected unit table header: {found}")]
    Header { found: String },
    #[error(transparent)]
    UnitId(#[from] MalformedUnitId),
}

/// Header row followed by one row per unit, in the order given.
pub fn render_csv(units: &[Unit]) -> Result<Vec<u8>, ::csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(Unit::row_header())?;
    for unit in units {
        writer.serialize(unit.row())?;
    }

    writer
        .into_inner()
        .map_err(|err| ::csv::Error::from(err.into_error()))
}

pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Unit>, CsvImportError> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Loads units back from a table written by [`render_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Unit>, CsvImportError> {
    let mut csv_reader = ReaderBuilder::new().from_reader(reader);

    let headers = csv_reader.headers()?;
    if !headers.iter().eq(Unit::row_header()) {
        return Err(CsvImportError::Header {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut units = Vec::new();
    for record in csv_reader.deserialize::<UnitRow>() {
        units.push(Unit::try_from(record?)?);
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_units() -> Vec<Unit> {
        vec![
            Unit::available("#05-101", "$305,000 -\n$310,000", "93 sqm")
                .unwrap()
                .placed("114A", "2-Room Flexi (Short Lease/99-Year Lease)"),
            Unit::booked("#05-102")
                .unwrap()
                .placed("114A", "2-Room Flexi (Short Lease/99-Year Lease)"),
            Unit::available("#11-230", "$412,000", "113, sqm")
                .unwrap()
                .placed("114B", "4-Room"),
        ]
    }

    #[test]
    fn table_starts_with_fixed_header() {
        let bytes = render_csv(&sample_units()).expect("renders");
        let text = String::from_utf8(bytes).expect("utf-8");

        let mut lines = text.split("\r\n");
        assert_eq!(
            lines.next(),
            Some("block,flat_type,unit_no,floor,stack,status,size,cost")
        );
        assert_eq!(
            lines.next(),
            Some("114A,2-Room Flexi (Short Lease/99-Year Lease),#05-101,05,101,available,93 sqm,\"$305,000 -\n$310,000\"")
        );
    }

    #[test]
    fn empty_collection_still_writes_header() {
        let bytes = render_csv(&[]).expect("renders");
        assert_eq!(
            bytes,
            b"block,flat_type,unit_no,floor,stack,status,size,cost\r\n".to_vec()
        );
    }

    #[test]
    fn reading_back_recovers_every_row() {
        let units = sample_units();
        let bytes = render_csv(&units).expect("renders");

        let restored = read_csv(Cursor::new(bytes)).expect("reads");
        let original: Vec<UnitRow> = units.iter().map(Unit::row).collect();
        let recovered: Vec<UnitRow> = restored.iter().map(Unit::row).collect();
        assert_eq!(recovered, original);
    }

    #[test]
    fn foreign_header_is_rejected() {
        let err = read_csv(Cursor::new("Name,Created At\nx,y\n")).expect_err("bad header");
        match err {
            CsvImportError::Header { found } => assert_eq!(found, "Name,Created At"),
            other => panic!("expected header error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let csv = "block,flat_type,unit_no,floor,stack,status,size,cost\n107A,4-Room,#02-101,02,101,reserved,,\n";
        let err = read_csv(Cursor::new(csv)).expect_err("bad status");
        assert!(matches!(err, CsvImportError::Csv(_)));
    }
}
