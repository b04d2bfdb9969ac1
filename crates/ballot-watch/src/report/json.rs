use crate::scrape::RunSnapshot;
use crate::units::Unit;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    timestamp: String,
    units: &'a [Unit],
}

/// ISO-8601 with an explicit `+00:00` offset and microsecond precision.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn render_json(snapshot: &RunSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SnapshotDocument {
        timestamp: format_timestamp(&snapshot.timestamp),
        units: &snapshot.units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    #[test]
    fn document_has_timestamp_and_units() {
        let timestamp = Utc.with_ymd_and_hms(2016, 2, 20, 8, 30, 0).unwrap();
        let snapshot = RunSnapshot::new(
            timestamp,
            vec![
                Unit::available("#05-101", "$250,000", "90 sqm")
                    .unwrap()
                    .placed("107A", "4-Room"),
                Unit::booked("#05-102").unwrap().placed("107A", "4-Room"),
            ],
        );

        let text = render_json(&snapshot).expect("renders");
        assert!(text.starts_with(r#"{"timestamp":"2016-02-20T08:30:00.000000+00:00","units":["#));

        let value: Value = serde_json::from_str(&text).expect("valid json");
        let units = value["units"].as_array().expect("units array");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0]["unit_no"], "#05-101");
        assert_eq!(units[0]["cost"], "$250,000");
        assert_eq!(units[1]["booked"], true);
        assert_eq!(units[1]["size"], "");
    }
}
