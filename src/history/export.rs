//! CSV serialization of the history.

use chrono::TimeZone;
use std::fmt::Display;

use super::{HistoryError, Recommendation};
use crate::fields::{
    CROP_TYPE, HUMIDITY, MOISTURE, NITROGEN, PHOSPHORUS, POTASSIUM, SOIL_TYPE, TEMPERATURE,
};

/// Column order of the exported document
pub const CSV_HEADERS: [&str; 12] = [
    "Date",
    "Time",
    "Fertilizer",
    "Confidence",
    "Crop Type",
    "Soil Type",
    "Temperature",
    "Humidity",
    "Moisture",
    "Nitrogen",
    "Phosphorus",
    "Potassium",
];

const INPUT_COLUMNS: [&str; 8] = [
    CROP_TYPE,
    SOIL_TYPE,
    TEMPERATURE,
    HUMIDITY,
    MOISTURE,
    NITROGEN,
    PHOSPHORUS,
    POTASSIUM,
];

/// Serialize `records` with every field quoted, rendering dates in `tz`.
///
/// Embedded quotes are doubled and line breaks inside a field become spaces,
/// so each record is exactly one line. An empty slice yields only the header
/// line.
pub fn to_csv_at<Tz>(records: &[Recommendation], tz: &Tz) -> Result<String, HistoryError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(row(record, tz).iter().map(|field| single_line(field)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HistoryError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Collapse CR, LF and CRLF to a single space
fn single_line(field: &str) -> String {
    field.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn row<Tz>(record: &Recommendation, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (date, time) = match record.created_at() {
        Some(at) => {
            let local = at.with_timezone(tz);
            (
                local.format("%-m/%-d/%Y").to_string(),
                local.format("%-I:%M:%S %p").to_string(),
            )
        }
        None => (record.timestamp.clone(), String::new()),
    };

    let mut fields = Vec::with_capacity(CSV_HEADERS.len());
    fields.push(date);
    fields.push(time);
    fields.push(record.fertilizer.clone());
    fields.push(record.confidence.to_string());
    fields.extend(INPUT_COLUMNS.iter().map(|name| {
        record
            .inputs
            .get(*name)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{InputValue, Inputs};
    use chrono::{FixedOffset, Utc};

    fn sample(fertilizer: &str) -> Recommendation {
        let mut inputs = Inputs::new();
        inputs.insert(TEMPERATURE.into(), InputValue::Number(26.0));
        inputs.insert(HUMIDITY.into(), InputValue::Number(52.0));
        inputs.insert(MOISTURE.into(), InputValue::Number(38.0));
        inputs.insert(NITROGEN.into(), InputValue::Number(37.0));
        inputs.insert(PHOSPHORUS.into(), InputValue::Number(0.0));
        inputs.insert(POTASSIUM.into(), InputValue::Number(0.0));
        inputs.insert(SOIL_TYPE.into(), "Sandy".into());
        inputs.insert(CROP_TYPE.into(), "Maize".into());
        Recommendation {
            id: 1,
            timestamp: "2024-05-01T14:05:09.000Z".to_string(),
            inputs,
            fertilizer: fertilizer.to_string(),
            confidence: 87.5,
        }
    }

    #[test]
    fn test_empty_history_is_header_only() {
        let csv = to_csv_at(&[], &Utc).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert_eq!(
            csv.lines().next().unwrap(),
            "\"Date\",\"Time\",\"Fertilizer\",\"Confidence\",\"Crop Type\",\"Soil Type\",\
             \"Temperature\",\"Humidity\",\"Moisture\",\"Nitrogen\",\"Phosphorus\",\"Potassium\""
        );
    }

    #[test]
    fn test_row_layout() {
        let csv = to_csv_at(&[sample("Urea")], &Utc).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\"5/1/2024\",\"2:05:09 PM\",\"Urea\",\"87.5\",\"Maize\",\"Sandy\",\
             \"26\",\"52\",\"38\",\"37\",\"0\",\"0\""
        );
    }

    #[test]
    fn test_dates_follow_timezone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let csv = to_csv_at(&[sample("Urea")], &ist).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"5/1/2024\",\"7:35:09 PM\""));
    }

    #[test]
    fn test_missing_inputs_render_empty() {
        let mut rec = sample("DAP");
        rec.inputs.clear();
        let csv = to_csv_at(&[rec], &Utc).unwrap();
        assert!(csv
            .lines()
            .nth(1)
            .unwrap()
            .ends_with("\"DAP\",\"87.5\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\""));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let doc = to_csv_at(&[sample("10-26-26 \"Premium\"")], &Utc).unwrap();
        assert!(doc.contains("\"10-26-26 \"\"Premium\"\"\""));

        let mut reader = csv::ReaderBuilder::new().from_reader(doc.as_bytes());
        let parsed = reader.records().next().unwrap().unwrap();
        assert_eq!(&parsed[2], "10-26-26 \"Premium\"");
    }

    #[test]
    fn test_line_breaks_stay_inside_one_line() {
        let mut rec = sample("Urea");
        rec.inputs.insert(SOIL_TYPE.into(), "Sandy\nLoam".into());
        rec.inputs.insert(CROP_TYPE.into(), "Ground\r\nnut".into());

        let doc = to_csv_at(&[rec.clone(), rec], &Utc).unwrap();
        assert_eq!(doc.lines().count(), 3);
        assert!(doc
            .lines()
            .nth(1)
            .unwrap()
            .contains("\"Ground nut\",\"Sandy Loam\""));
    }

    #[test]
    fn test_bad_timestamp_passes_through() {
        let mut rec = sample("DAP");
        rec.timestamp = "sometime".to_string();
        let csv = to_csv_at(&[rec], &Utc).unwrap();
        assert!(csv.lines().nth(1).unwrap().starts_with("\"sometime\",\"\","));
    }
}
