use crate::history::HistoryEntry;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct HistoryRow {
    timestamp: String,
    overall_score: u8,
    pronunciation: f64,
    fluency: f64,
    confidence: f64,
    expressiveness: f64,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(e: &HistoryEntry) -> Self {
        Self {
            timestamp: e.timestamp.to_rfc3339(),
            overall_score: e.overall_score,
            pronunciation: e.metrics.pronunciation(),
            fluency: e.metrics.fluency(),
            confidence: e.metrics.confidence(),
            expressiveness: e.metrics.expressiveness(),
        }
    }
}

/// Write history entries as CSV, one row per entry with a header line
pub fn write_history_csv<W: Write>(entries: &[HistoryEntry], writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if entries.is_empty() {
        wtr.write_record([
            "timestamp",
            "overall_score",
            "pronunciation",
            "fluency",
            "confidence",
            "expressiveness",
        ])?;
    }
    for entry in entries {
        wtr.serialize(HistoryRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::analyze;
    use crate::skill::SkillMetrics;

    #[test]
    fn test_rows_follow_header() {
        let result = analyze(SkillMetrics::new(80.0, 70.0, 60.0, 90.0).unwrap());
        let entries = vec![HistoryEntry::from(&result)];

        let mut buf = Vec::new();
        write_history_csv(&entries, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "timestamp,overall_score,pronunciation,fluency,confidence,expressiveness"
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(&format!(",{},80.0,70.0,60.0,90.0", result.overall_score)));
    }

    #[test]
    fn test_empty_history_still_has_header() {
        let mut buf = Vec::new();
        write_history_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap().trim_end(),
            "timestamp,overall_score,pronunciation,fluency,confidence,expressiveness"
        );
    }

    #[test]
    fn test_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let file = std::fs::File::create(&path).unwrap();
        write_history_csv(&[], file).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("timestamp"));
    }
}
