use crate::error::{AcademyError, Result};
use crate::scoring::AnalysisResult;
use crate::skill::SkillMetrics;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Number of analyses retained per user
pub const HISTORY_CAPACITY: usize = 10;

/// Trimmed snapshot of one analysis kept in a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub overall_score: u8,
    pub metrics: SkillMetrics,
}

impl From<&AnalysisResult> for HistoryEntry {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            timestamp: result.timestamp,
            overall_score: result.overall_score,
            metrics: result.metrics,
        }
    }
}

/// Bounded, oldest-first history. Inserting past capacity evicts the
/// chronologically oldest entry; entries are never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisHistory {
    entries: Vec<HistoryEntry>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from entries persisted elsewhere
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Result<Self> {
        if entries.len() > HISTORY_CAPACITY {
            return Err(AcademyError::InvalidHistory(format!(
                "{} entries exceed the capacity of {}",
                entries.len(),
                HISTORY_CAPACITY
            )));
        }
        validate_entries(&entries)?;
        Ok(Self { entries })
    }

    /// Insert an entry at its timestamp position, after any entries with the
    /// same timestamp. Returns the evicted oldest entry if the history was full.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let pos = self
            .entries
            .partition_point(|e| e.timestamp <= entry.timestamp);
        self.entries.insert(pos, entry);
        if self.entries.len() > HISTORY_CAPACITY {
            Some(self.entries.remove(0))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entries must be oldest first and carry an overall score of at most 100
pub fn validate_entries(entries: &[HistoryEntry]) -> Result<()> {
    if let Some(entry) = entries.iter().find(|e| e.overall_score > 100) {
        return Err(AcademyError::InvalidHistory(format!(
            "overall score {} at {} is above 100",
            entry.overall_score, entry.timestamp
        )));
    }
    if let Some(pair) = entries
        .windows(2)
        .find(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        return Err(AcademyError::InvalidHistory(format!(
            "entry at {} precedes the one before it at {}",
            pair[1].timestamp, pair[0].timestamp
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    fn entry(minute: i64, score: u8) -> HistoryEntry {
        let base = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        HistoryEntry {
            timestamp: base + Duration::minutes(minute),
            overall_score: score,
            metrics: SkillMetrics::uniform(score.min(100) as f64).unwrap(),
        }
    }

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = AnalysisHistory::new();
        for i in 0..HISTORY_CAPACITY as i64 {
            assert!(history.push(entry(i, 50)).is_none());
        }
        let evicted = history.push(entry(100, 60)).unwrap();
        assert_eq!(evicted, entry(0, 50));
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], entry(1, 50));
        assert_eq!(history.latest(), Some(&entry(100, 60)));
    }

    #[test]
    fn test_push_keeps_chronological_order() {
        let mut history = AnalysisHistory::new();
        history.push(entry(0, 10));
        history.push(entry(5, 30));
        history.push(entry(2, 20));
        history.push(entry(5, 40));
        let scores: Vec<u8> = history.entries().iter().map(|e| e.overall_score).collect();
        assert_eq!(scores, vec![10, 20, 30, 40]);
        assert!(validate_entries(history.entries()).is_ok());
    }

    #[test]
    fn test_late_entry_older_than_full_history_is_evicted() {
        let mut history = AnalysisHistory::new();
        for i in 1..=HISTORY_CAPACITY as i64 {
            history.push(entry(i, 50));
        }
        assert_eq!(history.push(entry(0, 99)), Some(entry(0, 99)));
        assert_eq!(history.entries()[0], entry(1, 50));

        // a late entry newer than the oldest displaces the oldest instead
        assert_eq!(history.push(entry(3, 70)), Some(entry(1, 50)));
        assert_eq!(history.entries()[2], entry(3, 70));
        assert_eq!(history.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_from_entries_validates() {
        assert!(AnalysisHistory::from_entries(vec![entry(0, 10), entry(1, 20)]).is_ok());

        assert_matches!(
            AnalysisHistory::from_entries(vec![entry(5, 10), entry(1, 20)]),
            Err(AcademyError::InvalidHistory(_))
        );

        let too_many = (0..11).map(|i| entry(i, 10)).collect();
        assert_matches!(
            AnalysisHistory::from_entries(too_many),
            Err(AcademyError::InvalidHistory(_))
        );

        assert_matches!(
            validate_entries(&[entry(0, 101)]),
            Err(AcademyError::InvalidHistory(_))
        );
    }

    #[test]
    fn test_equal_timestamps_are_ordered() {
        assert!(validate_entries(&[entry(3, 10), entry(3, 20)]).is_ok());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut history = AnalysisHistory::new();
        history.push(entry(0, 70));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["overall_score"], 70);
    }
}
