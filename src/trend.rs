use crate::error::Result;
use crate::history::{validate_entries, HistoryEntry};
use crate::skill::Skill;
use crate::util::mean;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most recent entries considered when classifying a trend
pub const TREND_WINDOW: usize = 5;

/// Minimum change in mean score that counts as movement
pub const TREND_THRESHOLD: f64 = 2.0;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Declining,
}

pub type SkillTrends = BTreeMap<Skill, Trend>;

/// Classify a chronological series by comparing the mean of its older half
/// with the mean of its newer half. Only the last [`TREND_WINDOW`] values
/// are used.
pub fn classify_series(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let window = &values[values.len().saturating_sub(TREND_WINDOW)..];
    let (older, newer) = window.split_at(window.len() / 2);

    match (mean(older.iter().copied()), mean(newer.iter().copied())) {
        (Some(before), Some(after)) => {
            let difference = after - before;
            if difference > TREND_THRESHOLD {
                Trend::Improving
            } else if difference < -TREND_THRESHOLD {
                Trend::Declining
            } else {
                Trend::Stable
            }
        }
        _ => Trend::Stable,
    }
}

/// Trend of the overall score across a chronological history
pub fn classify_trend(history: &[HistoryEntry]) -> Result<Trend> {
    validate_entries(history)?;
    let scores: Vec<f64> = history.iter().map(|e| e.overall_score as f64).collect();
    Ok(classify_series(&scores))
}

/// Same rule as [`classify_trend`], applied to each skill separately
pub fn classify_skill_trends(history: &[HistoryEntry]) -> Result<SkillTrends> {
    validate_entries(history)?;
    Ok(Skill::ALL
        .iter()
        .map(|&skill| {
            let scores: Vec<f64> = history.iter().map(|e| e.metrics.get(skill)).collect();
            (skill, classify_series(&scores))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AcademyError;
    use crate::skill::SkillMetrics;
    use assert_matches::assert_matches;
    use chrono::{Duration, Local, TimeZone};

    fn history(scores: &[u8]) -> Vec<HistoryEntry> {
        let base = Local.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| HistoryEntry {
                timestamp: base + Duration::hours(i as i64),
                overall_score: score,
                metrics: SkillMetrics::uniform(score as f64).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_short_histories_are_stable() {
        assert_eq!(classify_trend(&[]).unwrap(), Trend::Stable);
        assert_eq!(classify_trend(&history(&[40])).unwrap(), Trend::Stable);
    }

    #[test]
    fn test_improving() {
        assert_eq!(
            classify_trend(&history(&[60, 60, 90, 90])).unwrap(),
            Trend::Improving
        );
    }

    #[test]
    fn test_declining() {
        assert_eq!(classify_trend(&history(&[90, 70])).unwrap(), Trend::Declining);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // +2 exactly is still stable
        assert_eq!(classify_trend(&history(&[70, 72])).unwrap(), Trend::Stable);
        assert_eq!(classify_trend(&history(&[70, 73])).unwrap(), Trend::Improving);
        assert_eq!(classify_trend(&history(&[72, 70])).unwrap(), Trend::Stable);
        assert_eq!(classify_trend(&history(&[73, 70])).unwrap(), Trend::Declining);
    }

    #[test]
    fn test_odd_window_puts_middle_in_newer_half() {
        // older = [60], newer = [60, 66] -> +3
        assert_eq!(classify_series(&[60.0, 60.0, 66.0]), Trend::Improving);
    }

    #[test]
    fn test_only_last_five_count() {
        // early high scores fall outside the window
        let h = history(&[100, 100, 100, 50, 50, 50, 50, 50]);
        assert_eq!(classify_trend(&h).unwrap(), Trend::Stable);
    }

    #[test]
    fn test_idempotent() {
        let h = history(&[55, 61, 58, 70, 64, 80]);
        let first = classify_trend(&h).unwrap();
        assert_eq!(first, classify_trend(&h).unwrap());
    }

    #[test]
    fn test_rejects_unordered_history() {
        let mut h = history(&[50, 60, 70]);
        h.swap(0, 2);
        assert_matches!(classify_trend(&h), Err(AcademyError::InvalidHistory(_)));
    }

    #[test]
    fn test_skill_trends() {
        let base = Local.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap();
        let h: Vec<HistoryEntry> = [(50.0, 90.0), (80.0, 60.0)]
            .iter()
            .enumerate()
            .map(|(i, &(p, f))| HistoryEntry {
                timestamp: base + Duration::days(i as i64),
                overall_score: 70,
                metrics: SkillMetrics::new(p, f, 70.0, 70.0).unwrap(),
            })
            .collect();

        let trends = classify_skill_trends(&h).unwrap();
        assert_eq!(trends[&Skill::Pronunciation], Trend::Improving);
        assert_eq!(trends[&Skill::Fluency], Trend::Declining);
        assert_eq!(trends[&Skill::Confidence], Trend::Stable);
        assert_eq!(trends.len(), 4);
    }
}
