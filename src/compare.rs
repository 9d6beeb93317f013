use crate::scoring::AnalysisResult;
use crate::skill::Skill;
use crate::trend::{classify_series, Trend};
use crate::util::{mean, std_dev};
use serde::Serialize;

/// Overall improvement above this is considered excellent
pub const EXCELLENT_IMPROVEMENT: i16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonStatus {
    Excellent,
    Good,
    Stable,
    NeedsWork,
}

impl ComparisonStatus {
    pub fn from_improvement(improvement: i16) -> Self {
        if improvement > EXCELLENT_IMPROVEMENT {
            ComparisonStatus::Excellent
        } else if improvement > 0 {
            ComparisonStatus::Good
        } else if improvement == 0 {
            ComparisonStatus::Stable
        } else {
            ComparisonStatus::NeedsWork
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ComparisonStatus::Excellent => "Excellent progress! Your delivery clearly improved",
            ComparisonStatus::Good => "Good progress, keep practicing to improve further",
            ComparisonStatus::Stable => "Your performance held steady; try new exercises",
            ComparisonStatus::NeedsWork => {
                "A slight dip this time; revisit the fundamentals and practice more"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillDelta {
    pub skill: Skill,
    pub first: f64,
    pub second: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub skills: Vec<SkillDelta>,
    pub overall_first: u8,
    pub overall_second: u8,
    pub overall_improvement: i16,
    pub status: ComparisonStatus,
}

/// Compare an earlier analysis with a later one
pub fn compare(first: &AnalysisResult, second: &AnalysisResult) -> Comparison {
    let skills = Skill::ALL
        .iter()
        .map(|&skill| {
            let (a, b) = (first.metrics.get(skill), second.metrics.get(skill));
            SkillDelta {
                skill,
                first: a,
                second: b,
                improvement: b - a,
            }
        })
        .collect();
    let overall_improvement = second.overall_score as i16 - first.overall_score as i16;

    Comparison {
        skills,
        overall_first: first.overall_score,
        overall_second: second.overall_score,
        overall_improvement,
        status: ComparisonStatus::from_improvement(overall_improvement),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub count: usize,
    pub average_score: u8,
    pub highest_score: u8,
    pub lowest_score: u8,
    /// Last overall score minus first
    pub improvement: i16,
    pub trend: Trend,
    /// Population standard deviation of the overall scores
    pub spread: f64,
}

/// Summarize a batch of analyses given in recording order
pub fn batch_summary(results: &[AnalysisResult]) -> Option<BatchSummary> {
    let (first, last) = (results.first()?, results.last()?);
    let scores: Vec<f64> = results.iter().map(|r| r.overall_score as f64).collect();

    Some(BatchSummary {
        count: results.len(),
        average_score: mean(scores.iter().copied())?.round() as u8,
        highest_score: results.iter().map(|r| r.overall_score).max()?,
        lowest_score: results.iter().map(|r| r.overall_score).min()?,
        improvement: last.overall_score as i16 - first.overall_score as i16,
        trend: classify_series(&scores),
        spread: std_dev(&scores)?,
    })
}
