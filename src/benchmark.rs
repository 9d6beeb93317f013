use crate::skill::{Skill, SkillMetrics};
use serde::Serialize;

/// Scores a professional speaker is expected to reach
pub fn professional_target(skill: Skill) -> f64 {
    match skill {
        Skill::Pronunciation => 95.0,
        Skill::Fluency => 90.0,
        Skill::Confidence => 88.0,
        Skill::Expressiveness => 85.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkGap {
    pub skill: Skill,
    pub score: f64,
    pub target: f64,
    /// Positive while below target
    pub gap: f64,
    pub percentile: u8,
}

/// Rough standing among other speakers for a score
pub fn percentile(score: f64) -> u8 {
    (score * 1.2).min(100.0).round() as u8
}

pub fn benchmark(metrics: &SkillMetrics) -> Vec<BenchmarkGap> {
    metrics
        .iter()
        .map(|(skill, score)| {
            let target = professional_target(skill);
            BenchmarkGap {
                skill,
                score,
                target,
                gap: target - score,
                percentile: percentile(score),
            }
        })
        .collect()
}
