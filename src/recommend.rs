use crate::skill::{Skill, SkillMetrics};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

pub const PRONUNCIATION_THRESHOLD: f64 = 75.0;
pub const FLUENCY_THRESHOLD: f64 = 70.0;
pub const CONFIDENCE_THRESHOLD: f64 = 65.0;
pub const EXPRESSIVENESS_THRESHOLD: f64 = 70.0;

/// How far below its threshold a skill must fall to become high priority
pub const HIGH_PRIORITY_MARGIN: f64 = 15.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// `None` for advice that is not about a single skill
    pub skill: Option<Skill>,
    pub priority: Priority,
    pub message: String,
}

impl Recommendation {
    fn for_skill(skill: Skill, priority: Priority) -> Self {
        Self {
            skill: Some(skill),
            priority,
            message: skill_message(skill, priority).to_string(),
        }
    }

    /// Emitted when every skill is at or above its threshold
    pub fn maintain() -> Self {
        Self {
            skill: None,
            priority: Priority::Low,
            message: "Excellent work! Keep practicing to maintain your current level".to_string(),
        }
    }

    /// Emitted when the overall trend is declining
    pub fn recovery() -> Self {
        Self {
            skill: None,
            priority: Priority::Urgent,
            message: "Your scores are slipping. Add practice time and return to the fundamentals"
                .to_string(),
        }
    }

    pub fn is_maintain(&self) -> bool {
        self.skill.is_none() && self.priority == Priority::Low
    }
}

pub fn threshold(skill: Skill) -> f64 {
    match skill {
        Skill::Pronunciation => PRONUNCIATION_THRESHOLD,
        Skill::Fluency => FLUENCY_THRESHOLD,
        Skill::Confidence => CONFIDENCE_THRESHOLD,
        Skill::Expressiveness => EXPRESSIVENESS_THRESHOLD,
    }
}

/// Priority for a skill score, or `None` when the skill needs no work
pub fn priority_for(skill: Skill, score: f64) -> Option<Priority> {
    let limit = threshold(skill);
    if score >= limit {
        None
    } else if score < limit - HIGH_PRIORITY_MARGIN {
        Some(Priority::High)
    } else {
        Some(Priority::Medium)
    }
}

fn skill_message(skill: Skill, priority: Priority) -> &'static str {
    let urgent = priority >= Priority::High;
    match (skill, urgent) {
        (Skill::Pronunciation, true) => "Focus on articulation drills for 15 minutes every day",
        (Skill::Pronunciation, false) => {
            "Practice the difficult words and record yourself to review them"
        }
        (Skill::Fluency, true) => "Read slowly at first, then raise your pace gradually",
        (Skill::Fluency, false) => "Practice reading with a steady rhythm and well-placed pauses",
        (Skill::Confidence, true) => {
            "Start with short texts and lengthen them gradually to build confidence"
        }
        (Skill::Confidence, false) => "Practice in front of a mirror and record yourself",
        (Skill::Expressiveness, true) => "Read a text with a different emotion every day",
        (Skill::Expressiveness, false) => {
            "Listen to professional presenters and imitate their delivery"
        }
    }
}

/// Improvement suggestions for one set of metrics, weakest skill first.
///
/// Never empty: when nothing is below its threshold a single low-priority
/// "maintain" recommendation is returned. A `max_count` of zero is treated
/// as one.
pub fn recommend(metrics: &SkillMetrics, max_count: usize) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = metrics
        .iter()
        .filter_map(|(skill, score)| priority_for(skill, score).map(|p| (skill, score, p)))
        // stable sort keeps canonical skill order for equal scores
        .sorted_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(skill, _, priority)| Recommendation::for_skill(skill, priority))
        .collect();

    if recs.is_empty() {
        recs.push(Recommendation::maintain());
    }
    recs.truncate(max_count.max(1));
    recs
}
