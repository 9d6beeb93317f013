use crate::error::{AcademyError, Result};
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// A tracked speaking dimension
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Skill {
    Pronunciation,
    Fluency,
    Confidence,
    Expressiveness,
}

impl Skill {
    /// Canonical order, also used to break ties between equal scores
    pub const ALL: [Skill; 4] = [
        Skill::Pronunciation,
        Skill::Fluency,
        Skill::Confidence,
        Skill::Expressiveness,
    ];
}

/// Wire shape of [`SkillMetrics`]; deserialization goes through validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawMetrics {
    pronunciation: f64,
    fluency: f64,
    confidence: f64,
    expressiveness: f64,
}

/// One 0-100 score per skill, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetrics", into = "RawMetrics")]
pub struct SkillMetrics {
    scores: [f64; 4],
}

impl SkillMetrics {
    pub fn new(
        pronunciation: f64,
        fluency: f64,
        confidence: f64,
        expressiveness: f64,
    ) -> Result<Self> {
        let scores = [pronunciation, fluency, confidence, expressiveness];
        for (skill, value) in Skill::ALL.iter().zip(scores) {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                log::warn!("rejecting {} score {}", skill, value);
                return Err(AcademyError::InvalidMetric {
                    skill: *skill,
                    value,
                });
            }
        }
        Ok(Self { scores })
    }

    /// Same score for every skill; handy for calibration and tests
    pub fn uniform(score: f64) -> Result<Self> {
        Self::new(score, score, score, score)
    }

    pub fn get(&self, skill: Skill) -> f64 {
        self.scores[skill as usize]
    }

    pub fn pronunciation(&self) -> f64 {
        self.get(Skill::Pronunciation)
    }

    pub fn fluency(&self) -> f64 {
        self.get(Skill::Fluency)
    }

    pub fn confidence(&self) -> f64 {
        self.get(Skill::Confidence)
    }

    pub fn expressiveness(&self) -> f64 {
        self.get(Skill::Expressiveness)
    }

    /// Iterate `(skill, score)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Skill, f64)> + '_ {
        Skill::ALL.iter().map(move |&skill| (skill, self.get(skill)))
    }
}

impl TryFrom<RawMetrics> for SkillMetrics {
    type Error = AcademyError;

    fn try_from(raw: RawMetrics) -> Result<Self> {
        Self::new(
            raw.pronunciation,
            raw.fluency,
            raw.confidence,
            raw.expressiveness,
        )
    }
}

impl From<SkillMetrics> for RawMetrics {
    fn from(m: SkillMetrics) -> Self {
        Self {
            pronunciation: m.pronunciation(),
            fluency: m.fluency(),
            confidence: m.confidence(),
            expressiveness: m.expressiveness(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_skill_display_is_snake_case() {
        assert_eq!(Skill::Pronunciation.to_string(), "pronunciation");
        assert_eq!(Skill::Expressiveness.to_string(), "expressiveness");
    }

    #[test]
    fn test_metrics_accessors_follow_canonical_order() {
        let m = SkillMetrics::new(10.0, 20.0, 30.0, 40.0).unwrap();
        assert_eq!(m.pronunciation(), 10.0);
        assert_eq!(m.fluency(), 20.0);
        assert_eq!(m.confidence(), 30.0);
        assert_eq!(m.expressiveness(), 40.0);

        let skills: Vec<Skill> = m.iter().map(|(s, _)| s).collect();
        assert_eq!(skills, Skill::ALL.to_vec());
    }

    #[test]
    fn test_boundaries_are_accepted() {
        assert!(SkillMetrics::new(0.0, 100.0, 0.0, 100.0).is_ok());
    }

    #[test]
    fn test_out_of_range_names_the_skill() {
        let err = SkillMetrics::new(50.0, 50.0, 101.0, 50.0).unwrap_err();
        assert_matches!(
            err,
            AcademyError::InvalidMetric { skill: Skill::Confidence, value } if value == 101.0
        );

        let err = SkillMetrics::new(-0.5, 50.0, 50.0, 50.0).unwrap_err();
        assert_matches!(
            err,
            AcademyError::InvalidMetric {
                skill: Skill::Pronunciation,
                ..
            }
        );
    }

    #[test]
    fn test_nan_is_rejected() {
        assert_matches!(
            SkillMetrics::new(50.0, f64::NAN, 50.0, 50.0),
            Err(AcademyError::InvalidMetric {
                skill: Skill::Fluency,
                ..
            })
        );
    }

    #[test]
    fn test_json_shape_and_validation() {
        let m = SkillMetrics::new(80.0, 70.0, 60.0, 50.0).unwrap();
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["pronunciation"], 80.0);
        assert_eq!(json["expressiveness"], 50.0);

        let back: SkillMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);

        let bad = r#"{"pronunciation":80,"fluency":170,"confidence":60,"expressiveness":50}"#;
        assert!(serde_json::from_str::<SkillMetrics>(bad).is_err());
    }
}
