use crate::skill::{Skill, SkillMetrics};
use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const PRONUNCIATION_WEIGHT: f64 = 0.30;
pub const FLUENCY_WEIGHT: f64 = 0.25;
pub const CONFIDENCE_WEIGHT: f64 = 0.25;
pub const EXPRESSIVENESS_WEIGHT: f64 = 0.20;

/// Weight of a skill in the overall score
pub fn weight(skill: Skill) -> f64 {
    match skill {
        Skill::Pronunciation => PRONUNCIATION_WEIGHT,
        Skill::Fluency => FLUENCY_WEIGHT,
        Skill::Confidence => CONFIDENCE_WEIGHT,
        Skill::Expressiveness => EXPRESSIVENESS_WEIGHT,
    }
}

/// Letter grade bucketed from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GradeLabel", try_from = "GradeLabel")]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    D,
}

/// Minimum score (inclusive) for each bucket, highest first. Anything below
/// the last row is a D.
const GRADE_TABLE: [(u8, Grade); 6] = [
    (90, Grade::APlus),
    (85, Grade::A),
    (80, Grade::BPlus),
    (75, Grade::B),
    (70, Grade::CPlus),
    (65, Grade::C),
];

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::CPlus,
        Grade::C,
        Grade::D,
    ];

    pub fn for_score(score: u8) -> Self {
        GRADE_TABLE
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::D)
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::APlus => "excellent",
            Grade::A => "very good",
            Grade::BPlus => "good",
            Grade::B => "acceptable",
            Grade::CPlus => "average",
            Grade::C => "below average",
            Grade::D => "needs improvement",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.letter(), self.description())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GradeLabel {
    letter: String,
    description: String,
}

impl From<Grade> for GradeLabel {
    fn from(g: Grade) -> Self {
        Self {
            letter: g.letter().to_string(),
            description: g.description().to_string(),
        }
    }
}

impl TryFrom<GradeLabel> for Grade {
    type Error = String;

    fn try_from(label: GradeLabel) -> Result<Self, Self::Error> {
        Grade::ALL
            .into_iter()
            .find(|g| g.letter() == label.letter)
            .ok_or_else(|| format!("unknown grade letter {:?}", label.letter))
    }
}

/// Overall score and grade for one set of metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub overall_score: u8,
    pub grade: Grade,
}

/// Weighted composite of the skill scores, rounded to the nearest integer
pub fn overall_score(metrics: &SkillMetrics) -> u8 {
    let weighted: f64 = metrics
        .iter()
        .map(|(skill, score)| score * weight(skill))
        .sum();
    weighted.round().clamp(0.0, 100.0) as u8
}

pub fn aggregate(metrics: &SkillMetrics) -> Aggregate {
    let overall_score = overall_score(metrics);
    Aggregate {
        overall_score,
        grade: Grade::for_score(overall_score),
    }
}

/// Outcome of analyzing one recording. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub metrics: SkillMetrics,
    pub overall_score: u8,
    pub grade: Grade,
}

impl AnalysisResult {
    /// True when the stored score and grade agree with the metrics
    pub fn is_consistent(&self) -> bool {
        let agg = aggregate(&self.metrics);
        agg.overall_score == self.overall_score && agg.grade == self.grade
    }
}

pub fn analyze(metrics: SkillMetrics) -> AnalysisResult {
    analyze_at(metrics, Local::now())
}

pub fn analyze_at(metrics: SkillMetrics, timestamp: DateTime<Local>) -> AnalysisResult {
    let Aggregate {
        overall_score,
        grade,
    } = aggregate(&metrics);
    let id = analysis_id(&timestamp, &mut rand::thread_rng());
    log::debug!("analysis {} scored {} ({})", id, overall_score, grade.letter());
    AnalysisResult {
        id,
        timestamp,
        metrics,
        overall_score,
        grade,
    }
}

/// `analysis_<unix millis>_<9 base36 chars>`
fn analysis_id<R: Rng>(timestamp: &DateTime<Local>, rng: &mut R) -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("analysis_{}_{}", timestamp.timestamp_millis(), suffix)
}
