use crate::skill::Skill;

/// Errors raised by the scoring and progress engine.
///
/// All of these are local validation failures; none are worth retrying.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AcademyError {
    #[error("invalid {skill} score: {value} (expected 0-100)")]
    InvalidMetric { skill: Skill, value: f64 },
    #[error("invalid history: {0}")]
    InvalidHistory(String),
    #[error("no analysis recorded for user {0:?}")]
    UnknownUser(String),
}

pub type Result<T> = std::result::Result<T, AcademyError>;
