// Library surface for the CLI and integration tests.
// Everything here is pure or in-memory; persistence belongs to the caller.
pub mod benchmark;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod feedback;
pub mod history;
pub mod progress;
pub mod recommend;
pub mod rewards;
pub mod scoring;
pub mod skill;
pub mod source;
pub mod trend;
pub mod util;

pub use error::{AcademyError, Result};
pub use history::{AnalysisHistory, HistoryEntry, HISTORY_CAPACITY};
pub use progress::{ProficiencyLevel, ProgressStore, ProgressSummary, SkillSummary, UserProgressState};
pub use recommend::{recommend, Priority, Recommendation};
pub use scoring::{aggregate, analyze, analyze_at, AnalysisResult, Grade};
pub use skill::{Skill, SkillMetrics};
pub use trend::{classify_trend, Trend};
