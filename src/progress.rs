use crate::error::{AcademyError, Result};
use crate::history::{AnalysisHistory, HistoryEntry};
use crate::recommend::{recommend, Recommendation, DEFAULT_MAX_RECOMMENDATIONS};
use crate::rewards::{Achievement, Difficulty, PracticeProfile};
use crate::scoring::AnalysisResult;
use crate::skill::{Skill, SkillMetrics};
use crate::trend::{classify_skill_trends, classify_trend, SkillTrends, Trend};
use crate::util::mean;
use itertools::Itertools;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Skills scoring at least this much count as strengths
pub const STRENGTH_THRESHOLD: f64 = 80.0;
/// Skills scoring below this count as weaknesses
pub const WEAKNESS_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub skill: Skill,
    pub score: f64,
}

/// Strengths (descending) and weaknesses (ascending) of the latest analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub strengths: Vec<SkillScore>,
    pub weaknesses: Vec<SkillScore>,
}

impl SkillSummary {
    pub fn from_metrics(metrics: &SkillMetrics) -> Self {
        let by_score = |a: &SkillScore, b: &SkillScore| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        };
        let scores = || metrics.iter().map(|(skill, score)| SkillScore { skill, score });

        Self {
            strengths: scores()
                .filter(|s| s.score >= STRENGTH_THRESHOLD)
                .sorted_by(|a, b| by_score(b, a))
                .collect(),
            weaknesses: scores()
                .filter(|s| s.score < WEAKNESS_THRESHOLD)
                .sorted_by(by_score)
                .collect(),
        }
    }
}

/// Level label keyed by the average overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    #[serde(rename = "beginner")]
    Beginner,
    #[serde(rename = "intermediate")]
    Intermediate,
    #[serde(rename = "advanced")]
    Advanced,
    #[serde(rename = "professional")]
    Professional,
    #[serde(rename = "advanced professional")]
    AdvancedProfessional,
}

const LEVEL_TABLE: [(f64, ProficiencyLevel); 4] = [
    (90.0, ProficiencyLevel::AdvancedProfessional),
    (80.0, ProficiencyLevel::Professional),
    (70.0, ProficiencyLevel::Advanced),
    (60.0, ProficiencyLevel::Intermediate),
];

impl ProficiencyLevel {
    pub fn for_average(average: f64) -> Self {
        LEVEL_TABLE
            .iter()
            .find(|(min, _)| average >= *min)
            .map(|(_, level)| *level)
            .unwrap_or(ProficiencyLevel::Beginner)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
            ProficiencyLevel::Professional => "professional",
            ProficiencyLevel::AdvancedProfessional => "advanced professional",
        }
    }
}

impl std::fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Suggested next steps for the latest overall score
pub fn next_steps(latest_score: u8) -> Vec<String> {
    let steps: [&str; 3] = if latest_score < 60 {
        [
            "Focus on the fundamentals: breathing and clear articulation",
            "Practice for at least 20 minutes every day",
            "Record yourself and listen back to track your progress",
        ]
    } else if latest_score < 80 {
        [
            "Develop your expression and intonation",
            "Practice with longer and more complex texts",
            "Ask a professional for feedback or join a workshop",
        ]
    } else {
        [
            "Take on professional challenges or competitions",
            "Specialize in a style such as news or commercials",
            "Share your experience by coaching beginners",
        ]
    };
    steps.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanExercise {
    pub activity: &'static str,
    pub minutes: u8,
}

/// One week of the improvement plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanWeek {
    pub week: u8,
    pub focus: &'static str,
    pub goals: [&'static str; 2],
    pub exercises: [PlanExercise; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementPlan {
    pub daily_minutes: (u8, u8),
    pub weeks: Vec<PlanWeek>,
}

const fn exercise(activity: &'static str, minutes: u8) -> PlanExercise {
    PlanExercise { activity, minutes }
}

const PLAN_WEEKS: [PlanWeek; 4] = [
    PlanWeek {
        week: 1,
        focus: "foundation",
        goals: ["Improve breathing", "Steady pronunciation"],
        exercises: [
            exercise("Breathing exercises", 10),
            exercise("Read short texts aloud", 15),
            exercise("Record and review", 5),
        ],
    },
    PlanWeek {
        week: 2,
        focus: "clarity",
        goals: ["Sharpen pronunciation", "Build confidence"],
        exercises: [
            exercise("Articulation drills", 10),
            exercise("Advanced reading aloud", 15),
            exercise("Imitate professional presenters", 5),
        ],
    },
    PlanWeek {
        week: 3,
        focus: "expression",
        goals: ["Vary your tone", "Emotional expression"],
        exercises: [
            exercise("Pitch and intonation drills", 10),
            exercise("Read emotionally charged texts", 15),
            exercise("Stage presence exercises", 5),
        ],
    },
    PlanWeek {
        week: 4,
        focus: "mastery",
        goals: ["Combine every skill", "Professional delivery"],
        exercises: [
            exercise("Record long texts", 15),
            exercise("Simulate real situations", 10),
            exercise("Review and self-assessment", 5),
        ],
    },
];

/// Fixed four-week plan, 20 to 30 minutes a day
pub fn improvement_plan() -> ImprovementPlan {
    ImprovementPlan {
        daily_minutes: (20, 30),
        weeks: PLAN_WEEKS.to_vec(),
    }
}

/// Everything tracked for one user. Derived fields are recomputed in full on
/// every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgressState {
    history: AnalysisHistory,
    skill_summary: SkillSummary,
    trend: Trend,
    skill_trends: SkillTrends,
    practice: PracticeProfile,
}

impl UserProgressState {
    pub fn history(&self) -> &AnalysisHistory {
        &self.history
    }

    pub fn skill_summary(&self) -> &SkillSummary {
        &self.skill_summary
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn skill_trends(&self) -> &SkillTrends {
        &self.skill_trends
    }

    pub fn practice(&self) -> &PracticeProfile {
        &self.practice
    }

    fn record(&mut self, result: &AnalysisResult) -> Result<Vec<Achievement>> {
        // derived fields are computed on a scratch copy so a failure leaves
        // the state untouched
        let mut history = self.history.clone();
        if let Some(evicted) = history.push(HistoryEntry::from(result)) {
            debug!("evicted history entry from {}", evicted.timestamp);
        }
        let trend = classify_trend(history.entries())?;
        let skill_trends = classify_skill_trends(history.entries())?;

        self.history = history;
        self.trend = trend;
        self.skill_trends = skill_trends;
        self.skill_summary = self
            .history
            .latest()
            .map(|e| SkillSummary::from_metrics(&e.metrics))
            .unwrap_or_default();
        Ok(self.practice.record_analysis(result))
    }

    /// Recompute every derived field from the history
    fn recompute(&mut self) -> Result<()> {
        self.trend = classify_trend(self.history.entries())?;
        self.skill_trends = classify_skill_trends(self.history.entries())?;
        self.skill_summary = self
            .history
            .latest()
            .map(|e| SkillSummary::from_metrics(&e.metrics))
            .unwrap_or_default();
        Ok(())
    }

    fn summary(&self, user_id: &str, max_recommendations: usize) -> Result<ProgressSummary> {
        let latest = self
            .history
            .latest()
            .ok_or_else(|| AcademyError::UnknownUser(user_id.to_string()))?;

        let average_score = mean(
            self.history
                .entries()
                .iter()
                .map(|e| e.overall_score as f64),
        )
        .unwrap_or_default();

        let limit = max_recommendations.max(1);
        let mut recommendations = recommend(&latest.metrics, limit);
        if self.trend == Trend::Declining {
            recommendations.insert(0, Recommendation::recovery());
            recommendations.truncate(limit);
        }

        Ok(ProgressSummary {
            user_id: user_id.to_string(),
            current_level: ProficiencyLevel::for_average(average_score),
            trend: self.trend,
            skill_trends: self.skill_trends.clone(),
            strengths: self.skill_summary.strengths.clone(),
            weaknesses: self.skill_summary.weaknesses.clone(),
            recommendations,
            average_score,
            latest_score: latest.overall_score,
            total_analyses: self.history.len(),
            next_steps: next_steps(latest.overall_score),
            improvement_plan: improvement_plan(),
            practice: self.practice.clone(),
        })
    }
}

/// Personalized report built from a user's retained history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub user_id: String,
    pub current_level: ProficiencyLevel,
    pub trend: Trend,
    pub skill_trends: SkillTrends,
    pub strengths: Vec<SkillScore>,
    pub weaknesses: Vec<SkillScore>,
    pub recommendations: Vec<Recommendation>,
    /// Mean overall score of the retained history, not a lifetime average
    pub average_score: f64,
    pub latest_score: u8,
    /// Number of retained history entries
    pub total_analyses: usize,
    pub next_steps: Vec<String>,
    pub improvement_plan: ImprovementPlan,
    pub practice: PracticeProfile,
}

/// Per-user progress keyed by user id.
///
/// Updates for one user are serialized behind that user's mutex; different
/// users never contend beyond the brief map lookup.
#[derive(Debug)]
pub struct ProgressStore {
    users: RwLock<HashMap<String, Arc<Mutex<UserProgressState>>>>,
    max_recommendations: usize,
}

impl Default for ProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::with_max_recommendations(DEFAULT_MAX_RECOMMENDATIONS)
    }

    pub fn with_max_recommendations(max_recommendations: usize) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            max_recommendations,
        }
    }

    fn get(&self, user_id: &str) -> Option<Arc<Mutex<UserProgressState>>> {
        self.users.read().get(user_id).cloned()
    }

    fn get_or_create(&self, user_id: &str) -> Arc<Mutex<UserProgressState>> {
        if let Some(state) = self.get(user_id) {
            return state;
        }
        let mut users = self.users.write();
        Arc::clone(users.entry(user_id.to_string()).or_insert_with(|| {
            info!("tracking progress for new user {:?}", user_id);
            Arc::new(Mutex::new(UserProgressState::default()))
        }))
    }

    /// Add an analysis to the user's history at its timestamp position and
    /// recompute everything derived from it. Returns achievements unlocked by this analysis.
    pub fn record_analysis(
        &self,
        user_id: &str,
        result: &AnalysisResult,
    ) -> Result<Vec<Achievement>> {
        if !result.is_consistent() {
            warn!("rejecting analysis {} with mismatched score", result.id);
            return Err(AcademyError::InvalidHistory(format!(
                "analysis {} has overall score {} that does not match its metrics",
                result.id, result.overall_score
            )));
        }

        let state = self.get_or_create(user_id);
        let mut state = state.lock();
        let unlocked = state.record(result)?;
        debug!(
            "user {:?}: {} entries, trend {}",
            user_id,
            state.history.len(),
            state.trend
        );
        for achievement in &unlocked {
            info!("user {:?} unlocked {}", user_id, achievement);
        }
        Ok(unlocked)
    }

    /// Award XP for a finished exercise. Creates the user if needed.
    pub fn record_exercise(&self, user_id: &str, difficulty: Difficulty) -> u32 {
        let state = self.get_or_create(user_id);
        let points = state.lock().practice.record_exercise(difficulty);
        debug!("user {:?} earned {} xp for a {} exercise", user_id, points, difficulty);
        points
    }

    pub fn get_summary(&self, user_id: &str) -> Result<ProgressSummary> {
        let state = self
            .get(user_id)
            .ok_or_else(|| AcademyError::UnknownUser(user_id.to_string()))?;
        let state = state.lock();
        state.summary(user_id, self.max_recommendations)
    }

    /// Retained history, oldest first
    pub fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let state = self
            .get(user_id)
            .ok_or_else(|| AcademyError::UnknownUser(user_id.to_string()))?;
        let entries = state.lock().history.entries().to_vec();
        Ok(entries)
    }

    /// Copy of the user's state, e.g. for the caller to persist
    pub fn snapshot(&self, user_id: &str) -> Result<UserProgressState> {
        let state = self
            .get(user_id)
            .ok_or_else(|| AcademyError::UnknownUser(user_id.to_string()))?;
        let snapshot = state.lock().clone();
        Ok(snapshot)
    }

    /// Re-seed a user from previously persisted state. The history is
    /// validated and every derived field recomputed rather than trusted.
    /// An existing user's state is replaced in place, so updates already
    /// holding that user's handle land in the restored state.
    pub fn restore(&self, user_id: &str, state: UserProgressState) -> Result<()> {
        let mut restored = UserProgressState {
            history: AnalysisHistory::from_entries(state.history.entries().to_vec())?,
            practice: state.practice,
            ..Default::default()
        };
        restored.recompute()?;

        info!(
            "restored user {:?} with {} entries",
            user_id,
            restored.history.len()
        );
        *self.get_or_create(user_id).lock() = restored;
        Ok(())
    }

    /// Known user ids, sorted
    pub fn users(&self) -> Vec<String> {
        self.users.read().keys().cloned().sorted().collect()
    }
}
