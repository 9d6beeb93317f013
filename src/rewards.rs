use crate::progress::STRENGTH_THRESHOLD;
use crate::scoring::AnalysisResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ANALYSIS_XP: u32 = 10;
pub const EXERCISE_BASE_XP: f64 = 20.0;
pub const XP_PER_LEVEL: u32 = 1000;

pub const WEEK_STREAK_DAYS: u32 = 7;
pub const EXCELLENT_SCORE: u8 = 90;
pub const ANALYSES_MILESTONE: u32 = 10;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.5,
        }
    }
}

/// XP awarded for finishing an exercise
pub fn exercise_points(difficulty: Difficulty) -> u32 {
    (EXERCISE_BASE_XP * difficulty.multiplier()).round() as u32
}

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
pub enum Achievement {
    FirstAnalysis,
    WeekStreak,
    ExcellentScore,
    TenAnalyses,
    AllRounder,
}

impl Achievement {
    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstAnalysis => "Recorded your first analysis",
            Achievement::WeekStreak => "Practiced seven days in a row",
            Achievement::ExcellentScore => "Reached an overall score of 90",
            Achievement::TenAnalyses => "Completed ten analyses",
            Achievement::AllRounder => "Scored 80 or more in every skill at once",
        }
    }
}

/// Gamified practice counters for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeProfile {
    pub xp: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_practice_day: Option<NaiveDate>,
    pub achievements: BTreeSet<Achievement>,
    /// Lifetime count; unlike the history this is never trimmed
    pub analyses_recorded: u32,
    pub exercises_completed: u32,
}

impl PracticeProfile {
    pub fn level(&self) -> u32 {
        1 + self.xp / XP_PER_LEVEL
    }

    /// Count `day` towards the daily streak. Days older than the last
    /// recorded practice day do not change the streak.
    pub fn register_practice_day(&mut self, day: NaiveDate) {
        match self.last_practice_day {
            Some(last) if day <= last => return,
            Some(last) if last.succ_opt() == Some(day) => self.streak_days += 1,
            _ => self.streak_days = 1,
        }
        self.last_practice_day = Some(day);
        self.best_streak = self.best_streak.max(self.streak_days);
    }

    /// Update counters for a recorded analysis and return any achievements
    /// unlocked by it
    pub fn record_analysis(&mut self, result: &AnalysisResult) -> Vec<Achievement> {
        self.analyses_recorded += 1;
        self.xp += ANALYSIS_XP;
        self.register_practice_day(result.timestamp.date_naive());

        // already-held achievements are filtered out below
        let mut earned = vec![Achievement::FirstAnalysis];
        if self.streak_days >= WEEK_STREAK_DAYS {
            earned.push(Achievement::WeekStreak);
        }
        if result.overall_score >= EXCELLENT_SCORE {
            earned.push(Achievement::ExcellentScore);
        }
        if self.analyses_recorded >= ANALYSES_MILESTONE {
            earned.push(Achievement::TenAnalyses);
        }
        if result.metrics.iter().all(|(_, score)| score >= STRENGTH_THRESHOLD) {
            earned.push(Achievement::AllRounder);
        }

        earned
            .into_iter()
            .filter(|a| self.achievements.insert(*a))
            .collect()
    }

    /// Award XP for a finished exercise, returning the points granted.
    /// Only analyses count towards the daily streak.
    pub fn record_exercise(&mut self, difficulty: Difficulty) -> u32 {
        let points = exercise_points(difficulty);
        self.xp += points;
        self.exercises_completed += 1;
        points
    }
}
