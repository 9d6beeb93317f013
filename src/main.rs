use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::{error::Error, fs::File, path::PathBuf};
use voice_academy::{
    analyze_at,
    benchmark::{benchmark, BenchmarkGap},
    compare::{batch_summary, compare, BatchSummary, Comparison},
    config::{Config, ConfigStore, FileConfigStore},
    export::write_history_csv,
    feedback,
    rewards::{Achievement, Difficulty},
    source::{MetricSource, SimulatedMetricSource},
    AnalysisResult, ProgressStore, ProgressSummary, SkillMetrics,
};

/// score voice practice sessions and track progress over time
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Scores voice practice recordings on pronunciation, fluency, confidence and expressiveness, then reports grades, trends and what to practice next."
)]
pub struct Cli {
    /// user whose progress is tracked (default from config)
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// explicit metrics as pronunciation,fluency,confidence,expressiveness (repeatable)
    #[clap(short = 'm', long, value_parser = parse_metrics)]
    metrics: Vec<SkillMetrics>,

    /// number of simulated sessions when no metrics are given
    #[clap(short = 'n', long, default_value_t = 1)]
    sessions: usize,

    /// seed for simulated metrics
    #[clap(long)]
    seed: Option<u64>,

    /// cap on the number of recommendations
    #[clap(long)]
    max_recommendations: Option<usize>,

    /// exercise difficulty used to award practice XP
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// print the report as JSON
    #[clap(long)]
    json: bool,

    /// export the retained history as CSV
    #[clap(long)]
    csv: Option<PathBuf>,

    /// alternate config file
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Flags win over the stored config
    fn apply(&self, config: Config) -> Config {
        Config {
            user_id: self.user.clone().unwrap_or(config.user_id),
            max_recommendations: self.max_recommendations.unwrap_or(config.max_recommendations),
            difficulty: self.difficulty.unwrap_or(config.difficulty),
            seed: self.seed.or(config.seed),
        }
    }
}

fn parse_metrics(s: &str) -> Result<SkillMetrics, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid score in {:?}: {}", s, e))?;

    match values[..] {
        [p, f, c, e] => SkillMetrics::new(p, f, c, e).map_err(|e| e.to_string()),
        _ => Err(format!("expected 4 comma-separated scores, got {}", values.len())),
    }
}

#[derive(Debug, Serialize)]
struct Report {
    analyses: Vec<AnalysisResult>,
    summary: ProgressSummary,
    benchmarks: Vec<BenchmarkGap>,
    comparison: Option<Comparison>,
    batch: Option<BatchSummary>,
    unlocked: Vec<Achievement>,
    xp_earned: u32,
}

fn collect_metrics(cli: &Cli, config: &Config) -> Result<Vec<SkillMetrics>, Box<dyn Error>> {
    if !cli.metrics.is_empty() {
        return Ok(cli.metrics.clone());
    }
    let mut source = match config.seed {
        Some(seed) => SimulatedMetricSource::seeded(seed),
        None => SimulatedMetricSource::new(),
    };
    let metrics = (0..cli.sessions.max(1))
        .map(|_| source.measure())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(metrics)
}

fn run(cli: &Cli, config: &Config) -> Result<Report, Box<dyn Error>> {
    let store = ProgressStore::with_max_recommendations(config.max_recommendations);
    let user = config.user_id.as_str();

    let mut analyses = Vec::new();
    let mut unlocked = Vec::new();
    let mut xp_earned = 0;
    for metrics in collect_metrics(cli, config)? {
        let result = analyze_at(metrics, Local::now());
        unlocked.extend(store.record_analysis(user, &result)?);
        xp_earned += store.record_exercise(user, config.difficulty);
        analyses.push(result);
    }

    if let Some(path) = &cli.csv {
        write_history_csv(&store.history(user)?, File::create(path)?)?;
        log::info!("exported history to {}", path.display());
    }

    let summary = store.get_summary(user)?;
    let latest = analyses.last().ok_or("no analyses recorded")?;
    let comparison = match analyses.as_slice() {
        [first, .., last] => Some(compare(first, last)),
        _ => None,
    };

    Ok(Report {
        benchmarks: benchmark(&latest.metrics),
        batch: batch_summary(&analyses),
        comparison,
        summary,
        unlocked,
        xp_earned,
        analyses,
    })
}

fn print_report(report: &Report) {
    let summary = &report.summary;
    let Some(latest) = report.analyses.last() else {
        return;
    };

    println!(
        "{}  {}",
        latest.overall_score,
        feedback::headline(latest.overall_score, &mut rand::thread_rng())
    );
    println!("grade: {}", latest.grade);
    for gap in &report.benchmarks {
        println!(
            "  {:<15} {:>5.1}  (professional {:.0}, percentile {})",
            gap.skill.to_string(),
            gap.score,
            gap.target,
            gap.percentile
        );
    }

    println!();
    println!(
        "level: {}  average: {:.1} over {} analyses  trend: {}",
        summary.current_level, summary.average_score, summary.total_analyses, summary.trend
    );
    println!("{}", feedback::motivation(summary.trend, summary.latest_score));

    if let Some(cmp) = &report.comparison {
        println!(
            "first vs last: {:+} ({})",
            cmp.overall_improvement,
            cmp.status.message()
        );
    }

    println!();
    println!("recommendations:");
    for rec in &summary.recommendations {
        match rec.skill {
            Some(skill) => println!("  [{}] {}: {}", rec.priority, skill, rec.message),
            None => println!("  [{}] {}", rec.priority, rec.message),
        }
    }
    println!("next steps:");
    for step in &summary.next_steps {
        println!("  - {}", step);
    }
    let plan = &summary.improvement_plan;
    println!(
        "{}-week plan, {}-{} minutes a day:",
        plan.weeks.len(),
        plan.daily_minutes.0,
        plan.daily_minutes.1
    );
    for week in &plan.weeks {
        println!("  week {}: {} ({})", week.week, week.focus, week.goals.join(", "));
    }

    let practice = &summary.practice;
    println!();
    println!(
        "+{} xp  (total {}, level {}, streak {} days)",
        report.xp_earned,
        practice.xp,
        practice.level(),
        practice.streak_days
    );
    for achievement in &report.unlocked {
        println!("unlocked: {}", achievement.description());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(store.load());
    log::debug!("using config {:?}", config);

    let report = run(&cli, &config)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_academy::{Recommendation, Skill, Trend};

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["voice-academy"]).unwrap();
        assert_eq!(cli.sessions, 1);
        assert!(cli.metrics.is_empty());
        assert!(cli.user.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_repeated_metrics() {
        let cli =
            Cli::try_parse_from(["voice-academy", "-m", "90,80,70,60", "--metrics", "1,2,3,4"])
                .unwrap();
        assert_eq!(cli.metrics.len(), 2);
        assert_eq!(cli.metrics[0].pronunciation(), 90.0);
        assert_eq!(cli.metrics[1].expressiveness(), 4.0);
    }

    #[test]
    fn test_cli_rejects_bad_metrics() {
        assert!(Cli::try_parse_from(["voice-academy", "-m", "90,80,70"]).is_err());
        assert!(Cli::try_parse_from(["voice-academy", "-m", "90,80,70,abc"]).is_err());
        assert!(Cli::try_parse_from(["voice-academy", "-m", "90,80,70,120"]).is_err());
    }

    #[test]
    fn test_parse_metrics_trims_spaces() {
        let m = parse_metrics("95, 90 ,85,80").unwrap();
        assert_eq!(m.get(Skill::Fluency), 90.0);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "voice-academy",
            "--user",
            "sara",
            "--seed",
            "3",
            "-d",
            "hard",
        ])
        .unwrap();
        let config = cli.apply(Config {
            max_recommendations: 2,
            ..Config::default()
        });
        assert_eq!(config.user_id, "sara");
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.max_recommendations, 2);
    }

    #[test]
    fn test_run_with_explicit_metrics() {
        let cli = Cli::try_parse_from(["voice-academy", "-m", "95,95,95,95"]).unwrap();
        let report = run(&cli, &cli.apply(Config::default())).unwrap();

        assert_eq!(report.analyses.len(), 1);
        assert_eq!(report.summary.recommendations, vec![Recommendation::maintain()]);
        assert_eq!(report.summary.trend, Trend::Stable);
        assert!(report.comparison.is_none());
        assert_eq!(report.xp_earned, 20);
    }

    #[test]
    fn test_run_simulated_sessions() {
        let cli = Cli::try_parse_from(["voice-academy", "-n", "12", "--seed", "5"]).unwrap();
        let report = run(&cli, &cli.apply(Config::default())).unwrap();

        assert_eq!(report.analyses.len(), 12);
        assert_eq!(report.summary.total_analyses, 10);
        assert!(report.comparison.is_some());
        assert_eq!(report.batch.as_ref().unwrap().count, 12);
    }
}
