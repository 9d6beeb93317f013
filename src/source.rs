use crate::error::Result;
use crate::skill::{Skill, SkillMetrics};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Supplier of per-skill metrics for one recording.
///
/// The scoring engine does not care whether metrics come from real signal
/// analysis, manual entry or a simulator.
pub trait MetricSource {
    fn measure(&mut self) -> Result<SkillMetrics>;
}

/// Randomized metrics in the ranges the practice app has always shown
pub struct SimulatedMetricSource {
    rng: StdRng,
}

impl SimulatedMetricSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for demos and tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn range(skill: Skill) -> RangeInclusive<u8> {
        match skill {
            Skill::Pronunciation => 55..=99,
            Skill::Fluency => 60..=99,
            Skill::Confidence => 50..=99,
            Skill::Expressiveness => 60..=99,
        }
    }
}

impl Default for SimulatedMetricSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SimulatedMetricSource {
    fn measure(&mut self) -> Result<SkillMetrics> {
        let mut draw = |skill| self.rng.gen_range(Self::range(skill)) as f64;
        let (p, f, c, e) = (
            draw(Skill::Pronunciation),
            draw(Skill::Fluency),
            draw(Skill::Confidence),
            draw(Skill::Expressiveness),
        );
        SkillMetrics::new(p, f, c, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_stay_in_range() {
        let mut source = SimulatedMetricSource::seeded(42);
        for _ in 0..200 {
            let m = source.measure().unwrap();
            for (skill, score) in m.iter() {
                let range = SimulatedMetricSource::range(skill);
                assert!(score >= *range.start() as f64 && score <= *range.end() as f64);
                assert_eq!(score.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = SimulatedMetricSource::seeded(9);
        let mut b = SimulatedMetricSource::seeded(9);
        for _ in 0..5 {
            assert_eq!(a.measure().unwrap(), b.measure().unwrap());
        }
    }

    #[test]
    fn test_trait_object() {
        let mut source: Box<dyn MetricSource> = Box::new(SimulatedMetricSource::seeded(1));
        assert!(source.measure().is_ok());
    }
}
