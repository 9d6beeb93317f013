//! Text shown to the learner. Wording varies between calls; none of it
//! feeds back into scoring or recommendations.

use crate::trend::Trend;
use rand::seq::SliceRandom;
use rand::Rng;

fn headlines_for(overall: u8) -> &'static [&'static str] {
    match overall {
        90..=u8::MAX => &[
            "Outstanding! Your voice is clear and compelling",
            "Superb delivery, that is professional quality",
            "Brilliant! Every word landed",
        ],
        80..=89 => &[
            "Very good! Your skills are clearly improving",
            "Great session, you sound confident and clear",
        ],
        70..=79 => &[
            "Good work with room to grow. Keep practicing",
            "Solid effort, a few details away from great",
        ],
        60..=69 => &[
            "Acceptable. Focus on the highlighted areas",
            "You're getting there, target the weak spots next",
        ],
        _ => &[
            "A good start! Regular practice will lift your score",
            "Every expert started here. Keep going",
        ],
    }
}

/// Encouraging one-liner for an overall score
pub fn headline<R: Rng + ?Sized>(overall: u8, rng: &mut R) -> &'static str {
    let options = headlines_for(overall);
    options.choose(rng).copied().unwrap_or(options[0])
}

/// Motivational message for the current trend and latest overall score
pub fn motivation(trend: Trend, latest: u8) -> &'static str {
    match trend {
        Trend::Improving => "Great! Your progress is steady and visible. Keep it up!",
        Trend::Stable if latest >= 80 => "You are holding steady at an excellent level",
        Trend::Stable => "You are steady. Time for a new challenge to level up!",
        Trend::Declining => {
            "Don't worry, progress has ups and downs. Persistence is what counts"
        }
    }
}
