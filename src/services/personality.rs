//! Reply "vibes" a user can pick with `/personality`.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    Zen,
    Coach,
    #[default]
    Bestie,
    Techbro,
}

/// Which kind of line to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Confirmation,
    Completion,
    Ping,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Zen,
        Personality::Coach,
        Personality::Bestie,
        Personality::Techbro,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Personality::Zen => "zen",
            Personality::Coach => "coach",
            Personality::Bestie => "bestie",
            Personality::Techbro => "techbro",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Personality::Zen => "Zen Monk 🧘",
            Personality::Coach => "Coach 🏋️",
            Personality::Bestie => "Bestie 💖",
            Personality::Techbro => "Tech Bro 🤓",
        }
    }

    pub fn lines(&self, tone: Tone) -> &'static [&'static str] {
        match (self, tone) {
            (Personality::Zen, Tone::Confirmation) => &[
                "Peace. I shall remind you at the destined moment.",
                "Mindfully noted. All is as it should be.",
                "In stillness, I hold your intention.",
                "The universe will whisper your reminder.",
            ],
            (Personality::Zen, Tone::Completion) => &[
                "Harmony achieved. You are present.",
                "Balance restored. Well done.",
                "The task dissolves. You remain.",
                "Mindfulness embodied.",
            ],
            (Personality::Zen, Tone::Ping) => &[
                "🧘 A gentle reminder arrives...",
                "🕉️ The moment is now...",
                "🌸 Awareness calls...",
                "☮️ Return to this intention...",
            ],
            (Personality::Coach, Tone::Confirmation) => &[
                "LET'S GO! I'll push you when it's time! 💪",
                "COMMITMENT LOCKED IN! You got this!",
                "That's what I'm talking about! Setting you up for success!",
                "BOOM! Another goal in the system! Keep crushing it!",
            ],
            (Personality::Coach, Tone::Completion) => &[
                "BEAST MODE ACTIVATED! 🔥",
                "YOU'RE UNSTOPPABLE! Keep that momentum!",
                "CHAMPION MENTALITY! That's how winners do it!",
                "CRUSHING IT! Your future self thanks you!",
            ],
            (Personality::Coach, Tone::Ping) => &[
                "⏰ TIME TO EXECUTE! Let's get after it!",
                "🔔 GAME TIME! Show up and show out!",
                "💪 IT'S GO TIME! Make it happen!",
                "🏆 REMINDER ALERT! Champions don't wait!",
            ],
            (Personality::Bestie, Tone::Confirmation) => &[
                "Gotchu boo! I'll totally remind you! 💕",
                "Yasss! Consider it done bestie! ✨",
                "Ofc!! I got your back always! 🥰",
                "Bet! I won't let you forget! 💗",
            ],
            (Personality::Bestie, Tone::Completion) => &[
                "OMG YOU DID IT! So proud of you! 🎉",
                "Slay queen/king! You're crushing it! 👑",
                "Bestie energy! That's my friend right there! 💖",
                "YOU'RE AMAZING! Literally the best! ✨",
            ],
            (Personality::Bestie, Tone::Ping) => &[
                "💕 Heyyyy! Time for this babe!",
                "✨ Reminder time bestie!",
                "🥰 Don't forget this hun!",
                "💗 Your bestie checking in!",
            ],
            (Personality::Techbro, Tone::Confirmation) => &[
                "Synced to cloud. Reminder scheduled in prod. 🚀",
                "Database updated. Your task is now in the pipeline.",
                "Confirmed. Deploying reminder to your neural network.",
                "Roger that. Added to queue with O(1) complexity.",
            ],
            (Personality::Techbro, Tone::Completion) => &[
                "Task executed successfully. Zero errors. 💻",
                "Shipped! Another feature merged to main.",
                "Unit test passed. You're scaling well.",
                "Performance metrics looking good. GG! 📊",
            ],
            (Personality::Techbro, Tone::Ping) => &[
                "⚡ API call received. Execute callback now.",
                "🔔 Event triggered. Handle this async.",
                "💻 Push notification deployed.",
                "⏰ Cron job fired. Process this task.",
            ],
        }
    }

    /// A random line of the given tone.
    pub fn line(&self, tone: Tone) -> &'static str {
        self.lines(tone)
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default()
    }

    /// Reply to a message mentioning laziness.
    pub fn lazy_reply(&self) -> &'static str {
        match self {
            Personality::Zen => "Laziness is just energy waiting for purpose. 🧘",
            Personality::Coach => "LAZY?! Not on my watch! Get up and move! 💪",
            Personality::Bestie => "Bestie no! You got this! Let's goooo! ✨",
            Personality::Techbro => "Lazy = low optimization. Time to refactor. 🤓",
        }
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Personality::ALL
            .iter()
            .copied()
            .find(|p| p.key() == lowered)
            .ok_or_else(|| format!("Unknown personality '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_personality_has_lines() {
        for personality in Personality::ALL {
            for tone in [Tone::Confirmation, Tone::Completion, Tone::Ping] {
                let line = personality.line(tone);
                assert!(personality.lines(tone).contains(&line));
            }
        }
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("TechBro".parse::<Personality>(), Ok(Personality::Techbro));
        assert!("pirate".parse::<Personality>().is_err());
        assert_eq!(Personality::default(), Personality::Bestie);
    }
}
