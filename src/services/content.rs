use rand::seq::IndexedRandom;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::parser::Category;

pub const MOTIVATIONAL_QUOTES: [&str; 10] = [
    "The secret of getting ahead is getting started.",
    "Don't watch the clock; do what it does. Keep going.",
    "Small daily improvements lead to stunning results.",
    "You are never too old to set another goal.",
    "Success is the sum of small efforts repeated daily.",
    "The future depends on what you do today.",
    "Dream big, start small, act now.",
    "Progress, not perfection.",
    "Your only limit is you.",
    "Make today so awesome that yesterday gets jealous.",
];

pub const TIPS: [&str; 10] = [
    "💡 Pro tip: add -- notes after a reminder to keep details",
    "💡 Tag reminders with #work #health for organization",
    "💡 Set recurring reminders with 'every day'",
    "💡 Try /digest for your daily summary",
    "💡 Level up by completing more reminders!",
    "🎯 Your Memory Score improves with consistency",
    "⚡ /today shows what's left on your plate",
    "🏆 Check /leaderboard to see top performers",
    "🧘 Try different personalities with /personality",
    "💪 Build habits with recurring reminders",
];

/// A one-tap reminder offered by `/quick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub key: &'static str,
    pub button: &'static str,
    pub text: &'static str,
    pub category: Category,
}

pub const TEMPLATES: [Template; 6] = [
    Template { key: "medicine", button: "💊 Medicine", text: "Take medicine", category: Category::Health },
    Template { key: "water", button: "💧 Water", text: "Drink water", category: Category::Health },
    Template { key: "exercise", button: "💪 Exercise", text: "Time to exercise", category: Category::Fitness },
    Template { key: "standup", button: "🧍 Stretch", text: "Stand up and stretch", category: Category::Health },
    Template { key: "call_family", button: "📞 Family", text: "Call family", category: Category::Family },
    Template { key: "check_email", button: "📧 Email", text: "Check emails", category: Category::Work },
];

/// Delays offered after a template is picked, in minutes.
pub const TEMPLATE_DELAYS: [u32; 4] = [15, 30, 60, 120];

pub fn template(key: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.key == key)
}

pub fn random_quote() -> &'static str {
    MOTIVATIONAL_QUOTES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or_default()
}

pub fn random_tip() -> &'static str {
    TIPS.choose(&mut rand::rng()).copied().unwrap_or_default()
}

/// Rotating footer: a credit line every 10th message, a quote every 5th,
/// a tip otherwise.
#[derive(Debug, Default)]
pub struct Footer {
    count: AtomicUsize,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if n % 10 == 0 {
            format!("✨ MemoryPing v{}", env!("CARGO_PKG_VERSION"))
        } else if n % 5 == 0 {
            format!("💭 {}", random_quote())
        } else {
            random_tip().to_string()
        }
    }
}
