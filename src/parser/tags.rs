use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Reminder category, set with a `#tag` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Shopping,
    Fitness,
    Family,
    Finance,
    Education,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Shopping,
        Category::Fitness,
        Category::Family,
        Category::Finance,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Shopping => "shopping",
            Category::Fitness => "fitness",
            Category::Family => "family",
            Category::Finance => "finance",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Work => "💼",
            Category::Personal => "👤",
            Category::Health => "💊",
            Category::Shopping => "🛒",
            Category::Fitness => "💪",
            Category::Family => "👨‍👩‍👧",
            Category::Finance => "💰",
            Category::Education => "📚",
            Category::Other => "📌",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lowered)
            .ok_or(())
    }
}

/// Reminder priority, set with `!high`, `!medium` or `!low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

/// Metadata markers pulled out of the reminder text before time parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderTags {
    pub category: Category,
    pub priority: Priority,
    pub notes: String,
    pub shared_with: Vec<String>,
}

#[allow(clippy::expect_used)]
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("hashtag pattern is a valid literal"));

#[allow(clippy::expect_used)]
static PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)!(high|medium|low)\b").expect("priority pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)@(\w+)").expect("mention pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static NOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\s*--\s*(.*)$").expect("notes pattern is a valid literal"));

/// Strips `#category`, `!priority`, `@user` and `-- notes` markers.
///
/// Only the first hashtag naming a known category is consumed; other
/// hashtags stay in the text.
pub fn strip_tags(text: &str) -> (String, ReminderTags) {
    let mut tags = ReminderTags::default();
    let mut text = text.to_string();

    let category_hit = HASHTAG.captures_iter(&text).find_map(|caps| {
        let whole = caps.get(0)?;
        let category = caps.get(1)?.as_str().parse::<Category>().ok()?;
        Some((whole.range(), category))
    });
    if let Some((range, category)) = category_hit {
        tags.category = category;
        text.replace_range(range, " ");
    }

    let priority_hit = PRIORITY.captures(&text).and_then(|caps| {
        let whole = caps.get(0)?;
        let priority = caps.get(1)?.as_str().parse::<Priority>().ok()?;
        Some((whole.range(), priority))
    });
    if let Some((range, priority)) = priority_hit {
        tags.priority = priority;
        text.replace_range(range, " ");
    }

    tags.shared_with = MENTION
        .captures_iter(&text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    text = MENTION.replace_all(&text, " ").into_owned();

    let notes_hit = NOTES
        .captures(&text)
        .and_then(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str().trim().to_string())));
    if let Some((start, notes)) = notes_hit {
        tags.notes = notes;
        text.truncate(start);
    }

    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (cleaned, tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_all_markers() {
        let (text, tags) = strip_tags("Meeting at 3pm #work !high @alice -- bring slides");
        assert_eq!(text, "Meeting at 3pm");
        assert_eq!(tags.category, Category::Work);
        assert_eq!(tags.priority, Priority::High);
        assert_eq!(tags.shared_with, vec!["alice".to_string()]);
        assert_eq!(tags.notes, "bring slides");
    }

    #[test]
    fn test_unknown_hashtag_is_kept() {
        let (text, tags) = strip_tags("Read #rustlang book #education");
        assert_eq!(text, "Read #rustlang book");
        assert_eq!(tags.category, Category::Education);
    }

    #[test]
    fn test_defaults_without_markers() {
        let (text, tags) = strip_tags("  water the plants  ");
        assert_eq!(text, "water the plants");
        assert_eq!(tags, ReminderTags::default());
    }

    #[test]
    fn test_priority_is_case_insensitive() {
        let (_, tags) = strip_tags("Pay rent !LOW");
        assert_eq!(tags.priority, Priority::Low);
    }

    #[test]
    fn test_category_round_trip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }
}
