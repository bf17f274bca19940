use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::bot::callback_data::CallbackAction;
use crate::services::content::{Template, TEMPLATES, TEMPLATE_DELAYS};
use crate::services::personality::Personality;
use crate::storage::models::{Mood, Reminder};

pub const SNOOZE_CHOICES: [(u32, &str); 3] = [(5, "⏰ 5min"), (15, "⏰ 15min"), (60, "⏰ 1hr")];

/// Reply-keyboard shortcuts shown under the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Quick,
    List,
    Today,
    Stats,
    Vibe,
    Badges,
    Help,
}

impl MenuButton {
    pub const ALL: [MenuButton; 7] = [
        MenuButton::Quick,
        MenuButton::List,
        MenuButton::Today,
        MenuButton::Stats,
        MenuButton::Vibe,
        MenuButton::Badges,
        MenuButton::Help,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuButton::Quick => "⚡ Quick",
            MenuButton::List => "📋 List",
            MenuButton::Today => "📅 Today",
            MenuButton::Stats => "📊 Stats",
            MenuButton::Vibe => "🎭 Vibe",
            MenuButton::Badges => "🏆 Badges",
            MenuButton::Help => "❓ Help",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        MenuButton::ALL.iter().copied().find(|b| b.label() == text)
    }
}

fn callback(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, action.to_data())
}

pub fn main_menu() -> KeyboardMarkup {
    let rows = [
        &[MenuButton::Quick, MenuButton::List, MenuButton::Today][..],
        &[MenuButton::Stats, MenuButton::Vibe, MenuButton::Badges][..],
        &[MenuButton::Help][..],
    ];
    KeyboardMarkup::new(
        rows.iter()
            .map(|row| row.iter().map(|b| KeyboardButton::new(b.label())).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

/// Buttons attached to a delivered reminder.
pub fn reminder_actions(id: &str) -> InlineKeyboardMarkup {
    let snooze_row = SNOOZE_CHOICES
        .iter()
        .map(|(minutes, label)| {
            callback(
                *label,
                CallbackAction::Snooze {
                    id: id.to_string(),
                    minutes: *minutes,
                },
            )
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(vec![
        snooze_row,
        vec![
            callback("✅ Done", CallbackAction::Complete(id.to_string())),
            callback("❌ Dismiss", CallbackAction::Dismiss(id.to_string())),
        ],
    ])
}

/// One done/delete row per listed reminder, numbered like the list.
pub fn list_actions(reminders: &[Reminder]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(reminders.iter().enumerate().map(|(i, r)| {
        vec![
            callback(format!("✅ #{}", i + 1), CallbackAction::Complete(r.id.clone())),
            callback(format!("❌ #{}", i + 1), CallbackAction::Delete(r.id.clone())),
        ]
    }))
}

pub fn personality_picker() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        Personality::ALL
            .iter()
            .map(|p| vec![callback(p.name(), CallbackAction::Personality(*p))]),
    )
}

pub fn quick_templates() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        TEMPLATES
            .iter()
            .map(|t| vec![callback(t.button, CallbackAction::Quick(t.key.to_string()))]),
    )
}

pub fn template_delays(template: &Template) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(TEMPLATE_DELAYS.iter().map(|minutes| {
        let label = if minutes % 60 == 0 {
            format!("⏰ {}hr", minutes / 60)
        } else {
            format!("⏰ {}min", minutes)
        };
        vec![callback(
            label,
            CallbackAction::Template {
                key: template.key.to_string(),
                minutes: *minutes,
            },
        )]
    }))
}

pub fn mood_picker() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![Mood::ALL
        .iter()
        .map(|m| callback(format!("{} {}", m.emoji(), m), CallbackAction::Mood(*m)))
        .collect::<Vec<_>>()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(button: &InlineKeyboardButton) -> Option<&str> {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_menu_labels_round_trip() {
        for button in MenuButton::ALL {
            assert_eq!(MenuButton::from_label(button.label()), Some(button));
        }
        assert_eq!(MenuButton::from_label("Quick"), None);
    }

    #[test]
    fn test_reminder_actions_layout() {
        let markup = reminder_actions("abc");
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(callback_data(&markup.inline_keyboard[0][1]), Some("snooze:abc:15"));
        assert_eq!(callback_data(&markup.inline_keyboard[1][0]), Some("complete:abc"));
        assert_eq!(callback_data(&markup.inline_keyboard[1][1]), Some("dismiss:abc"));
    }

    #[test]
    fn test_template_delay_labels() {
        let markup = template_delays(&TEMPLATES[0]);
        assert_eq!(markup.inline_keyboard.len(), TEMPLATE_DELAYS.len());
        assert_eq!(markup.inline_keyboard[0][0].text, "⏰ 15min");
        assert_eq!(markup.inline_keyboard[3][0].text, "⏰ 2hr");
    }
}
