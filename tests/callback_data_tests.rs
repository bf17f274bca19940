use memoryping_bot::bot::callback_data::CallbackAction;
use memoryping_bot::bot::keyboards::{reminder_actions, MenuButton, SNOOZE_CHOICES};
use memoryping_bot::services::personality::Personality;
use memoryping_bot::storage::models::Mood;
use teloxide::types::InlineKeyboardButtonKind;

const ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

#[test]
fn test_every_action_round_trips_through_data() {
    let actions = vec![
        CallbackAction::Complete(ID.to_string()),
        CallbackAction::Delete(ID.to_string()),
        CallbackAction::Dismiss(ID.to_string()),
        CallbackAction::Snooze { id: ID.to_string(), minutes: 15 },
        CallbackAction::Personality(Personality::Techbro),
        CallbackAction::Quick("call_family".to_string()),
        CallbackAction::Template { key: "water".to_string(), minutes: 120 },
        CallbackAction::Mood(Mood::Neutral),
    ];
    for action in actions {
        let data = action.to_data();
        assert!(data.len() <= 64, "callback data over Telegram's limit: {data}");
        assert_eq!(data.parse::<CallbackAction>().unwrap(), action);
    }
}

#[test]
fn test_wire_format() {
    assert_eq!(
        CallbackAction::Snooze { id: ID.to_string(), minutes: 5 }.to_data(),
        format!("snooze:{ID}:5")
    );
    assert_eq!(CallbackAction::Mood(Mood::Happy).to_data(), "mood:happy");
    assert_eq!(CallbackAction::Personality(Personality::Zen).to_data(), "personality:zen");
}

#[test]
fn test_malformed_data_is_rejected() {
    for data in [
        "",
        "complete",
        "complete:",
        "complete:bad id!",
        "snooze:abc",
        "snooze:abc:0",
        "snooze:abc:forever",
        "mood:furious",
        "personality:pirate",
        "template:water",
        "explode:now",
    ] {
        assert!(data.parse::<CallbackAction>().is_err(), "accepted {data:?}");
    }
}

#[test]
fn test_reminder_buttons_carry_the_id() {
    let markup = reminder_actions(ID);
    let data: Vec<String> = markup
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(data.len(), SNOOZE_CHOICES.len() + 2);
    assert!(data.iter().all(|d| d.contains(ID)));
    assert!(data.contains(&format!("complete:{ID}")));
    assert!(data.contains(&format!("dismiss:{ID}")));
}

#[test]
fn test_menu_labels_map_back() {
    for button in MenuButton::ALL {
        assert_eq!(MenuButton::from_label(button.label()), Some(button));
    }
    assert_eq!(MenuButton::from_label("  📋 List "), Some(MenuButton::List));
    assert_eq!(MenuButton::from_label("List"), None);
}
