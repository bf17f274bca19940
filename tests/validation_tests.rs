use memoryping_bot::storage::models::Mood;
use memoryping_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_reminder_texts() {
        let valid = vec![
            "call mom at 5pm".to_string(),
            "x".to_string(),
            "💊 pills before bed".to_string(),
            "A".repeat(MAX_REMINDER_LENGTH),
        ];
        for text in valid {
            assert!(validate_reminder_text(&text).is_ok(), "Should accept: {}", text);
        }
    }

    #[test]
    fn test_invalid_reminder_texts() {
        let invalid = vec!["".to_string(), "   ".to_string(), "A".repeat(MAX_REMINDER_LENGTH + 1)];
        for text in invalid {
            assert!(validate_reminder_text(&text).is_err(), "Should reject: {:?}", text);
        }
    }

    #[test]
    fn test_timezones() {
        assert_eq!(validate_timezone("Asia/Kolkata").unwrap(), chrono_tz::Asia::Kolkata);
        assert_eq!(validate_timezone("  UTC ").unwrap(), chrono_tz::UTC);
        assert!(validate_timezone("").is_err());
        assert!(validate_timezone("Mars/Olympus").is_err());

        let error = validate_timezone("Nowhere/City").unwrap_err().to_string();
        assert!(error.contains("Unknown timezone 'Nowhere/City'"));
    }

    #[test]
    fn test_moods() {
        assert_eq!(validate_mood("happy").unwrap(), Mood::Happy);
        assert_eq!(validate_mood("SAD").unwrap(), Mood::Sad);
        assert_eq!(validate_mood("meh").unwrap(), Mood::Neutral);
        assert!(validate_mood("furious").is_err());
    }

    #[test]
    fn test_snooze_minutes() {
        assert_eq!(validate_snooze_minutes("5").unwrap(), 5);
        assert_eq!(validate_snooze_minutes(" 60 ").unwrap(), 60);
        assert_eq!(validate_snooze_minutes("1440").unwrap(), MAX_SNOOZE_MINUTES);
        assert!(validate_snooze_minutes("0").is_err());
        assert!(validate_snooze_minutes("1441").is_err());
        assert!(validate_snooze_minutes("-5").is_err());
        assert!(validate_snooze_minutes("soon").is_err());
    }

    #[test]
    fn test_reminder_ids() {
        assert!(validate_reminder_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_reminder_id("").is_err());
        assert!(validate_reminder_id("has space").is_err());
        assert!(validate_reminder_id("colon:id").is_err());
        assert!(validate_reminder_id(&"a".repeat(65)).is_err());
    }
}
