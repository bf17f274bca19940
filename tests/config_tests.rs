use memoryping_bot::config::Config;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "TELEGRAM_BOT_TOKEN",
    "BOT_TOKEN",
    "DATA_DIR",
    "HTTP_PORT",
    "DEFAULT_TIMEZONE",
    "REMINDER_CHECK_INTERVAL_SECS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATA_DIR", "/tmp/memoryping");
    env::set_var("HTTP_PORT", "9090");
    env::set_var("DEFAULT_TIMEZONE", "Europe/Berlin");
    env::set_var("REMINDER_CHECK_INTERVAL_SECS", "10");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.data_dir, PathBuf::from("/tmp/memoryping"));
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.default_timezone, chrono_tz::Europe::Berlin);
    assert_eq!(config.reminder_check_interval, Duration::from_secs(10));

    clear_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.default_timezone, chrono_tz::Asia::Kolkata);
    assert_eq!(config.reminder_check_interval, Duration::from_secs(30));

    clear_env();
}

#[test]
fn test_config_accepts_legacy_token_name() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("BOT_TOKEN", "legacy_token");
    let config = Config::from_env().unwrap();
    assert_eq!(config.telegram_bot_token, "legacy_token");

    clear_env();
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));

    clear_env();
}

#[test]
fn test_config_invalid_port() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("HTTP_PORT", "invalid_port");

    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid HTTP_PORT"));

    env::set_var("HTTP_PORT", " 3000 ");
    assert_eq!(Config::from_env().unwrap().http_port, 3000);

    clear_env();
}

#[test]
fn test_config_invalid_timezone_and_interval() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("DEFAULT_TIMEZONE", "Mars/Olympus");
    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid DEFAULT_TIMEZONE"));

    env::remove_var("DEFAULT_TIMEZONE");
    env::set_var("REMINDER_CHECK_INTERVAL_SECS", "0");
    let error_msg = Config::from_env().unwrap_err().to_string();
    assert!(error_msg.contains("Invalid REMINDER_CHECK_INTERVAL_SECS"));

    clear_env();
}

#[test]
fn test_blank_data_dir_uses_default() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("DATA_DIR", "  ");
    assert_eq!(Config::from_env().unwrap().data_dir, PathBuf::from("./data"));

    clear_env();
}
