use tracing::{debug, error, info, warn};

/// Logs command start with consistent format
pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_START: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!("CMD_START: {} by {}({}) in chat {}", command, user, user_id, chat_id),
    }
}

/// Logs command completion with consistent format
pub fn log_command_success(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!(
            "CMD_SUCCESS: {} by {}({}) in chat {} - {}",
            command, user, user_id, chat_id, d
        ),
        None => info!("CMD_SUCCESS: {} by {}({}) in chat {}", command, user, user_id, chat_id),
    }
}

/// Logs command errors with consistent format
pub fn log_command_error(command: &str, user: &str, user_id: i64, chat_id: i64, error: &str) {
    error!(
        "CMD_ERROR: {} by {}({}) in chat {} - {}",
        command, user, user_id, chat_id, error
    );
}

/// Logs rejected user input
pub fn log_validation_error(command: &str, field: &str, value: &str, error: &str, chat_id: i64) {
    warn!(
        "VALIDATION_ERROR: {} - {} '{}' invalid: {} - chat {}",
        command, field, value, error, chat_id
    );
}

/// Logs a store mutation
pub fn log_store_operation(operation: &str, collection: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("STORE_OP: {} on {} - {}", operation, collection, d),
        None => debug!("STORE_OP: {} on {}", operation, collection),
    }
}

pub fn log_store_error(operation: &str, collection: &str, error: &str) {
    error!("STORE_ERROR: {} on {} failed: {}", operation, collection, error);
}

/// Logs one reminder delivery attempt
pub fn log_delivery(reminder_id: &str, chat_id: i64, outcome: Result<(), &str>) {
    match outcome {
        Ok(()) => info!("REMINDER_SENT: {} to chat {}", reminder_id, chat_id),
        Err(e) => warn!("REMINDER_FAILED: {} to chat {} - {}", reminder_id, chat_id, e),
    }
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
