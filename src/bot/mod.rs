pub mod callback_data;
pub mod commands;
pub mod handlers;
pub mod keyboards;

/// Error type shared by every dispatcher endpoint.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
