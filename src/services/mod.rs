pub mod content;
pub mod gamification;
pub mod habits;
pub mod health;
pub mod personality;
pub mod reminder;
