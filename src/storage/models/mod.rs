pub mod habit;
pub mod mood;
pub mod reminder;
pub mod stats;
pub mod user;

pub use habit::*;
pub use mood::*;
pub use reminder::*;
pub use stats::*;
pub use user::*;
