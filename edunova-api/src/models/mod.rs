pub mod course;
pub mod schedule;
pub mod session;
pub mod user;

// Re-export models for easier access
pub use course::*;
pub use schedule::*;
pub use session::*;
pub use user::*;
