pub mod auth;
pub mod invoke;
pub mod resolve;
pub mod session;
pub mod types;

pub use session::Session;
pub use types::{AttemptRecord, AuthResult, FallbackResult};
