pub mod cookie;
pub mod manager;

pub use cookie::SessionCookies;
pub use manager::{Session, SessionStore, MAX_EXPIRY_HOURS};
