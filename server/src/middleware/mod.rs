pub mod error_page;
pub mod session;

pub use error_page::{error_page_middleware, render_error};
pub use session::session_middleware;
