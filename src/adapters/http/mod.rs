//! HTTP adapter - the HTML front end.
//!
//! - `router` - route table and tower-http layers
//! - `middleware` - session gate
//! - `pages` - page handlers
//! - `forms` - form and multipart input
//! - `session_cookie` - session cookie encoding
//! - `error` - `PageError` and its rendering

pub mod error;
pub mod forms;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod session_cookie;
pub mod state;

pub use error::PageError;
pub use middleware::{require_session, RequireToken, SessionAuth};
pub use router::build_router;
pub use session_cookie::SessionCookie;
pub use state::{AppState, FrontendSettings};
