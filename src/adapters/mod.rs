//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `backend` - model API client (reqwest) and its mock
//! - `http` - axum front end
//! - `render` - HTML renderer
//! - `storage` - session stores

pub mod backend;
pub mod http;
pub mod render;
pub mod storage;

pub use backend::{HttpMlBackend, MockMlBackend};
pub use render::HtmlRenderer;
pub use storage::InMemorySessionStore;
