//! Model API adapters.
//!
//! Implementations of the `MlBackend` port:
//!
//! - `http_client` - production client over reqwest
//! - `mock` - in-process test double that records calls
//! - `request` - the request value object the HTTP client sends

mod http_client;
mod mock;
mod request;

pub use http_client::HttpMlBackend;
pub use mock::MockMlBackend;
pub use request::{BackendRequest, FilePart, MultipartForm, RequestBody};
