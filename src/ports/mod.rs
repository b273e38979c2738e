//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `MlBackend` - the model API (datasets, training, predictions, login)
//! - `SessionStore` - server-side sessions keyed by the session cookie
//! - `TemplateRenderer` - turns a template name and payload into HTML

mod ml_backend;
mod session_store;
mod template_renderer;

pub use ml_backend::MlBackend;
pub use session_store::SessionStore;
pub use template_renderer::{keys, PagePayload, RenderError, TemplateRenderer};
