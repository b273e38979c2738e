//! Page rendering adapters.
//!
//! - `html_renderer` - built-in HTML pages implementing `TemplateRenderer`

mod html_renderer;

pub use html_renderer::{escape, templates, HtmlRenderer};
