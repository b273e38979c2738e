//! ML Frontend - server-rendered web front end for a machine-learning model API.
//!
//! Users log in, upload CSV datasets, train models, run predictions and browse
//! prediction history through HTML forms. Every form is forwarded to the
//! model API with the bearer token stored in the user's server-side session,
//! and the JSON reply is rendered back into a page.
//!
//! # Layout
//!
//! - `domain` - sessions, tokens, backend records and errors
//! - `ports` - `MlBackend`, `SessionStore`, `TemplateRenderer`
//! - `application` - login, registration and logout use cases
//! - `adapters` - reqwest backend client, in-memory sessions, HTML renderer, axum front end
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
