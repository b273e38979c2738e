//! Application layer - use cases that coordinate ports.
//!
//! Only the account flows live here. Page handlers that simply forward to the
//! model API call the `MlBackend` port directly from the HTTP adapter.

pub mod handlers;

pub use handlers::{
    AccountError, LoginCommand, LoginHandler, LogoutCommand, LogoutHandler, RegisterCommand,
    RegisterHandler,
};
