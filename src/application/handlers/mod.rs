//! Application handlers.

pub mod account;

pub use account::{
    AccountError, LoginCommand, LoginHandler, LogoutCommand, LogoutHandler, RegisterCommand,
    RegisterHandler,
};
