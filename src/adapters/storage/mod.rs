//! Storage adapters.
//!
//! - `in_memory_session_store` - process-local session map plus its sweeper

mod in_memory_session_store;

pub use in_memory_session_store::{spawn_session_sweeper, InMemorySessionStore};
