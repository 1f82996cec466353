//! Era Genética engine library.
//!
//! Server side of the character sheet and the admin roster.
//!
//! ## Structure
//!
//! - `use_cases/` - Character sheet and roster view state, driven through ports
//! - `infrastructure/` - Port traits and their adapters (in-memory, SQLite, claims)
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
