//! Application command handlers for uttr.
//!
//! This module organizes command handling into separate submodules, each
//! responsible for a specific application command.
//!
//! # Commands
//! - `form`: The interactive transcription form (default)
//! - `auth`: API key management
//! - `config`: Open configuration file in user's preferred editor
//! - `logs`: Display recent log entries

pub mod auth;
pub mod config;
pub mod form;
pub mod logs;

pub use auth::handle_auth;
pub use config::handle_config;
pub use form::handle_form;
pub use logs::handle_logs;
