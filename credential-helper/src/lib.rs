//! # credential-helper
//!
//! Command dispatch for git credential helpers.
//!
//! This crate provides:
//! - The [`Helper`] trait every credential backend implements
//! - [`NullHelper`], a complete no-op backend for read-only or stub use
//! - [`run_helper`], which reads a request, calls the backend and writes the
//!   response

pub mod command;
pub mod error;
pub mod handler;
pub mod helper;

pub use command::Command;
pub use error::{BoxError, HelperError};
pub use handler::run_helper;
pub use helper::{Helper, NullHelper};
