//! Terminal front end for the cascade picker.
//!
//! The binary is a thin clap wrapper; the session engine, config loading,
//! logging and table rendering live here so they can be tested directly.

pub mod config;
pub mod logging;
pub mod render;
pub mod session;
