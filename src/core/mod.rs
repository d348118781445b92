//! Core infrastructure
//!
//! Fundamental facilities shared by the configuration engine and the upload
//! pipeline. Currently this is the logging abstraction.

pub mod logging;
