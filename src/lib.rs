//! renderhook command-line front end.
//!
//! The transform itself lives in `renderhook-transform`; this crate adds
//! option loading, file handling, diagnostic rendering and tracing setup
//! for the `renderhook` binary.

pub mod cli;
pub mod tracing_config;

pub use renderhook_common as common;
pub use renderhook_transform as transform;
