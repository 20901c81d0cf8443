pub mod cleanup;
pub mod config;
pub mod delegate;
pub mod download;
pub mod error;
pub mod http;
pub mod install;
pub mod paths;
pub mod platform;
pub mod runtime;

pub use error::{SPAWN_FAILED_EXIT_CODE, ShimError};
