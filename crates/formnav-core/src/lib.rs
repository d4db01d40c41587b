#![forbid(unsafe_code)]

//! Core: canonical key events and logging shims shared by the form crates.

pub mod event;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, info_span, trace, warn};
