#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives for the native console.
//!
//! Centralises subscriber setup so every binary logs the same way, and keeps
//! log output on stderr where it cannot interleave with rendered console output.

pub mod init;

pub use init::{
    ConsoleSpanGuard, DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging,
};
