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
#![allow(clippy::redundant_pub_crate)]

//! Interactive terminal console for the command gateway.
//!
//! Layout:
//! - `cli.rs`: argument parsing, startup, and the read-eval loop
//! - `commands/`: input handlers grouped by concern
//! - `client.rs`: HTTP gateway client, errors, and shared context
//! - `input.rs`: the line-oriented input language
//! - `store.rs`: file-backed credential persistence
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod input;
pub(crate) mod output;
pub(crate) mod store;

pub use cli::run;
