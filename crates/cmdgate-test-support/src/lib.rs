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

//! Shared test helpers used across console suites.
//! Layout: fixtures.rs (sessions, records, controllers), mocks.rs (scripted gateway).

pub mod fixtures;
pub mod mocks;

pub use fixtures::{TestConsole, console, console_with, signed_in};
pub use mocks::{Call, FakeGateway, status, status_with_message};
