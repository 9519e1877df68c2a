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
#![allow(clippy::module_name_repetitions)]

//! Session and view-state controller for the command gateway console.
//!
//! This crate owns everything the console front-ends share: the credential,
//! the authenticated session, which tab is showing, the request sequence behind
//! every user action, and the reconciliation of responses into state. It is
//! DOM-free and runtime-free so the browser and terminal consoles drive the
//! same controller.
//!
//! Layout:
//! - `api.rs`: transport seam implemented by the gloo-net and reqwest clients
//! - `credential.rs`: credential newtype and persistence seam
//! - `config.rs`: controller policies
//! - `error.rs`: gateway and navigation error taxonomy
//! - `router.rs`: tabs, screens, and the admin authorization check
//! - `state.rs`: state slices and the reducers applied to them
//! - `controller.rs`: async operations that issue requests and apply responses
//! - `views.rs`: stateless projections consumed by renderers

pub mod api;
pub mod config;
pub mod controller;
pub mod credential;
pub mod error;
pub mod router;
pub mod state;
pub mod views;

pub use api::{Endpoint, GatewayApi};
pub use cmdgate_api_models as models;
pub use config::{ConsoleConfig, FetchFailurePolicy};
pub use controller::ConsoleController;
pub use credential::{Credential, CredentialStore, MemoryCredentialStore};
pub use error::{GatewayError, NavigationError};
pub use router::{NavItem, NavSection, Screen, Tab};
pub use state::{
    CommandOutcome, ConsoleState, CreatedUserKey, LoginForm, Notice, NoticeKind, RuleForm,
    UserForm,
};
