//! Browser transports.

pub(crate) mod api;
