//! Shared types for the depot back office.
//!
//! Everything here is free of I/O so the same definitions can be used by the
//! backend and by any client that talks to its JSON API.

pub mod dashboards;
pub mod domain;
pub mod shared;
pub mod system;
