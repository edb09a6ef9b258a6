//! Core domain types
//!
//! These types mirror the runner resources returned by the server. They are
//! read shapes: every identifier and timestamp here is server-assigned.

pub mod runner;
