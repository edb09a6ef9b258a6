//! Data Transfer Objects
//!
//! Wire shapes that are not resources in their own right: paginated
//! responses and the request bodies the client is allowed to send.

pub mod runner;
