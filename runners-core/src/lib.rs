//! Runners Core
//!
//! Data model for the workspace runners API.
//!
//! This crate contains:
//! - Domain types: Runner resources as returned by the server
//! - DTOs: Page wrappers and request bodies sent to the server

pub mod domain;
pub mod dto;
