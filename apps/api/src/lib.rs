//! Car Listing API Library
//!
//! This library provides the core functionality for the car listing API,
//! including the car domain, document store adapters, token verification,
//! and the HTTP handlers.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
