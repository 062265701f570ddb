#![deny(unsafe_code, missing_debug_implementations)]

//! Coffee shop backend: a public menu, and drinks and staff operations gated by bearer tokens
//! issued by an external identity provider.

pub mod app;
pub mod authorize;
pub mod config;
pub mod drinks;
pub mod error;
pub mod gate;
pub mod server;
pub mod users;
