//! Library exports for the quicklink URL shortener
//!
//! The link store and its collaborators live here so the binary, the
//! integration tests and the benchmarks all drive the same code.

pub mod config;
pub mod database;
pub mod error;
pub mod generator;
pub mod handler;
pub mod model;
pub mod query;
pub mod route;
pub mod service;
pub mod store;
pub mod validator;
