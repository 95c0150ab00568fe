//! Integration test suite modules

mod config;
mod runtime;
mod session;
