//! Core types: configuration, platforms, and the error taxonomy

pub mod config;
pub mod error;
pub mod platform;
