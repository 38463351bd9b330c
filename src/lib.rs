//! shipline: a multi-platform build-and-release pipeline
//!
//! Given a pushed version tag, shipline builds a binary for every
//! configured platform in parallel, runs the test suite per platform,
//! caches dependencies across runs, and publishes one release with one
//! uniquely named asset per platform.
//!
//! The library surface exists so the pipeline seams (toolchain, release
//! host) can be exercised with test doubles; the `shipline` binary is the
//! intended interface.

pub mod cache;
pub mod commands;
pub mod coordinator;
pub mod core;
pub mod pipeline;
pub mod publish;
pub mod runner;
pub mod store;
pub mod toolchain;
pub mod ui;
