//! Integration tests for the shipline pipeline

mod test_coordinator;
mod test_pipeline;
mod test_publish;
mod test_runner;
