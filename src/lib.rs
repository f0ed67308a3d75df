pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extractor;
pub mod ingest;
pub mod labeler;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scenario;
pub mod testcase;
