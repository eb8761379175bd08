pub mod correlations;
pub mod generate_api;
pub mod ingest;
pub mod locations;
pub mod scan;
