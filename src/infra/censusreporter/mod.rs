mod client;

pub use client::{CENSUS_REPORTER_URL, CensusReporterClient};
