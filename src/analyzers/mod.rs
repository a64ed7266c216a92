//! Hub aggregation.
//!
//! Each geography's four census tables are bucketed into category totals,
//! then summed across every geography of a hub into one [`types::HubTotals`].

pub mod aggregate;
pub mod types;
pub mod utility;
