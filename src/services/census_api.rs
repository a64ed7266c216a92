//! Trait for sources of census table responses.

use async_trait::async_trait;

use crate::error::Result;
use crate::parser::{StatisticalTable, parse_table};

/// Abstraction over anything that can produce the raw response body for a
/// `(table_id, geo_id)` pair: the census reporter API, a cache in front of
/// it, or an in-memory stub.
#[async_trait]
pub trait CensusApi: Send + Sync {
    /// Returns the raw JSON body for one table and one geography.
    async fn fetch_raw(&self, table_id: &str, geo_id: &str) -> Result<Vec<u8>>;

    /// Fetches and parses one table.
    async fn fetch_table(&self, table_id: &str, geo_id: &str) -> Result<StatisticalTable> {
        let bytes = self.fetch_raw(table_id, geo_id).await?;
        parse_table(&bytes, table_id)
    }
}
