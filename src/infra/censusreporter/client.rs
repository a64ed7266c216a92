use async_trait::async_trait;
use reqwest::Url;
use tracing::info;

use crate::error::Result;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::services::census_api::CensusApi;

pub const CENSUS_REPORTER_URL: &str = "https://api.censusreporter.org/1.0/data/show/latest";

/// Fetches table data from the census reporter `data/show` endpoint.
pub struct CensusReporterClient<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> CensusReporterClient<C> {
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// `<base>?table_ids=<table_id>&geo_ids=<geo_id>`
    pub fn table_url(&self, table_id: &str, geo_id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("table_ids", table_id)
            .append_pair("geo_ids", geo_id);
        url
    }
}

#[async_trait]
impl<C: HttpClient> CensusApi for CensusReporterClient<C> {
    async fn fetch_raw(&self, table_id: &str, geo_id: &str) -> Result<Vec<u8>> {
        let url = self.table_url(table_id, geo_id);
        info!(%url, "Requesting table from census reporter");
        fetch_bytes(&self.client, url).await
    }
}
