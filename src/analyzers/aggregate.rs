use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info};

use crate::analyzers::types::{GeoTotals, HubTotals};
use crate::config::{Hub, Statistic};
use crate::services::census_api::CensusApi;
use crate::stats::categorize;

/// Fetches and categorizes all four statistics for one geography.
#[tracing::instrument(skip(api))]
pub async fn geo_totals<A: CensusApi + ?Sized>(
    api: &A,
    geo_id: &str,
) -> crate::error::Result<GeoTotals> {
    let mut totals = GeoTotals::new(geo_id);

    for statistic in Statistic::ALL {
        let table = api.fetch_table(statistic.table_id(), geo_id).await?;
        let categories = categorize(&table, geo_id, statistic.categories())?;
        debug!(
            statistic = statistic.label(),
            total = categories.total(),
            "Categorized table"
        );
        totals.by_statistic.insert(statistic, categories);
    }

    Ok(totals)
}

async fn guarded_geo_totals<A: CensusApi + ?Sized>(
    api: &A,
    sem: Arc<Semaphore>,
    geo_id: &str,
) -> Result<GeoTotals> {
    let _permit = sem.acquire_owned().await?;
    Ok(geo_totals(api, geo_id).await?)
}

/// Sums every geography of `hub` into one [`HubTotals`].
///
/// Up to `concurrency` geographies are fetched at once. Results are folded
/// in hub-definition order. The hub is all-or-nothing: the first failing
/// geography aborts the remaining work and the error names that geography.
#[tracing::instrument(skip(api, hub), fields(hub = %hub.name, geographies = hub.geo_ids.len()))]
pub async fn aggregate_hub<A>(api: Arc<A>, hub: &Hub, concurrency: usize) -> Result<HubTotals>
where
    A: CensusApi + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let mut tasks: Vec<(String, JoinHandle<Result<GeoTotals>>)> = Vec::new();
    for geo_id in &hub.geo_ids {
        let api = api.clone();
        let sem = semaphore.clone();
        let task_geo_id = geo_id.clone();

        let task = tokio::spawn(
            async move { guarded_geo_totals(api.as_ref(), sem, &task_geo_id).await }
                .in_current_span(),
        );
        tasks.push((geo_id.clone(), task));
    }

    let mut totals = HubTotals::new(&hub.name);
    for i in 0..tasks.len() {
        let geo_id = tasks[i].0.clone();
        let outcome = match (&mut tasks[i].1).await {
            Ok(result) => result,
            Err(join_error) => Err(join_error.into()),
        };

        match outcome {
            Ok(geo) => totals.accumulate(&geo),
            Err(e) => {
                error!(geo_id = %geo_id, error = %e, "Error in geography");
                for (_, rest) in &tasks[i + 1..] {
                    rest.abort();
                }
                return Err(e.context(format!("error in {geo_id}")));
            }
        }
    }

    info!(
        population = totals.grand_total(Statistic::Age),
        geographies = totals.geographies,
        "Hub aggregated"
    );
    Ok(totals)
}
