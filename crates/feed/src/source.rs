//! The data source contract.

use async_trait::async_trait;
use types::{MarketEvent, MarketSentiment, Warehouse};

use crate::DataFetchError;

/// Async supplier of the simulation's initial state.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, DataFetchError>;

    async fn fetch_market_events(&self) -> Result<Vec<MarketEvent>, DataFetchError>;

    async fn fetch_sentiment(&self) -> Result<Vec<MarketSentiment>, DataFetchError>;
}

/// Everything the simulation needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialData {
    pub warehouses: Vec<Warehouse>,
    pub events: Vec<MarketEvent>,
    pub sentiment: Vec<MarketSentiment>,
}

/// Fetch all three collections concurrently.
///
/// Fails as a whole on the first error. An empty warehouse list is an error
/// since there is nothing to simulate.
pub async fn load_all(source: &dyn DataSource) -> Result<InitialData, DataFetchError> {
    let (warehouses, events, sentiment) = tokio::try_join!(
        source.fetch_warehouses(),
        source.fetch_market_events(),
        source.fetch_sentiment(),
    )?;

    if warehouses.is_empty() {
        return Err(DataFetchError::Empty("warehouses".to_string()));
    }

    tracing::info!(
        source = source.name(),
        warehouses = warehouses.len(),
        events = events.len(),
        sentiment = sentiment.len(),
        "Initial data loaded"
    );

    Ok(InitialData {
        warehouses,
        events,
        sentiment,
    })
}
