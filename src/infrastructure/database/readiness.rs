use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::utils::errors::ApiError;

pub const RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Something that can tell whether the backing store accepts connections.
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    async fn ping(&self) -> Result<(), ApiError>;
    async fn table_names(&self) -> Result<Vec<String>, ApiError>;
}

/// Defers building the connection until the first ping. A failed build
/// (URI resolution, DNS) counts as an unavailable store and is attempted
/// again on the next ping; once built, the connection is reused.
pub struct ConnectOnDemand<C, F> {
    connect: F,
    connection: OnceCell<C>,
}

impl<C, F> ConnectOnDemand<C, F>
where
    C: ConnectionProbe + 'static,
    F: Fn() -> BoxFuture<'static, Result<C, ApiError>> + Send + Sync + 'static,
{
    pub fn new(connect: F) -> Self {
        ConnectOnDemand {
            connect,
            connection: OnceCell::new(),
        }
    }

    async fn connection(&self) -> Result<&C, ApiError> {
        self.connection
            .get_or_try_init(|| (self.connect)())
            .await
            .map_err(|e| match e {
                unavailable @ ApiError::ConnectionUnavailable(_) => unavailable,
                other => ApiError::ConnectionUnavailable(other.to_string()),
            })
    }
}

#[async_trait]
impl<C, F> ConnectionProbe for ConnectOnDemand<C, F>
where
    C: ConnectionProbe + 'static,
    F: Fn() -> BoxFuture<'static, Result<C, ApiError>> + Send + Sync + 'static,
{
    async fn ping(&self) -> Result<(), ApiError> {
        self.connection().await?.ping().await
    }

    async fn table_names(&self) -> Result<Vec<String>, ApiError> {
        self.connection().await?.table_names().await
    }
}

/// Blocks until `probe` answers, retrying every `interval` forever. Returns
/// the number of failed attempts and the tables present once connected.
/// A failure to list tables is logged, not returned.
pub async fn wait_for_database<P>(probe: &P, interval: Duration) -> (u64, Vec<String>)
where
    P: ConnectionProbe + ?Sized,
{
    log::info!("Waiting for database...");

    let mut failures = 0u64;
    while let Err(e) = probe.ping().await {
        failures += 1;
        log::warn!(
            "Database unavailable ({}), retrying in {} seconds...",
            e,
            interval.as_secs_f32()
        );
        tokio::time::sleep(interval).await;
    }

    log::info!("Database available!");

    let tables = match probe.table_names().await {
        Ok(tables) => {
            log::info!("Tables available: {:?}", tables);
            tables
        }
        Err(e) => {
            log::error!("Could not list tables: {}", e);
            Vec::new()
        }
    };

    (failures, tables)
}
