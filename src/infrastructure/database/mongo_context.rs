use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use futures::{future::BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use mongodb::{bson::doc, options::ClientOptions, Client, Collection, Database};
use regex::Regex;

use crate::infrastructure::database::readiness::ConnectionProbe;
use crate::utils::errors::ApiError;

pub const PETS_COLLECTION: &str = "pets";
pub const COUNTERS_COLLECTION: &str = "counters";

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct MongoContext {
    db: Database
}

impl MongoContext {

    /// Builds a client without touching the network beyond URI resolution.
    pub async fn new(uri: &str, db_name: &str) -> Result<MongoContext, Box<dyn Error + Send + Sync>> {
        Self::validate_mongo_uri(uri)?;

        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.app_name = Some("PetApi".to_string());
        if client_options.server_selection_timeout.is_none() {
            client_options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }

        let client = Client::with_options(client_options)
            .map_err(|e| format!("Failed to create MongoDB client: {}", e))?;

        Ok(MongoContext { db: client.database(db_name) })
    }

    /// Connects and verifies the server answers. In managed mode the `pets`
    /// collection is created when missing; otherwise it must already exist.
    pub async fn init(uri: &str, db_name: &str, managed: bool) -> Result<MongoContext, Box<dyn Error + Send + Sync>> {
        log::info!("Attempting to connect to MongoDB database '{}'", db_name);

        let context = Self::new(uri, db_name).await?;

        context.ping()
            .await
            .map_err(|e| format!("Failed to connect to MongoDB: {}", e))?;

        if managed {
            context.ensure_pets_collection().await?;
            log::info!("Pets collection set to managed mode");
        } else {
            log::info!("Pets collection set to unmanaged mode");
        }

        log::info!("Successfully connected to MongoDB database: {}", db_name);
        Ok(context)
    }

    /// A connect step for [`ConnectOnDemand`](crate::infrastructure::readiness::ConnectOnDemand):
    /// every call builds a fresh context, so SRV/DNS lookups are repeated.
    pub fn connector(uri: &str, db_name: &str) -> impl Fn() -> BoxFuture<'static, Result<MongoContext, ApiError>> + Send + Sync + 'static {
        let uri = uri.to_string();
        let db_name = db_name.to_string();
        move || {
            let uri = uri.clone();
            let db_name = db_name.clone();
            async move {
                Self::new(&uri, &db_name)
                    .await
                    .map_err(|e| ApiError::ConnectionUnavailable(e.to_string()))
            }
            .boxed()
        }
    }

    pub fn get_db(&self) -> &Database {
        &self.db
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync + Unpin + for<'de> Deserialize<'de> + Serialize,
    {
        self.db.collection::<T>(name)
    }

    async fn ensure_pets_collection(&self) -> Result<(), ApiError> {
        let existing = self.db.list_collection_names().await?;
        if !existing.iter().any(|name| name == PETS_COLLECTION) {
            self.db.create_collection(PETS_COLLECTION).await?;
            log::info!("Created collection '{}'", PETS_COLLECTION);
        }
        Ok(())
    }

    pub fn validate_mongo_uri(uri: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let trimmed_uri = uri.trim();
        if trimmed_uri.is_empty() {
            return Err("Invalid MongoDB URI: cannot be empty or whitespace".into());
        }

        let host_part = if let Some(rest) = trimmed_uri.strip_prefix("mongodb://") {
            rest
        } else if let Some(rest) = trimmed_uri.strip_prefix("mongodb+srv://") {
            rest
        } else {
            return Err(format!("Invalid MongoDB URI: must start with 'mongodb://' or 'mongodb+srv://'. Got: {}", uri).into());
        };

        if host_part.trim().is_empty() {
            return Err("Invalid MongoDB URI: missing host after protocol".into());
        }

        if uri.contains(char::is_whitespace) {
            return Err("Invalid MongoDB URI: cannot contain whitespace".into());
        }

        let re = Regex::new(r"^mongodb(\+srv)?://([^/\s]+)(/.*)?$")?;
        if !re.is_match(trimmed_uri) {
            return Err(format!("Invalid MongoDB URI format. Expected format: mongodb://host[:port][/database] or mongodb+srv://host[/database]. Got: {}", uri).into());
        }

        Ok(())
    }

}

#[async_trait]
impl ConnectionProbe for MongoContext {
    async fn ping(&self) -> Result<(), ApiError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| ApiError::ConnectionUnavailable(e.to_string()))
    }

    async fn table_names(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.db.list_collection_names().await?)
    }
}
