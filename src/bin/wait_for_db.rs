//! Blocks until the configured MongoDB answers, then lists its collections.

use pet_api::{infrastructure::{mongo_context::MongoContext, readiness::{wait_for_database, ConnectOnDemand, RETRY_INTERVAL}}, utils::config::AppConfig};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // A malformed URI never becomes valid by waiting.
    if let Err(e) = MongoContext::validate_mongo_uri(&config.database_url) {
        log::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let probe = ConnectOnDemand::new(MongoContext::connector(&config.database_url, &config.database_name));
    wait_for_database(&probe, RETRY_INTERVAL).await;
}
