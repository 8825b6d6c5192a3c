use std::sync::Arc;

use pet_api::{api::state::AppState, infrastructure::{mongo_context::MongoContext, MongoPetRepository}, routes::mounted_pet_routes, utils::config::AppConfig};
use actix_web::{middleware::Logger, web, App, HttpServer};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mongo_context = match MongoContext::init(&config.database_url, &config.database_name, config.managed).await {
        Ok(context) => context,
        Err(e) => {
            log::error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(Arc::new(MongoPetRepository::new(&mongo_context)));
    let mount_path = config.mount_path.clone();
    let (host, port) = config.bind_address();

    log::info!("Server running at http://{}:{}{}/", host, port, mount_path);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(mounted_pet_routes(&mount_path))
    })
    .bind((host, port))?
    .run()
    .await
}
