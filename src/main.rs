use std::io;

use dotenvy::dotenv;
use ezichoice::{build_server, create_pool, run_migrations, AppConfig, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url, config.database_pool_size)
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(io::Error::other)?;

    if !config.payment.verify_webhooks {
        log::warn!("Payment webhook signature verification is disabled");
    }
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = AppState::new(pool, &config);
    build_server(state, &config.host, config.port)?.await
}
