mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_market::services::places::PlacesClient;
use common::{env_config::Config, error::json_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let config_data = config.clone();

    // init logger
    if config.console_logging_enabled {
        let level = logger::default_level(config.is_production());
        logger::setup(level, &config.log_file).expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, config.is_production())
        .await
        .expect("Failed to set up database");

    // shared across workers so the limits are server-wide
    let global_limiter = limiter::global_middleware(config.global_rate_limit);
    let client_limiter = limiter::client_middleware(config.client_rate_limit);
    let places = web::Data::new(PlacesClient::new(&config.google_places));

    log::info!(
        "Starting storefront on {}:{} ({} workers)",
        config.server_host,
        config.server_port,
        config.num_workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(places.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(global_limiter.clone()) // 4th
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware(&config_data.jwt_config.secret)) // 2nd
            .wrap(cors::middleware(&config_data.cors_allowed_origin)) // 1st
            .service(
                web::scope("/api")
                    .wrap(extractor::require_auth())
                    .wrap(client_limiter.clone())
                    .service(api_limits::mount_admin())
                    .configure(api_limits::mount_limits)
                    .configure(api_coupons::mount_coupons)
                    .configure(api_market::mount_market),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
