use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use questlog::auth::TokenAuthority;
use questlog::config::Config;
use questlog::mail::Mailer;
use questlog::routes;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let authority = TokenAuthority::from_config(&config);
    let mailer = Mailer::from_config(&config).expect("Failed to configure mail transport");

    log::info!("starting questlog server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        // The refresh cookie travels cross-site, so CORS must both name the
        // frontend origins explicitly and allow credentials.
        let mut cors = Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(authority.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api/v1").configure(routes::config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
