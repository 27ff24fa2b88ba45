use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketpro_backend::config::AppConfig;
use ticketpro_backend::database::Database;
use ticketpro_backend::handlers;
use ticketpro_backend::handlers::settings::ServerInfo;
use ticketpro_backend::middleware::AuthMiddleware;
use ticketpro_backend::repositories::Repositories;
use ticketpro_backend::seed;
use ticketpro_backend::utils::jwt::JwtService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Starting TicketPro backend on {}:{}",
        config.host, config.port
    );

    let database = Database::new(&config.database_url).await?;
    database.migrate().await?;
    seed::seed(database.pool(), !config.is_production()).await?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret)?);
    let repositories = Repositories::new(database.pool().clone());
    let server_info = ServerInfo::new();

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        let cors = if config.cors_origin == "*" {
            Cors::permissive()
        } else {
            Cors::default()
                .allowed_origin(&config.cors_origin)
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
                .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
                .max_age(3600)
        };
        let auth = || AuthMiddleware::new(jwt_service.clone(), repositories.users.clone());

        App::new()
            .app_data(web::Data::new(database.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .app_data(web::Data::new(repositories.clone()))
            .app_data(web::Data::new(server_info.clone()))
            .wrap(cors)
            .service(
                web::scope("/api")
                    .service(handlers::health::ping)
                    .service(
                        web::scope("/auth")
                            .service(handlers::auth::login)
                            .service(
                                web::scope("")
                                    .wrap(auth())
                                    .service(handlers::auth::me)
                                    .service(handlers::auth::logout),
                            ),
                    )
                    .service(
                        web::scope("/tickets")
                            .wrap(auth())
                            .service(handlers::tickets::list_tickets)
                            .service(handlers::tickets::list_country_tickets)
                            .service(handlers::tickets::dashboard_stats)
                            .service(handlers::tickets::countries_stats)
                            .service(handlers::tickets::update_ticket_status)
                            .service(handlers::tickets::get_ticket),
                    )
                    .service(
                        web::scope("/ticket-batches")
                            .wrap(auth())
                            .service(handlers::ticket_batches::list_batches)
                            .service(handlers::ticket_batches::create_batch)
                            .service(handlers::ticket_batches::get_batch)
                            .service(handlers::ticket_batches::update_batch)
                            .service(handlers::ticket_batches::delete_batch),
                    )
                    .service(
                        web::scope("/bookings")
                            .wrap(auth())
                            .service(handlers::bookings::list_bookings)
                            .service(handlers::bookings::create_booking)
                            .service(handlers::bookings::update_booking_status)
                            .service(handlers::bookings::get_booking)
                            .service(handlers::bookings::cancel_booking),
                    )
                    .service(
                        web::scope("/users")
                            .wrap(auth())
                            .service(handlers::users::list_users)
                            .service(handlers::users::create_user)
                            .service(handlers::users::update_profile)
                            .service(handlers::users::change_password)
                            .service(handlers::users::get_user)
                            .service(handlers::users::update_user)
                            .service(handlers::users::delete_user),
                    )
                    .service(
                        web::scope("/settings")
                            .wrap(auth())
                            .service(handlers::settings::get_settings)
                            .service(handlers::settings::update_settings)
                            .service(handlers::settings::export_data)
                            .service(handlers::settings::activity_logs)
                            .service(handlers::settings::system_info)
                            .service(handlers::settings::create_backup)
                            .service(handlers::settings::get_setting)
                            .service(handlers::settings::put_setting),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
