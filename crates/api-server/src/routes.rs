//! Route configuration for the API
//!
//! Public routes are registered first; everything else lives in a scope
//! wrapped by [`JwtAuth`](middleware::JwtAuth), so a protected handler never
//! runs without a resolved principal. Paths nobody registered get a 404
//! envelope whether or not the caller is authenticated.

use actix_web::web;

use crate::handlers::{self, helpers};
use crate::middleware;

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(helpers::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(helpers::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(helpers::path_error_handler))
        .default_service(web::to(helpers::not_found));

    // Public endpoints
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/openapi.json", web::get().to(handlers::openapi_json))
        .route("/register", web::post().to(handlers::register))
        .route("/login", web::post().to(handlers::login))
        .route("/refresh", web::post().to(handlers::refresh));

    // Protected endpoints
    cfg.service(
        web::scope("")
            .wrap(middleware::JwtAuth::new())
            .route("/current", web::get().to(handlers::current))
            .route("/logout", web::delete().to(handlers::logout))
            .route("/update", web::patch().to(handlers::update))
            .route("/change_password", web::patch().to(handlers::change_password))
            .route("/change_profile", web::patch().to(handlers::change_profile))
            .route("/add_account", web::post().to(handlers::add_account))
            .route("/accounts", web::get().to(handlers::list_accounts))
            .service(
                web::resource("/account/{id}")
                    .route(web::get().to(handlers::get_account))
                    .route(web::patch().to(handlers::update_account))
                    .route(web::delete().to(handlers::delete_account)),
            )
            .route("/withdrawal", web::post().to(handlers::withdraw))
            .route("/follow/{target_id}", web::post().to(handlers::follow)),
    );
}
