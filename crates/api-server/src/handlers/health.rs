//! Health check and service endpoints

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use shared::DbPool;
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

impl HealthResponse {
    fn from_database(connected: bool) -> Self {
        Self {
            status: if connected { "healthy" } else { "unhealthy" }.to_string(),
            database: if connected { "connected" } else { "disconnected" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check endpoint
///
/// Returns the health status of the service and its database.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    )
)]
pub async fn health_check(pool: web::Data<DbPool>) -> impl Responder {
    let connected = match shared::db::check_health(&pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let response = HealthResponse::from_database(connected);
    if connected {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// OpenAPI JSON endpoint
#[utoipa::path(
    get,
    path = "/openapi.json",
    tag = "Health",
    responses(
        (status = 200, description = "OpenAPI specification", content_type = "application/json")
    )
)]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().content_type("application/json").body(
        ApiDoc::openapi()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::App;

    #[test]
    fn test_health_response_states() {
        let up = HealthResponse::from_database(true);
        assert_eq!(up.status, "healthy");
        assert_eq!(up.database, "connected");

        let down = HealthResponse::from_database(false);
        assert_eq!(down.status, "unhealthy");
        assert_eq!(down.database, "disconnected");
    }

    #[actix_web::test]
    async fn test_openapi_json_lists_routes() {
        let app = actix_test::init_service(
            App::new().route("/openapi.json", web::get().to(openapi_json)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/openapi.json").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert!(body["paths"].get("/login").is_some());
        assert!(body["paths"].get("/accounts").is_some());
        assert!(body["components"]["securitySchemes"].get("bearer_auth").is_some());
    }
}
