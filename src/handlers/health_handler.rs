use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, models::dto::response::HealthResponse};

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(()) => "ok",
            Err(err) => {
                log::warn!("Database health check failed: {}", err);
                "error"
            }
        },
        None => "not_configured",
    };

    let response = HealthResponse {
        status: if database == "error" { "degraded" } else { "healthy" },
        database,
    };

    if database == "error" {
        HttpResponse::ServiceUnavailable().json(response)
    } else {
        HttpResponse::Ok().json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        repositories::{MockQuizAttemptRepository, MockQuizRepository},
    };
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_check_without_database() {
        let state = AppState::with_repositories(
            Config::test_config(),
            Arc::new(MockQuizRepository::new()),
            Arc::new(MockQuizAttemptRepository::new()),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(health_check),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "not_configured");
    }
}
