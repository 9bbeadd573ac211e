//! # API REST
//!
//! REST API implementation for the patient records service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for response types and `records-core` for every patient operation.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

use api_shared::{
    ErrorRes, FieldErrorRes, HealthRes, InfoRes, MessageRes, PatientMutationRes, PatientRes,
};
use axum::routing::{delete, get, post, put};
use axum::Router;
use records_core::{Gender, NewPatient, PatientPatch, PatientService, PatientStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::{ApiError, ApiResult};

/// Application state shared across REST API handlers
///
/// The store is chosen at startup, so the service holds it as a trait object.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService<Box<dyn PatientStore>>,
}

impl AppState {
    pub fn new(store: impl PatientStore + 'static) -> Self {
        let store: Box<dyn PatientStore> = Box::new(store);
        Self {
            patient_service: PatientService::new(store),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::health,
        handlers::list_patients,
        handlers::get_patient,
        handlers::sorted_patients,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient
    ),
    components(schemas(
        HealthRes,
        InfoRes,
        MessageRes,
        ErrorRes,
        FieldErrorRes,
        PatientRes,
        PatientMutationRes,
        NewPatient,
        PatientPatch,
        Gender
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI, request tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/patients", get(handlers::list_patients))
        .route("/patients/:id", get(handlers::get_patient))
        .route("/sorted-patients", get(handlers::sorted_patients))
        .route("/create", post(handlers::create_patient))
        .route("/update/:id", put(handlers::update_patient))
        .route("/delete/:id", delete(handlers::delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use records_core::{InMemoryStore, JsonFileStore, PatientCollection};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn patient_body(id: &str, age: i64) -> Value {
        json!({
            "id": id,
            "name": "Ananya Verma",
            "city": "Guwahati",
            "age": age,
            "gender": "female",
            "height": 165.0,
            "weight": 90.0
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be JSON")
        };
        (status, json)
    }

    /// Router over an in-memory store seeded with P1 (30), P2 (25), P3 (30).
    async fn seeded_app() -> Router {
        let app = router(AppState::new(InMemoryStore::new()));
        for (id, age) in [("P1", 30), ("P2", 25), ("P3", 30)] {
            let (status, _) =
                send(&app, Method::POST, "/create", Some(patient_body(id, age))).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        app
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = router(AppState::new(InMemoryStore::new()));

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient Management System API");

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_create_returns_derived_fields() {
        let app = router(AppState::new(InMemoryStore::new()));
        let (status, body) =
            send(&app, Method::POST, "/create", Some(patient_body("P001", 28))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Patient created successfully");
        assert_eq!(body["patient"]["id"], "P001");
        assert_eq!(body["patient"]["bmi"], 33.06);
        assert_eq!(body["patient"]["verdict"], "Obese");
    }

    #[tokio::test]
    async fn test_create_duplicate_is_bad_request() {
        let app = seeded_app().await;
        let (status, body) =
            send(&app, Method::POST, "/create", Some(patient_body("P1", 40))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Patient with this ID already exists");

        let (_, list) = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(list["P1"]["age"], 30);
    }

    #[tokio::test]
    async fn test_create_invalid_is_unprocessable() {
        let app = router(AppState::new(InMemoryStore::new()));
        let mut body = patient_body("P001", 0);
        body["height"] = json!(-1.0);

        let (status, body) = send(&app, Method::POST, "/create", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .expect("errors should be a list")
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["age", "height"]);
    }

    #[tokio::test]
    async fn test_create_with_derived_field_is_rejected() {
        let app = router(AppState::new(InMemoryStore::new()));
        let mut body = patient_body("P001", 28);
        body["bmi"] = json!(12.0);

        let (status, body) = send(&app, Method::POST, "/create", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_create_with_malformed_json_is_bad_request() {
        let app = router(AppState::new(InMemoryStore::new()));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/create")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .expect("request should build");

        let response = app.oneshot(request).await.expect("router should respond");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&String> = body.as_object().expect("object").keys().collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);

        let (status, body) = send(&app, Method::GET, "/patients/P2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "P2");
        assert_eq!(body["verdict"], "Obese");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let app = seeded_app().await;
        let (status, body) = send(&app, Method::GET, "/patients/P404", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "Patient not found" }));
    }

    #[tokio::test]
    async fn test_sorted_by_age_desc_is_stable() {
        let app = seeded_app().await;
        let (status, body) =
            send(&app, Method::GET, "/sorted-patients?sort_by=age&order=desc", None).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .expect("list")
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["P1", "P3", "P2"]);
    }

    #[tokio::test]
    async fn test_sorted_without_order_is_bad_request() {
        let app = seeded_app().await;
        let (status, body) =
            send(&app, Method::GET, "/sorted-patients?sort_by=age", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Invalid sort order, select from [asc, desc]");
    }

    #[tokio::test]
    async fn test_sorted_invalid_arguments_are_bad_request() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/sorted-patients?sort_by=invalidfield&order=asc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = body["detail"].as_str().expect("detail");
        for field in ["age", "name", "height", "weight"] {
            assert!(detail.contains(field), "{detail} should name {field}");
        }

        let (status, _) =
            send(&app, Method::GET, "/sorted-patients?sort_by=age&order=up", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/sorted-patients", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_weight_recomputes_derived_fields() {
        let app = seeded_app().await;
        let (status, body) =
            send(&app, Method::PUT, "/update/P2", Some(json!({ "weight": 80 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient updated successfully");
        assert_eq!(body["patient"]["weight"], 80.0);
        assert_eq!(body["patient"]["bmi"], 29.38);
        assert_eq!(body["patient"]["verdict"], "Overweight");
        assert_eq!(body["patient"]["age"], 25);
        assert_eq!(body["patient"]["name"], "Ananya Verma");
    }

    #[tokio::test]
    async fn test_update_null_keeps_existing_value() {
        let app = seeded_app().await;
        let (status, body) = send(
            &app,
            Method::PUT,
            "/update/P1",
            Some(json!({ "city": null, "age": 31 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patient"]["city"], "Guwahati");
        assert_eq!(body["patient"]["age"], 31);
    }

    #[tokio::test]
    async fn test_update_to_invalid_age_leaves_record_unchanged() {
        let app = seeded_app().await;
        let (status, _) = send(&app, Method::PUT, "/update/P1", Some(json!({ "age": 0 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(&app, Method::GET, "/patients/P1", None).await;
        assert_eq!(body["age"], 30);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let app = seeded_app().await;
        let (status, _) =
            send(&app, Method::PUT, "/update/P404", Some(json!({ "weight": 80 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::DELETE, "/delete/P2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Patient deleted successfully");

        let (status, _) = send(&app, Method::DELETE, "/delete/P2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(list.as_object().expect("object").len(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error_without_detail() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("patients.json");
        let app = router(AppState::new(JsonFileStore::new(&missing)));

        let (status, body) = send(&app, Method::GET, "/patients", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "detail": "Internal error" }));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_routers() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.json");
        JsonFileStore::new(&path)
            .initialise(&PatientCollection::new(), false)
            .expect("initialise should succeed");

        let app = router(AppState::new(JsonFileStore::new(&path)));
        let (status, _) =
            send(&app, Method::POST, "/create", Some(patient_body("P001", 28))).await;
        assert_eq!(status, StatusCode::CREATED);

        let reopened = router(AppState::new(JsonFileStore::new(&path)));
        let (status, body) = send(&reopened, Method::GET, "/patients/P001", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bmi"], 33.06);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = router(AppState::new(InMemoryStore::new()));
        let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/sorted-patients"].is_object());
        assert!(body["paths"]["/update/{id}"].is_object());
    }
}
