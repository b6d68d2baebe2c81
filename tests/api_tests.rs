//! API tests driving the full router in-process over the in-memory repository

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use libros_api::{
    api,
    models::{Libro, LibroInput},
    repository::InMemoryLibrosRepository,
    AppConfig, AppState,
};

struct TestResponse {
    status: StatusCode,
    allow: Option<String>,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    fn libro(&self) -> Libro {
        serde_json::from_slice(&self.body).expect("Response body is not a libro")
    }

    fn libros(&self) -> Vec<Libro> {
        serde_json::from_slice(&self.body).expect("Response body is not a libro list")
    }

    fn assert_error_body(&self) {
        let body = self.json();
        assert!(body["error"].is_string(), "expected an error body, got {}", body);
    }
}

fn input(titulo: &str, autor: &str, ano: i32) -> LibroInput {
    LibroInput {
        titulo: titulo.to_string(),
        autor: autor.to_string(),
        ano,
    }
}

fn seeded_repository() -> InMemoryLibrosRepository {
    InMemoryLibrosRepository::with_libros([
        input("Dune", "Frank Herbert", 1965),
        input("1984", "George Orwell", 1949),
        input("Fahrenheit 451", "Ray Bradbury", 1953),
    ])
}

fn app(repository: InMemoryLibrosRepository) -> Router {
    api::create_router(AppState::new(AppConfig::default(), Arc::new(repository)))
}

fn seeded_app() -> Router {
    app(seeded_repository())
}

fn empty_app() -> Router {
    app(InMemoryLibrosRepository::new())
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let allow = response
        .headers()
        .get(header::ALLOW)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse { status, allow, body }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let body = body.map(|b| b.to_string());
    send_raw(app, method, uri, body.as_deref()).await
}

async fn count(app: &Router) -> usize {
    send(app, Method::GET, "/libros", None).await.libros().len()
}

// =========================================================================
// LIST
// =========================================================================

#[tokio::test]
async fn test_list_returns_every_libro_in_id_order() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<i32> = response.libros().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_list_on_empty_storage_is_an_empty_array() {
    let app = empty_app();

    let response = send(&app, Method::GET, "/libros", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"[]");
}

#[tokio::test]
async fn test_list_filters_by_inclusive_year_range() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?yearFrom=1950&yearTo=1960", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let libros = response.libros();
    assert_eq!(libros.len(), 1);
    assert!(libros.iter().all(|l| (1950..=1960).contains(&l.ano)));

    let bounds = send(&app, Method::GET, "/libros?yearFrom=1949&yearTo=1953", None).await;
    let titles: Vec<String> = bounds.libros().into_iter().map(|l| l.titulo).collect();
    assert_eq!(titles, vec!["1984", "Fahrenheit 451"]);
}

#[tokio::test]
async fn test_list_accepts_short_parameter_names() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?autor=orwell&from=1900&to=2000", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let libros = response.libros();
    assert_eq!(libros.len(), 1);
    assert_eq!(libros[0].autor, "George Orwell");
}

#[tokio::test]
async fn test_list_filters_by_author_substring_ignoring_case() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?author=HERB", None).await;

    let libros = response.libros();
    assert_eq!(libros.len(), 1);
    assert_eq!(libros[0].titulo, "Dune");
}

#[tokio::test]
async fn test_list_rejects_inverted_year_range() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?yearFrom=1961&yearTo=1960", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    response.assert_error_body();
}

#[tokio::test]
async fn test_list_rejects_bad_numbers() {
    let app = seeded_app();

    for uri in [
        "/libros?yearFrom=abc",
        "/libros?yearTo=19x0",
        "/libros?limit=ten",
        "/libros?offset=1.5",
        "/libros?limit=-1",
        "/libros?offset=-5",
    ] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        response.assert_error_body();
    }
}

#[tokio::test]
async fn test_list_defaults_to_fifty_rows() {
    let repository = InMemoryLibrosRepository::with_libros(
        (1..=60).map(|n| input(&format!("Libro {}", n), "Autor", 1900 + n)),
    );
    let app = app(repository);

    let response = send(&app, Method::GET, "/libros", None).await;

    assert_eq!(response.libros().len(), 50);
}

#[tokio::test]
async fn test_list_with_zero_limit_returns_nothing() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?limit=0", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.libros().is_empty());
}

#[tokio::test]
async fn test_list_pages_with_limit_and_offset() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/libros?limit=2&offset=1", None).await;

    let ids: Vec<i32> = response.libros().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

// =========================================================================
// CREATE
// =========================================================================

#[tokio::test]
async fn test_create_returns_201_with_generated_id() {
    let app = empty_app();

    let response = send(
        &app,
        Method::POST,
        "/libros",
        Some(json!({"titulo": "1984", "autor": "George Orwell", "ano": 1949})),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["titulo"], "1984");
    assert_eq!(body["autor"], "George Orwell");
    assert_eq!(body["ano"], 1949);
}

#[tokio::test]
async fn test_created_libro_round_trips_through_get() {
    let app = empty_app();

    let created = send(
        &app,
        Method::POST,
        "/libros",
        Some(json!({"titulo": "  Solaris ", "autor": "Stanisław Lem", "ano": 1961})),
    )
    .await
    .libro();

    let fetched = send(&app, Method::GET, &format!("/libros/{}", created.id), None).await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.libro(), created);
    assert_eq!(created.titulo, "  Solaris ");
}

#[tokio::test]
async fn test_created_ids_are_distinct() {
    let app = seeded_app();
    let mut ids = vec![1, 2, 3];

    send(&app, Method::DELETE, "/libros/3", None).await;
    for n in 0..5 {
        let created = send(
            &app,
            Method::POST,
            "/libros",
            Some(json!({"titulo": format!("T{}", n), "autor": "A", "ano": 2000})),
        )
        .await
        .libro();
        assert!(created.id > 0);
        assert!(!ids.contains(&created.id), "id {} reused", created.id);
        ids.push(created.id);
    }
}

#[tokio::test]
async fn test_create_rejects_bad_payloads() {
    let app = seeded_app();

    for body in [
        "{titulo:}",
        "",
        r#"{"titulo":"X","autor":"Y"}"#,
        r#"{"titulo":"X","autor":"Y","ano":"2000"}"#,
        r#"{"titulo":"X","autor":"Y","ano":2000,"isbn":"123"}"#,
        r#"{"title":"X","author":"Y","year":2000}"#,
        r#"{"titulo":"","autor":"Y","ano":2000}"#,
        r#"{"titulo":"X","autor":"   ","ano":2000}"#,
        r#"{"titulo":"X","autor":"Y","ano":0}"#,
    ] {
        let response = send_raw(&app, Method::POST, "/libros", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
        response.assert_error_body();
    }

    assert_eq!(count(&app).await, 3);
}

#[tokio::test]
async fn test_create_does_not_require_content_type() {
    let app = empty_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/libros")
        .body(Body::from(r#"{"titulo":"Dune","autor":"Frank Herbert","ano":1965}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

// =========================================================================
// GET BY ID
// =========================================================================

#[tokio::test]
async fn test_get_by_id() {
    let cases = [
        ("2", StatusCode::OK, Some("1984")),
        ("999", StatusCode::NOT_FOUND, None),
        ("abc", StatusCode::BAD_REQUEST, None),
    ];

    for (id, status, titulo) in cases {
        let app = seeded_app();

        let response = send(&app, Method::GET, &format!("/libros/{}", id), None).await;

        assert_eq!(response.status, status, "id {}", id);
        match titulo {
            Some(titulo) => assert_eq!(response.libro().titulo, titulo),
            None => response.assert_error_body(),
        }
    }
}

#[tokio::test]
async fn test_empty_id_segment_is_a_bad_id() {
    let app = seeded_app();

    for method in [Method::GET, Method::DELETE] {
        let response = send(&app, method.clone(), "/libros/", None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", method);
        response.assert_error_body();
    }

    let response = send(&app, Method::PATCH, "/libros/", Some(json!({"titulo": "X"}))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(count(&app).await, 3);
}

// =========================================================================
// UPDATE
// =========================================================================

#[tokio::test]
async fn test_update_replaces_every_field() {
    let app = seeded_app();

    let response = send(
        &app,
        Method::PUT,
        "/libros/1",
        Some(json!({"titulo": "Dune Messiah", "autor": "Frank Herbert", "ano": 1969})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.libro(),
        Libro {
            id: 1,
            titulo: "Dune Messiah".to_string(),
            autor: "Frank Herbert".to_string(),
            ano: 1969,
        }
    );
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = seeded_app();

    let response = send(
        &app,
        Method::PUT,
        "/libros/999",
        Some(json!({"titulo": "X", "autor": "Y", "ano": 2000})),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    response.assert_error_body();
}

#[tokio::test]
async fn test_update_requires_the_full_body() {
    let app = seeded_app();

    let response = send(&app, Method::PUT, "/libros/1", Some(json!({"titulo": "X"}))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        send(&app, Method::GET, "/libros/1", None).await.libro().titulo,
        "Dune"
    );
}

// =========================================================================
// PATCH
// =========================================================================

#[tokio::test]
async fn test_patch_changes_only_the_sent_field() {
    let app = seeded_app();

    let response = send(&app, Method::PATCH, "/libros/1", Some(json!({"titulo": "Dune Messiah"}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.libro(),
        Libro {
            id: 1,
            titulo: "Dune Messiah".to_string(),
            autor: "Frank Herbert".to_string(),
            ano: 1965,
        }
    );
}

#[tokio::test]
async fn test_empty_patch_returns_the_libro_unchanged() {
    let app = seeded_app();
    let before = send(&app, Method::GET, "/libros/1", None).await.libro();

    let response = send(&app, Method::PATCH, "/libros/1", Some(json!({}))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.libro(), before);
}

#[tokio::test]
async fn test_patch_rejects_present_but_invalid_fields() {
    let app = seeded_app();

    for body in [
        json!({"titulo": ""}),
        json!({"autor": " "}),
        json!({"ano": -1}),
        json!({"titulo": null}),
        json!({"titulo": "X", "editorial": "Y"}),
    ] {
        let response = send(&app, Method::PATCH, "/libros/1", Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
        response.assert_error_body();
    }

    assert_eq!(
        send(&app, Method::GET, "/libros/1", None).await.libro().titulo,
        "Dune"
    );
}

#[tokio::test]
async fn test_patch_unknown_id_is_not_found() {
    let app = seeded_app();

    let response = send(&app, Method::PATCH, "/libros/999", Some(json!({"titulo": "X"}))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, Method::PATCH, "/libros/999", Some(json!({}))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =========================================================================
// DELETE
// =========================================================================

#[tokio::test]
async fn test_delete_returns_204_without_body() {
    let app = seeded_app();

    let response = send(&app, Method::DELETE, "/libros/1", None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
    assert_eq!(
        send(&app, Method::GET, "/libros/1", None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(count(&app).await, 2);
}

#[tokio::test]
async fn test_delete_on_empty_storage_is_not_found() {
    let app = empty_app();

    let response = send(&app, Method::DELETE, "/libros/999", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    response.assert_error_body();
}

// =========================================================================
// METHODS, ROUTES, HEALTH
// =========================================================================

#[tokio::test]
async fn test_unsupported_methods_list_the_allowed_ones() {
    let app = seeded_app();

    let cases = [
        (Method::PUT, "/libros", "GET, POST"),
        (Method::DELETE, "/libros", "GET, POST"),
        (Method::POST, "/libros/1", "GET, PUT, PATCH, DELETE"),
        (Method::PATCH, "/libros", "GET, POST"),
        (Method::OPTIONS, "/libros", "GET, POST"),
        (Method::OPTIONS, "/libros/1", "GET, PUT, PATCH, DELETE"),
        (Method::POST, "/libros/", "GET, PUT, PATCH, DELETE"),
    ];

    for (method, uri, allow) in cases {
        let response = send(&app, method.clone(), uri, None).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        assert_eq!(response.allow.as_deref(), Some(allow), "{} {}", method, uri);
        response.assert_error_body();
    }
}

#[tokio::test]
async fn test_unknown_routes_are_json_404s() {
    let app = seeded_app();

    let response = send(&app, Method::GET, "/autores", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    response.assert_error_body();
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = empty_app();

    let health = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "healthy");

    let ready = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.json()["status"], "ready");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = empty_app();

    let response = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["paths"]["/libros/{id}"].is_object());
}
