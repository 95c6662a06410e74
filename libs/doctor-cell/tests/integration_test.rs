use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;
use shared_models::AppState;
use shared_store::models::NewDoctor;
use shared_store::Store;

fn test_state() -> Arc<AppState> {
    let store = Store::open_in_memory().unwrap();
    store
        .insert_doctor(&NewDoctor {
            first_name: "Sarah".into(),
            last_name: "Chen".into(),
            specialty: "family_medicine".into(),
            email: None,
            phone: None,
        })
        .unwrap();
    Arc::new(AppState::new(AppConfig::default(), store))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn lists_the_directory() {
    let app = doctor_routes(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["doctors"].as_array().unwrap().len(), 1);
    assert_eq!(json["doctors"][0]["specialty"], "family_medicine");
}

#[tokio::test]
async fn availability_returns_the_full_grid_for_a_free_day() {
    let app = doctor_routes(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/1/availability?date=2025-03-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let slots = json["available_slots"].as_array().unwrap();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[15], "16:30");
}

#[tokio::test]
async fn availability_for_unknown_doctor_is_404() {
    let app = doctor_routes(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/99/availability?date=2025-03-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
