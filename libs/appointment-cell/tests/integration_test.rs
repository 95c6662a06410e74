use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, NaiveDate, Utc};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_models::AppState;
use shared_store::models::{NewDoctor, NewPatient};
use shared_store::Store;

fn test_state() -> Arc<AppState> {
    let store = Store::open_in_memory().unwrap();
    store
        .insert_patient(&NewPatient {
            first_name: "Maria".into(),
            last_name: "Santos".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 4, 2).unwrap(),
            email: Some("maria@example.com".into()),
            phone: Some("+15551234567".into()),
            address: None,
        })
        .unwrap();
    store
        .insert_patient(&NewPatient {
            first_name: "Jonas".into(),
            last_name: "Berg".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1979, 11, 23).unwrap(),
            email: None,
            phone: None,
            address: None,
        })
        .unwrap();
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

fn future_date() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(30)
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking(patient_id: i64, time: &str) -> serde_json::Value {
    serde_json::json!({
        "patient_id": patient_id,
        "doctor_id": 1,
        "appointment_date": future_date().to_string(),
        "appointment_time": time
    })
}

async fn book(app: &axum::Router, patient_id: i64, time: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/", booking(patient_id, time)))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn first_visit_books_an_hour_with_reminders() {
    let app = appointment_routes(test_state());
    let (status, body) = book(&app, 1, "10:00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["duration_minutes"], 60);
    assert_eq!(body["appointment"]["status"], "scheduled");
    assert_eq!(body["reminders"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn returning_patient_gets_half_hour() {
    let app = appointment_routes(test_state());
    let (status, _) = book(&app, 1, "09:00").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = book(&app, 1, "14:00").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["duration_minutes"], 30);
}

#[tokio::test]
async fn double_booking_a_slot_conflicts() {
    let app = appointment_routes(test_state());
    let (status, _) = book(&app, 1, "10:00").await;
    assert_eq!(status, StatusCode::OK);
    // First visit took 10:00 and 10:30.
    let (status, body) = book(&app, 2, "10:30").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn last_slot_hour_booking_does_not_error() {
    let app = appointment_routes(test_state());
    // New patient at 16:30 runs past the workday; only 16:30 is taken.
    let (status, _) = book(&app, 1, "16:30").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = book(&app, 2, "16:00").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_patient_is_404() {
    let app = appointment_routes(test_state());
    let (status, _) = book(&app, 99, "10:00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn off_grid_time_conflicts_and_bad_time_is_rejected() {
    let app = appointment_routes(test_state());
    let (status, _) = book(&app, 1, "10:15").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = book(&app, 1, "late morning").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lifecycle_runs_forward_and_stops_at_terminal() {
    let app = appointment_routes(test_state());
    let (_, body) = book(&app, 1, "11:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let confirmed = app
        .clone()
        .oneshot(empty_post(&format!("/{id}/confirm")))
        .await
        .unwrap();
    assert_eq!(confirmed.status(), StatusCode::OK);
    let body = body_json(confirmed).await;
    assert_eq!(body["appointment"]["status"], "confirmed");
    assert_eq!(body["notifications"].as_array().unwrap().len(), 2);

    let completed = app
        .clone()
        .oneshot(empty_post(&format!("/{id}/complete")))
        .await
        .unwrap();
    assert_eq!(completed.status(), StatusCode::OK);

    // Completed is terminal.
    let cancelled = app
        .clone()
        .oneshot(empty_post(&format!("/{id}/cancel")))
        .await
        .unwrap();
    assert_eq!(cancelled.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancelling_records_the_reason_and_frees_the_slot() {
    let app = appointment_routes(test_state());
    let (_, body) = book(&app, 1, "10:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/{id}/cancel"),
            serde_json::json!({ "reason": "feeling better" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["appointment"]["status"], "cancelled");
    assert!(body["appointment"]["notes"]
        .as_str()
        .unwrap()
        .contains("Cancelled: feeling better"));

    // Slot opens up again.
    let (status, _) = book(&app, 2, "10:00").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn completing_a_scheduled_appointment_is_rejected() {
    let app = appointment_routes(test_state());
    let (_, body) = book(&app, 1, "12:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(empty_post(&format!("/{id}/complete")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reminders_listing_matches_schedule() {
    let app = appointment_routes(test_state());
    let (_, body) = book(&app, 1, "10:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{id}/reminders"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let reminders = body["reminders"].as_array().unwrap();
    assert_eq!(reminders.len(), 3);
    assert!(reminders.iter().all(|r| r["status"] == "pending"));
}

#[tokio::test]
async fn dispatch_sends_overdue_reminders_once() {
    let state = test_state();
    let app = appointment_routes(state.clone());
    let (_, body) = book(&app, 1, "10:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let overdue = Utc::now() - Duration::hours(1);
    state
        .store
        .with_conn(|conn| shared_store::insert_reminder(conn, id, "7-day", overdue))
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_post("/reminders/dispatch"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["dispatched"], 1);
    assert_eq!(body["reports"][0]["status"], "sent");

    // Already sent; nothing left to pick up.
    let again = body_json(
        app.oneshot(empty_post("/reminders/dispatch")).await.unwrap(),
    )
    .await;
    assert_eq!(again["dispatched"], 0);
}

#[tokio::test]
async fn dispatch_without_contact_details_marks_failed() {
    let state = test_state();
    let app = appointment_routes(state.clone());
    // Jonas has neither an email address nor a phone number.
    let (_, body) = book(&app, 2, "10:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let overdue = Utc::now() - Duration::hours(1);
    state
        .store
        .with_conn(|conn| shared_store::insert_reminder(conn, id, "1-day", overdue))
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_post("/reminders/dispatch"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["dispatched"], 1);
    assert_eq!(body["reports"][0]["status"], "failed");
    assert!(body["reports"][0]["deliveries"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["delivered"] == false));

    // Failed reminders are not retried on the next run.
    let again = body_json(
        app.oneshot(empty_post("/reminders/dispatch")).await.unwrap(),
    )
    .await;
    assert_eq!(again["dispatched"], 0);
}

#[tokio::test]
async fn export_returns_csv_for_one_or_all() {
    let app = appointment_routes(test_state());
    let (_, body) = book(&app, 1, "10:00").await;
    let id = body["appointment"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/{id}/export"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("appointment_id,"));
    assert!(csv.contains("Maria,Santos"));

    let missing = app
        .oneshot(
            Request::builder()
                .uri("/999/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
