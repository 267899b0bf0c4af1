//! HTTP-level tests driving the axum router directly.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use studymap_rust::api::RoomKind;
use studymap_rust::config::AppConfig;
use studymap_rust::db::models::Room;
use studymap_rust::db::{DatasetRepository, FullRepository, LocalRepository, OccupancyRepository};
use studymap_rust::http::{create_router, AppState};

fn room(room_id: &str, block: &str, capacity: i32) -> Room {
    Room {
        room_id: room_id.to_string(),
        block: block.to_string(),
        capacity,
        kind: RoomKind::Lecture,
        ac: true,
        lat: 12.8233,
        lon: 80.0424,
        amenities: "projector,whiteboard".to_string(),
        current_level: 0,
    }
}

/// Router over three rooms in two blocks. No timetable entries, so status
/// depends only on occupancy levels.
async fn test_app() -> (axum::Router, Arc<dyn FullRepository>) {
    let repo: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    repo.replace_dataset(
        vec![
            room("UB-0101", "UB", 60),
            room("UB-0102", "UB", 60),
            room("TP-0701", "TP", 120),
        ],
        vec![],
        "http-test".to_string(),
    )
    .await
    .unwrap();
    let state = AppState::new(Arc::clone(&repo), AppConfig::default());
    (create_router(state), repo)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _repo) = test_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["dataset"]["rooms"], 3);
}

#[tokio::test]
async fn test_rooms_all() {
    let (app, _repo) = test_app().await;
    let response = app.oneshot(get("/rooms/all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 3);
    assert!(rooms.iter().all(|r| r["status"] == "free"));
    assert!(rooms.iter().all(|r| r["occupancy_level"] == 0));
}

#[tokio::test]
async fn test_rooms_free_excludes_occupied() {
    let (app, repo) = test_app().await;
    repo.apply_occupancy("UB-0101", 80).await.unwrap();

    let response = app.oneshot(get("/rooms/free")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["room_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["TP-0701", "UB-0102"]);
}

#[tokio::test]
async fn test_rooms_free_filters() {
    let (app, _repo) = test_app().await;
    let response = app
        .oneshot(get("/rooms/free?block=TP&capacity=100"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rooms = body.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room_id"], "TP-0701");
}

#[tokio::test]
async fn test_room_detail() {
    let (app, repo) = test_app().await;
    repo.apply_occupancy("UB-0101", 25).await.unwrap();

    let response = app.oneshot(get("/rooms/UB-0101")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["room"]["room_id"], "UB-0101");
    assert_eq!(body["room"]["status"], "free");
    assert_eq!(body["occupancy_history"].as_array().unwrap().len(), 1);
    assert_eq!(body["occupancy_history"][0]["occupancy_level"], 25);
}

#[tokio::test]
async fn test_room_detail_not_found() {
    let (app, _repo) = test_app().await;
    let response = app.oneshot(get("/rooms/ZZ-9999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_checkin_round_trip() {
    let (app, repo) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/rooms/UB-0102/checkin",
            json!({"occupancy_level": 55}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert!(body["occupancy_id"].as_i64().unwrap() >= 1);

    let room = repo.get_room("UB-0102").await.unwrap();
    assert_eq!(room.current_level, 55);
}

#[tokio::test]
async fn test_checkin_validation_error() {
    let (app, repo) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/rooms/UB-0101/checkin",
            json!({"occupancy_level": 120}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    // Nothing was written.
    assert!(repo.recent_history("UB-0101", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_checkin_unknown_room() {
    let (app, _repo) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/rooms/ZZ-9999/checkin",
            json!({"occupancy_level": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_heatmap_means_per_block() {
    let (app, repo) = test_app().await;
    repo.apply_occupancy("UB-0101", 10).await.unwrap();
    repo.apply_occupancy("UB-0102", 30).await.unwrap();
    repo.apply_occupancy("TP-0701", 50).await.unwrap();

    let response = app.oneshot(get("/analytics/heatmap")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let cells = body.as_array().unwrap();
    assert_eq!(cells.len(), 2);

    let tp = cells.iter().find(|c| c["block"] == "TP").unwrap();
    assert_eq!(tp["avg_occupancy"], 50.0);
    assert_eq!(tp["samples"], 1);

    let ub = cells.iter().find(|c| c["block"] == "UB").unwrap();
    assert_eq!(ub["avg_occupancy"], 20.0);
    assert_eq!(ub["samples"], 2);
}

#[tokio::test]
async fn test_heatmap_rejects_non_positive_window() {
    let (app, _repo) = test_app().await;
    let response = app
        .oneshot(get("/analytics/heatmap?window_minutes=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_heatmap_rejects_out_of_range_window() {
    let (app, _repo) = test_app().await;
    let response = app
        .oneshot(get(&format!(
            "/analytics/heatmap?window_minutes={}",
            i64::MAX
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_summary() {
    let (app, repo) = test_app().await;
    repo.apply_occupancy("UB-0101", 40).await.unwrap();

    let response = app.oneshot(get("/analytics/summary")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total_rooms"], 3);
    assert_eq!(body["total_capacity"], 240);
    assert_eq!(body["kinds"]["lecture"], 3);
    assert_eq!(body["coverage"]["rooms_with_data"], 1);
    assert_eq!(body["occupancy_inserts_last_5m"], 1);
}

#[tokio::test]
async fn test_admin_load_csv() {
    let (app, _repo) = test_app().await;

    let dir = tempfile::tempdir().unwrap();
    let rooms_path = dir.path().join("rooms.csv");
    let timetable_path = dir.path().join("timetable.csv");
    std::fs::write(
        &rooms_path,
        "room_id,block,capacity,type,AC,lat,lon,amenities\n\
         NB-0101,NB,40,lecture,Yes,12.82,80.04,projector\n",
    )
    .unwrap();
    std::fs::write(
        &timetable_path,
        "room_id,day,slot,course\nNB-0101,Mon,0,CS101\n",
    )
    .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/admin/load_csv",
            json!({
                "rooms_path": rooms_path,
                "timetable_path": timetable_path,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["loaded"], true);
    assert_eq!(body["dataset"]["rooms"], 1);
    assert_eq!(body["dataset"]["timetable_entries"], 1);

    // The old dataset is gone.
    let response = app.oneshot(get("/rooms/all")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["room_id"], "NB-0101");
}

#[tokio::test]
async fn test_admin_load_csv_missing_file() {
    let (app, _repo) = test_app().await;
    let response = app
        .oneshot(post_json(
            "/admin/load_csv",
            json!({
                "rooms_path": "/nonexistent/rooms.csv",
                "timetable_path": "/nonexistent/timetable.csv",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
