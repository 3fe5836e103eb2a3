use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::api::handlers::{
    achievements::{create_achievement, get_achievement, list_achievements},
    difficulty::{get_difficulty, get_learner_difficulty},
    learners::{complete_lesson, get_heatmap, get_learner_achievements, get_progress, record_game},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/difficulty/:game_type", get(get_difficulty))
        .route("/api/learners/:learner/difficulty/:game_type", get(get_learner_difficulty))
        .route("/api/learners/:learner/games", post(record_game))
        .route("/api/learners/:learner/lessons/:lesson_id", post(complete_lesson))
        .route("/api/learners/:learner/progress", get(get_progress))
        .route("/api/learners/:learner/heatmap", get(get_heatmap))
        .route("/api/learners/:learner/achievements", get(get_learner_achievements))
        .route("/api/achievements", get(list_achievements).post(create_achievement))
        .route("/api/achievements/:id", get(get_achievement))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::achievements::seed_defaults;
    use crate::config::settings::AppConfig;
    use crate::database::{create_memory_pool, get_connection, setup::initialize_pool};
    use crate::progress::MemoryProgressStore;
    use crate::services::progress::ProgressService;

    fn app() -> Router {
        let pool = create_memory_pool().unwrap();
        initialize_pool(&pool).unwrap();
        {
            let mut conn = get_connection(&pool).unwrap();
            seed_defaults(&mut conn).unwrap();
        }
        let progress = ProgressService::new(
            pool.clone(),
            Arc::new(MemoryProgressStore::new()),
            AppConfig::default(),
        )
        .unwrap();
        create_router(Arc::new(AppState { pool, progress }))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_difficulty_for_explicit_tier() {
        let app = app();
        let (status, body) = send(&app, get_request("/api/difficulty/port?tier=6")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gameType"], "port");
        assert_eq!(body["tier"], 6);
        assert_eq!(body["config"]["time_limit"], 45);
        assert_eq!(body["config"]["port_count"], 8);
        assert_eq!(body["config"]["allow_text_input"], true);
    }

    #[tokio::test]
    async fn test_difficulty_rejects_bad_input() {
        let app = app();
        let (status, body) = send(&app, get_request("/api/difficulty/dns")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("dns"));

        let (status, _) = send(&app, get_request("/api/difficulty/port?tier=11")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recording_games_changes_learner_difficulty() {
        let app = app();
        let (_, body) = send(&app, get_request("/api/learners/alice/difficulty/acronym")).await;
        assert_eq!(body["tier"], 1);

        for _ in 0..10 {
            let (status, _) = send(
                &app,
                post_json("/api/learners/alice/games", json!({"gameType": "acronym", "score": 10})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) =
            send(&app, get_request("/api/learners/alice/difficulty/acronym")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], 4);
        assert_eq!(body["config"]["acronym_count"], 6);
    }

    #[tokio::test]
    async fn test_negative_score_is_bad_request() {
        let app = app();
        let (status, _) = send(
            &app,
            post_json("/api/learners/alice/games", json!({"gameType": "port", "score": -2})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_progress_after_first_game_and_lesson() {
        let app = app();
        let (_, outcome) = send(
            &app,
            post_json("/api/learners/bob/games", json!({"gameType": "subnetting", "score": 20})),
        )
        .await;
        let unlocked: Vec<&str> = outcome["unlocked"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(unlocked, vec!["Warm Up"]);
        assert_eq!(outcome["xpGained"], 30);

        let lesson_path = "/api/learners/bob/lessons/osi-model";
        let (status, lesson) = send(&app, post_json(lesson_path, json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(lesson["newlyCompleted"], true);

        let (status, _) = send(&app, post_json(lesson_path, json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, progress) = send(&app, get_request("/api/learners/bob/progress")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["lessonsCompleted"], 1);
        assert_eq!(progress["totalGames"], 1);
        assert_eq!(progress["gamesPlayed"]["subnetting"], 1);
        assert_eq!(progress["streak"]["current"], 1);
        assert_eq!(progress["tiers"]["subnetting"], 6);

        let (_, achievements) = send(&app, get_request("/api/learners/bob/achievements")).await;
        assert_eq!(achievements.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_heatmap_default_window() {
        let app = app();
        let (status, body) = send(&app, get_request("/api/learners/carol/heatmap")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"], 84);

        let (_, body) = send(&app, get_request("/api/learners/carol/heatmap?days=7")).await;
        assert_eq!(body["cells"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_achievement_catalogue_endpoints() {
        let app = app();
        let (status, list) = send(&app, get_request("/api/achievements")).await;
        assert_eq!(status, StatusCode::OK);
        let seeded = list.as_array().unwrap().len();
        assert!(seeded > 0);

        let definition = json!({
            "name": "Layer Cake",
            "description": "Reach tier 5 in the protocol game",
            "criteria": {"type": "skillTier", "gameType": "protocol", "tier": 5},
            "xp": 60,
            "category": "mastery"
        });
        let (status, created) =
            send(&app, post_json("/api/achievements", definition.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(&app, get_request(&format!("/api/achievements/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["criteria"]["gameType"], "protocol");

        let (status, _) = send(&app, post_json("/api/achievements", definition)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get_request("/api/achievements/9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
