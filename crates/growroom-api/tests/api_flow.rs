use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use growroom_api::accounts::TokenKeys;
use growroom_api::{AppStateInner, router};
use growroom_db::Database;

fn app() -> Router {
    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        tokens: TokenKeys::new("test-secret", chrono::Duration::minutes(30)),
    });
    router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers and logs in, returning (user id, token).
async fn signup(app: &Router, name: &str) -> (i64, String) {
    let email = format!("{name}@x.com");
    let (status, body) = send(
        app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": name, "email": email, "password": "pw", "location": "NY" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let user_id = body["user"]["id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user_id"], user_id);

    (user_id, body["token"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn greenhouse_flow() {
    let app = app();
    let (alice, token) = signup(&app, "alice").await;

    let rooms_uri = format!("/user/{alice}/rooms");
    let (status, room) = send(
        &app,
        "POST",
        &rooms_uri,
        Some(&token),
        Some(json!({ "name_room": "Greenhouse", "id_user": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(room["name_room"], "Greenhouse");
    let room_id = room["id"].as_i64().unwrap();

    let plants_uri = format!("/user/{alice}/rooms/{room_id}/plants");
    let (status, plant) = send(
        &app,
        "POST",
        &plants_uri,
        Some(&token),
        Some(json!({
            "id_room": room_id,
            "name_plant": "Basil",
            "type_plant": 1,
            "grow_phase": 1,
            "sensor_number": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{plant}");
    assert_eq!(plant["name_plant"], "Basil");
    let plant_id = plant["id"].as_i64().unwrap();

    let (status, plants) = send(&app, "GET", &plants_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plants.as_array().unwrap().len(), 1);
    assert_eq!(plants[0]["name_plant"], "Basil");

    let (status, single) = send(
        &app,
        "GET",
        &format!("{plants_uri}/{plant_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["sensor_number"], 2);

    let (status, rooms) = send(&app, "GET", &rooms_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app();
    let (alice, _) = signup(&app, "alice").await;

    let uri = format!("/user/{alice}/rooms");
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status_code"], 401);

    let (status, _) = send(&app, "GET", &uri, Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn callers_cannot_touch_other_users_rooms() {
    let app = app();
    let (alice, alice_token) = signup(&app, "alice").await;
    let (_, bob_token) = signup(&app, "bob").await;

    let (_, room) = send(
        &app,
        "POST",
        &format!("/user/{alice}/rooms"),
        Some(&alice_token),
        Some(json!({ "name_room": "Tent", "id_user": alice })),
    )
    .await;
    let room_id = room["id"].as_i64().unwrap();

    let room_uri = format!("/user/{alice}/rooms/{room_id}");
    let (status, _) = send(
        &app,
        "PATCH",
        &room_uri,
        Some(&bob_token),
        Some(json!({ "name_room": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &room_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, rooms) = send(
        &app,
        "GET",
        &format!("/user/{alice}/rooms"),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms[0]["name_room"], "Tent");
}

#[tokio::test]
async fn callers_cannot_touch_other_users_plants() {
    let app = app();
    let (alice, alice_token) = signup(&app, "alice").await;
    let (_, bob_token) = signup(&app, "bob").await;

    let (_, room) = send(
        &app,
        "POST",
        &format!("/user/{alice}/rooms"),
        Some(&alice_token),
        Some(json!({ "name_room": "Tent", "id_user": alice })),
    )
    .await;
    let room_id = room["id"].as_i64().unwrap();

    let plants_uri = format!("/user/{alice}/rooms/{room_id}/plants");
    let basil = json!({
        "id_room": room_id,
        "name_plant": "Basil",
        "type_plant": 1,
        "grow_phase": 1
    });
    let (status, plant) = send(
        &app,
        "POST",
        &plants_uri,
        Some(&alice_token),
        Some(basil.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let plant_uri = format!("{plants_uri}/{}", plant["id"]);

    let (status, _) = send(&app, "POST", &plants_uri, Some(&bob_token), Some(basil)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &plants_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &plant_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &plant_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, plants) = send(&app, "GET", &plants_uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plants.as_array().unwrap().len(), 1);
    assert_eq!(plants[0]["name_plant"], "Basil");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    signup(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({
            "username": "alice2",
            "email": "alice@x.com",
            "password": "pw",
            "location": "LA"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status_code"], 409);
}

#[tokio::test]
async fn bad_login_is_unauthorized() {
    let app = app();
    signup(&app, "alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({ "email": "alice@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = json!({ "email": "alice@x.com" });
    let (status, _) = send(&app, "POST", "/login", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_body_and_fields_are_bad_requests() {
    let app = app();
    let (alice, token) = signup(&app, "alice").await;
    let uri = format!("/user/{alice}/rooms");

    let (status, body) = send(&app, "POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("json object"));

    let no_name = json!({ "id_user": alice });
    let (status, body) = send(&app, "POST", &uri, Some(&token), Some(no_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You need to specify the name room");
}

#[tokio::test]
async fn reference_tables_are_public() {
    let app = app();

    let (status, grows) = send(&app, "GET", "/grows", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(grows[0]["name"], "Germination");

    let (status, types) = send(&app, "GET", "/types", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(types.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn users_lists_everyone_without_passwords() {
    let app = app();
    let (_, token) = signup(&app, "alice").await;
    signup(&app, "bob").await;
    signup(&app, "carol").await;

    let (status, body) = send(&app, "GET", "/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[tokio::test]
async fn me_returns_the_token_owner() {
    let app = app();
    let (alice, token) = signup(&app, "alice").await;

    let (status, body) = send(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], alice);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn deleting_a_planted_room_is_refused() {
    let app = app();
    let (alice, token) = signup(&app, "alice").await;

    let (_, room) = send(
        &app,
        "POST",
        &format!("/user/{alice}/rooms"),
        Some(&token),
        Some(json!({ "name_room": "Tent", "id_user": alice })),
    )
    .await;
    let room_id = room["id"].as_i64().unwrap();
    let room_uri = format!("/user/{alice}/rooms/{room_id}");

    let (_, plant) = send(
        &app,
        "POST",
        &format!("{room_uri}/plants"),
        Some(&token),
        Some(json!({ "id_room": room_id, "name_plant": "Mint", "type_plant": 1, "grow_phase": 2 })),
    )
    .await;
    let plant_id = plant["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &room_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("{room_uri}/plants/{plant_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, deleted) = send(&app, "DELETE", &room_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], room_id);
}
