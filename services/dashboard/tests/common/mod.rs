//! An in-process stand-in for the practice API, served on an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use dashboard_lib::{adapters::HttpGateway, config::Config, state::AppState};
use practice_core::domain::{AuthSession, Therapist};
use practice_core::store::{AuthStore, Shared};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GOOD_TOKEN: &str = "tok-123";
pub const EXPIRED_TOKEN: &str = "expired";

#[derive(Clone, Default)]
pub struct MockApi {
    /// The `Authorization` header of every request, in arrival order.
    pub seen_auth: Arc<Mutex<Vec<Option<String>>>>,
    pub requests: Arc<AtomicUsize>,
    pub in_flight: Arc<AtomicUsize>,
    /// The most client-detail requests ever being served at once.
    pub peak_in_flight: Arc<AtomicUsize>,
}

impl MockApi {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.seen_auth.lock().unwrap().last().cloned().flatten()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) -> InFlight {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlight(self.in_flight.clone())
    }
}

/// Counts a handler as in flight until dropped.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Every client-detail handler holds the request open this long.
const DETAIL_DELAY: Duration = Duration::from_millis(50);

type HandlerResult = Result<Json<Value>, Response>;

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Records the request and rejects the expired token with 401.
fn admit(api: &MockApi, headers: &HeaderMap) -> Result<(), Response> {
    api.requests.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let expired = auth.as_deref() == Some(format!("Bearer {}", EXPIRED_TOKEN).as_str());
    api.seen_auth.lock().unwrap().push(auth);
    if expired {
        return Err(reject(StatusCode::UNAUTHORIZED, "Token expired"));
    }
    Ok(())
}

pub fn therapist_json() -> Value {
    json!({ "id": 7, "name": "Dr. Grey", "email": "grey@example.com", "specialization": "CBT" })
}

pub fn client_json(id: i64) -> Value {
    match id {
        1 => json!({ "id": 1, "name": "Ann Lee", "email": "ann@example.com", "phone": "555-0101" }),
        _ => json!({ "id": id, "name": "Bo Park", "email": "bo@example.com", "ai_insights": "Responds well to CBT" }),
    }
}

pub fn session_json(id: i64, date: &str, status: &str) -> Value {
    json!({
        "id": id,
        "client_id": 1,
        "therapist_id": 7,
        "session_date": date,
        "duration": 50,
        "status": status,
        "notes": "Initial intake",
        "client": { "id": 1, "name": "Ann Lee", "email": "ann@example.com" },
        "therapist": therapist_json(),
    })
}

pub fn material_json(id: i64, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{} exercise", title),
        "category": category,
        "difficulty_level": "beginner",
    })
}

async fn login(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    if body["password"] != "pw" {
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    Ok(Json(json!({ "user": therapist_json(), "token": GOOD_TOKEN })))
}

async fn register(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!({ "id": 8, "name": body["name"], "email": body["email"] })))
}

async fn list_clients(State(api): State<MockApi>, headers: HeaderMap) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!([client_json(1), client_json(2)])))
}

async fn get_client(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    admit(&api, &headers)?;
    let _guard = api.enter();
    tokio::time::sleep(DETAIL_DELAY).await;
    if id > 2 {
        return Err(reject(StatusCode::NOT_FOUND, "Client not found"));
    }
    Ok(Json(client_json(id)))
}

async fn create_client(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    if body["email"] == "taken@example.com" {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "Email already registered"));
    }
    Ok(Json(json!({ "id": 10, "name": body["name"], "email": body["email"], "phone": body["phone"] })))
}

async fn update_client(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!({ "id": id, "name": body["name"], "email": body["email"], "phone": body["phone"] })))
}

async fn delete_any(State(api): State<MockApi>, headers: HeaderMap, Path(_id): Path<i64>) -> Response {
    if let Err(rejection) = admit(&api, &headers) {
        return rejection;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_sessions(State(api): State<MockApi>, headers: HeaderMap) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!([
        session_json(1, "2024-03-04T10:00:00", "completed"),
        session_json(2, "2024-03-11T10:00:00", "scheduled"),
        session_json(3, "2024-04-01T10:00:00", "cancelled"),
    ])))
}

async fn get_session(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    admit(&api, &headers)?;
    let mut session = session_json(id, "2024-03-04T10:00:00", "scheduled");
    if id == 99 {
        session["duration"] = json!(500);
    }
    Ok(Json(session))
}

async fn create_session(State(api): State<MockApi>, headers: HeaderMap, Json(mut body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    body["id"] = json!(20);
    Ok(Json(body))
}

async fn update_session(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> HandlerResult {
    admit(&api, &headers)?;
    body["id"] = json!(id);
    Ok(Json(body))
}

async fn sessions_for_client(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    admit(&api, &headers)?;
    let _guard = api.enter();
    tokio::time::sleep(DETAIL_DELAY).await;
    let mut session = session_json(5, "2024-05-02T09:30:00", "scheduled");
    session["client_id"] = json!(id);
    Ok(Json(json!([session])))
}

async fn list_materials(State(api): State<MockApi>, headers: HeaderMap) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!([
        material_json(1, "Box breathing", "anxiety"),
        material_json(2, "Sleep diary", "sleep"),
    ])))
}

async fn get_material(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(material_json(id, "Box breathing", "anxiety")))
}

async fn create_material(State(api): State<MockApi>, headers: HeaderMap, Json(mut body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    body["id"] = json!(30);
    Ok(Json(body))
}

async fn update_material(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(mut body): Json<Value>,
) -> HandlerResult {
    admit(&api, &headers)?;
    body["id"] = json!(id);
    Ok(Json(body))
}

async fn assign_material(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> HandlerResult {
    admit(&api, &headers)?;
    Ok(Json(json!({
        "id": 40,
        "material_id": body["material_id"],
        "client_id": body["client_id"],
        "assigned_at": "2024-05-01T12:00:00Z",
        "ai_feedback": body["ai_feedback"],
    })))
}

async fn materials_for_client(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    admit(&api, &headers)?;
    let _guard = api.enter();
    tokio::time::sleep(DETAIL_DELAY).await;
    Ok(Json(json!([
        {
            "material_id": 1,
            "client_id": id,
            "assigned_at": "2024-04-01T09:00:00",
            "completed_at": "2024-04-08T09:00:00",
            "material": material_json(1, "Box breathing", "anxiety"),
        },
        {
            "material_id": 2,
            "client_id": id,
            "assigned_at": "2024-04-15T09:00:00",
            "material": material_json(2, "Sleep diary", "sleep"),
        },
    ])))
}

async fn broken(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(rejection) = admit(&api, &headers) {
        return rejection;
    }
    (StatusCode::OK, "{not json").into_response()
}

async fn server_error(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if let Err(rejection) = admit(&api, &headers) {
        return rejection;
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

fn router(api: MockApi) -> Router {
    Router::new()
        .route("/api/v1/therapists/login", post(login))
        .route("/api/v1/therapists/register", post(register))
        .route("/api/v1/clients/", get(list_clients))
        .route("/api/v1/clients", post(create_client))
        .route("/api/v1/clients/{id}", get(get_client).put(update_client).delete(delete_any))
        .route("/api/v1/sessions/", get(list_sessions))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/{id}", get(get_session).put(update_session).delete(delete_any))
        .route("/api/v1/sessions/client/{id}", get(sessions_for_client))
        .route("/api/v1/materials/", get(list_materials))
        .route("/api/v1/materials", post(create_material))
        .route("/api/v1/materials/assign", post(assign_material))
        .route("/api/v1/materials/{id}", put(update_material).get(get_material).delete(delete_any))
        .route("/api/v1/materials/client/{id}", get(materials_for_client))
        .route("/api/v1/broken", get(broken))
        .route("/api/v1/server-error", get(server_error))
        .with_state(api)
}

/// Starts the mock and returns its base URL.
pub async fn spawn_mock() -> (String, MockApi) {
    let api = MockApi::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(api.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api/v1", addr), api)
}

pub fn config_for(base_url: &str) -> Config {
    let base_url = base_url.to_string();
    Config::from_lookup(move |key| (key == "API_URL").then(|| base_url.clone())).unwrap()
}

pub fn gateway_for(base_url: &str) -> (HttpGateway, Shared<AuthStore>) {
    let auth = Shared::new(AuthStore::new());
    let gateway = HttpGateway::new(&config_for(base_url), auth.clone()).unwrap();
    (gateway, auth)
}

pub fn state_for(base_url: &str) -> AppState {
    AppState::connect(Arc::new(config_for(base_url))).unwrap()
}

/// Puts `token` into the auth store as if a login had returned it.
pub fn authenticate(auth: &Shared<AuthStore>, token: &str) {
    let session = AuthSession {
        user: Therapist {
            id: 7,
            name: "Dr. Grey".into(),
            email: "grey@example.com".into(),
            specialization: None,
        },
        token: token.to_string(),
    };
    auth.write(|store| store.login(session));
}
