// system-tests/tests/helpers/pet_stub.rs
// ============================================================================
// Module: PetFriends Stub
// Description: In-process PetFriends service for offline system-tests.
// Purpose: Reproduce the status codes and payloads the suites assert on.
// Dependencies: axum, base64, serde_json, tokio
// ============================================================================

//! ## Overview
//! A loopback axum server with one registered account and an in-memory pet
//! store. It answers 403 `Forbidden` pages for unknown credentials or keys,
//! 500 for filters other than `""` and `my_pets`, 404 `Not Found` for
//! unmatched paths such as `DELETE api/pets/`, and 400 for malformed bodies.
//! The store starts with one pet of the account and one of another user.

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::thread;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::Form;
use axum::Json;
use axum::Router;
use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Email of the registered stub account.
pub const STUB_EMAIL: &str = "owner@petfriends.test";
/// Password of the registered stub account.
pub const STUB_PASSWORD: &str = "correct horse battery staple";
/// Key issued to the registered stub account.
pub const STUB_KEY: &str = "ea738148a1f19838e1c5d1413877f3691a3731380e733e877b0ae729";

const OWNER_ID: &str = "stub-owner";
const OTHER_USER_ID: &str = "stub-neighbour";
const FILTER_MY_PETS: &str = "my_pets";

// ============================================================================
// SECTION: Store
// ============================================================================

struct StubStore {
    pets: Vec<Value>,
    next_id: u64,
}

type SharedStore = Arc<Mutex<StubStore>>;

impl StubStore {
    fn seeded() -> Self {
        let mut store = Self {
            pets: Vec::new(),
            next_id: 0,
        };
        store.insert(OTHER_USER_ID, "Барсик", "сиамский", "4", String::new());
        store.insert(OWNER_ID, "Матюся", "Британец", "9", String::new());
        store
    }

    fn insert(
        &mut self,
        user_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
        pet_photo: String,
    ) -> Value {
        self.next_id += 1;
        let created_at =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs_f64();
        let pet = json!({
            "id": format!("stub-pet-{:04}", self.next_id),
            "name": name,
            "animal_type": animal_type,
            "age": age,
            "pet_photo": pet_photo,
            "user_id": user_id,
            "created_at": created_at,
        });
        self.pets.insert(0, pet.clone());
        pet
    }

    fn owned_mut(&mut self, id: &str) -> Option<&mut Value> {
        self.pets.iter_mut().find(|pet| pet["id"] == id && pet["user_id"] == OWNER_ID)
    }
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the stub PetFriends server; shuts it down on drop.
pub struct PetStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl PetStubHandle {
    /// Returns the service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for PetStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns a stub service on a loopback port.
pub fn spawn_pet_stub() -> Result<PetStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("pet stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("pet stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("pet stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}/");

    let store: SharedStore = Arc::new(Mutex::new(StubStore::seeded()));
    let app = Router::new()
        .route("/api/key", get(handle_key))
        .route("/api/pets", get(handle_list).post(handle_add))
        .route("/api/create_pet_simple", post(handle_add_simple))
        .route("/api/pets/{id}", put(handle_update).delete(handle_delete))
        .route("/api/pets/set_photo/{id}", post(handle_set_photo))
        .fallback(handle_not_found)
        .with_state(store);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(PetStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

// ============================================================================
// SECTION: Responses
// ============================================================================

fn page(status: StatusCode, title: &str) -> Response {
    let body = format!(
        "<!doctype html>\n<html lang=en>\n<title>{} {title}</title>\n<h1>{title}</h1>\n",
        status.as_u16()
    );
    (status, Html(body)).into_response()
}

fn forbidden() -> Response {
    page(StatusCode::FORBIDDEN, "Forbidden")
}

fn bad_request() -> Response {
    page(StatusCode::BAD_REQUEST, "Bad Request")
}

fn server_error() -> Response {
    page(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    if header(headers, "auth_key") == Some(STUB_KEY) { Ok(()) } else { Err(forbidden()) }
}

fn lock(store: &SharedStore) -> Result<MutexGuard<'_, StubStore>, Response> {
    store.lock().map_err(|_| server_error())
}

fn field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str, Response> {
    fields.get(name).map(String::as_str).ok_or_else(bad_request)
}

/// Reads text fields and the optional `pet_photo` file as a data URI.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Option<String>), Response> {
    let mut fields = HashMap::new();
    let mut photo = None;
    while let Some(part) = multipart.next_field().await.map_err(|_| bad_request())? {
        let name = part.name().unwrap_or_default().to_string();
        if name == "pet_photo" {
            let mime = part.content_type().unwrap_or("image/jpeg").to_string();
            let bytes = part.bytes().await.map_err(|_| bad_request())?;
            photo = Some(format!("data:{mime};base64,{}", STANDARD.encode(&bytes)));
        } else {
            let text = part.text().await.map_err(|_| bad_request())?;
            fields.insert(name, text);
        }
    }
    Ok((fields, photo))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

async fn handle_key(headers: HeaderMap) -> Result<Json<Value>, Response> {
    let email = header(&headers, "email");
    let password = header(&headers, "password");
    if email == Some(STUB_EMAIL) && password == Some(STUB_PASSWORD) {
        Ok(Json(json!({"key": STUB_KEY})))
    } else {
        Err(forbidden())
    }
}

async fn handle_list(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Response> {
    authorize(&headers)?;
    let filter = query.get("filter").map_or("", String::as_str);
    let store = lock(&store)?;
    let pets: Vec<&Value> = match filter {
        "" => store.pets.iter().collect(),
        FILTER_MY_PETS => store.pets.iter().filter(|pet| pet["user_id"] == OWNER_ID).collect(),
        _ => return Err(server_error()),
    };
    Ok(Json(json!({"pets": pets})))
}

async fn handle_add(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, Response> {
    authorize(&headers)?;
    let (fields, photo) = read_multipart(multipart).await?;
    let pet = lock(&store)?.insert(
        OWNER_ID,
        field(&fields, "name")?,
        field(&fields, "animal_type")?,
        field(&fields, "age")?,
        photo.unwrap_or_default(),
    );
    Ok(Json(pet))
}

async fn handle_add_simple(
    State(store): State<SharedStore>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<Value>, Response> {
    authorize(&headers)?;
    let pet = lock(&store)?.insert(
        OWNER_ID,
        field(&fields, "name")?,
        field(&fields, "animal_type")?,
        field(&fields, "age")?,
        String::new(),
    );
    Ok(Json(pet))
}

async fn handle_update(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<Value>, Response> {
    authorize(&headers)?;
    let name = field(&fields, "name")?;
    let animal_type = field(&fields, "animal_type")?;
    let age = field(&fields, "age")?;
    let mut store = lock(&store)?;
    let pet = store.owned_mut(&id).ok_or_else(bad_request)?;
    pet["name"] = json!(name);
    pet["animal_type"] = json!(animal_type);
    pet["age"] = json!(age);
    Ok(Json(pet.clone()))
}

async fn handle_delete(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, Response> {
    authorize(&headers)?;
    lock(&store)?.pets.retain(|pet| pet["id"] != id.as_str() || pet["user_id"] != OWNER_ID);
    Ok(StatusCode::OK)
}

async fn handle_set_photo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, Response> {
    authorize(&headers)?;
    let (_, photo) = read_multipart(multipart).await?;
    let photo = photo.ok_or_else(bad_request)?;
    let mut store = lock(&store)?;
    let pet = store.owned_mut(&id).ok_or_else(bad_request)?;
    pet["pet_photo"] = json!(photo);
    Ok(Json(pet.clone()))
}

async fn handle_not_found() -> Response {
    page(StatusCode::NOT_FOUND, "Not Found")
}
