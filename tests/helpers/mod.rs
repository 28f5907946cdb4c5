//! In-process stub of the build server REST API.
//!
//! Implements just enough of the remote contract for conformance scenarios:
//! token and basic authentication, user/project/build-type storage with the
//! server's id validation rules and error messages, and creator-or-role
//! authorization for build type creation. Each test spawns its own instance
//! on an ephemeral port, so parallel test binaries never interfere.

use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tokio::runtime::Builder;
use tokio::sync::oneshot;

use forgecheck::config::ServerConfig;

/// Fixed elevated credential accepted by the stub.
pub const SUPERUSER_TOKEN: &str = "stub-super-token";

const MAX_ID_LENGTH: usize = 225;

#[derive(Default)]
struct Stored {
    users: Vec<StoredUser>,
    projects: Vec<StoredProject>,
    build_types: Vec<StoredBuildType>,
    next_user_id: u64,
    next_step_id: u64,
}

struct StoredUser {
    id: String,
    username: String,
    password: String,
    /// (role id, scope) pairs granted at creation time.
    roles: Vec<(String, String)>,
}

struct StoredProject {
    id: String,
    name: String,
    /// Username of the creator, who administers the project implicitly.
    /// Empty for projects created by the superuser.
    creator: String,
}

struct StoredBuildType {
    id: String,
    name: String,
    project_id: String,
}

type SharedState = Arc<Mutex<Stored>>;

/// Handle for a running stub server. Dropping it shuts the server down.
pub struct StubServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    /// Bind an ephemeral port and serve the stub on a background thread.
    pub fn spawn() -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").expect("stub bind failed");
        listener
            .set_nonblocking(true)
            .expect("stub listener nonblocking failed");
        let addr = listener.local_addr().expect("stub local addr failed");
        let base_url = format!("http://{addr}");

        let state: SharedState = Arc::new(Mutex::new(Stored {
            next_user_id: 1,
            next_step_id: 1,
            ..Stored::default()
        }));
        let app = Router::new()
            .route("/app/rest/users", post(create_user))
            .route("/app/rest/users/{locator}", get(read_user))
            .route("/app/rest/projects", post(create_project))
            .route("/app/rest/projects/{id}", get(read_project))
            .route("/app/rest/buildTypes", post(create_build_type))
            .route("/app/rest/buildTypes/{id}", get(read_build_type))
            .route("/app/rest/buildTypes/{id}/steps", post(create_step))
            .with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = thread::spawn(move || {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime failed");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("stub listener conversion failed");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("stub serve failed");
            });
        });

        Self {
            base_url,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// Server configuration pointing at this stub.
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            base_url: self.base_url.clone(),
            superuser_token: SUPERUSER_TOKEN.to_string(),
            timeout_secs: 5,
        }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

// -- Authentication --

enum Caller {
    Superuser,
    User(String),
    Anonymous,
    BadCredentials,
}

fn resolve_caller(stored: &Stored, headers: &HeaderMap) -> Caller {
    let Some(value) = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
    else {
        return Caller::Anonymous;
    };
    if let Some(token) = value.strip_prefix("Bearer ") {
        return if token == SUPERUSER_TOKEN {
            Caller::Superuser
        } else {
            Caller::BadCredentials
        };
    }
    if let Some(encoded) = value.strip_prefix("Basic ") {
        let Ok(decoded) = STANDARD.decode(encoded) else {
            return Caller::BadCredentials;
        };
        let Ok(text) = String::from_utf8(decoded) else {
            return Caller::BadCredentials;
        };
        let Some((username, password)) = text.split_once(':') else {
            return Caller::BadCredentials;
        };
        if stored
            .users
            .iter()
            .any(|u| u.username == username && u.password == password)
        {
            return Caller::User(username.to_string());
        }
        return Caller::BadCredentials;
    }
    Caller::BadCredentials
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
}

/// Whether the caller may administer the given project: the superuser, the
/// project's creator, or a user holding a matching role grant.
fn can_administer(stored: &Stored, caller: &Caller, project_id: &str) -> bool {
    match caller {
        Caller::Superuser => true,
        Caller::User(username) => {
            if stored
                .projects
                .iter()
                .any(|p| p.id == project_id && p.creator == *username)
            {
                return true;
            }
            let project_scope = format!("p:{project_id}");
            stored
                .users
                .iter()
                .find(|u| u.username == *username)
                .is_some_and(|u| {
                    u.roles.iter().any(|(role, scope)| {
                        (role == "SYSTEM_ADMIN" && scope == "g")
                            || (role == "PROJECT_ADMIN"
                                && (scope == "g" || *scope == project_scope))
                    })
                })
        }
        Caller::Anonymous | Caller::BadCredentials => false,
    }
}

fn valid_external_id(id: &str) -> bool {
    if id.len() > MAX_ID_LENGTH {
        return false;
    }
    let starts_with_letter = id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// -- Handlers --

async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stored = state.lock().expect("stub state lock");
    match resolve_caller(&stored, &headers) {
        Caller::Superuser => {}
        Caller::User(_) => {
            return (StatusCode::FORBIDDEN, "Access denied").into_response();
        }
        Caller::Anonymous | Caller::BadCredentials => return unauthorized(),
    }

    let username = body["username"].as_str().unwrap_or_default().to_string();
    if username.is_empty() {
        return (StatusCode::BAD_REQUEST, "Username must not be empty").into_response();
    }
    if stored.users.iter().any(|u| u.username == username) {
        return (
            StatusCode::BAD_REQUEST,
            format!("User with username \"{username}\" already exists"),
        )
            .into_response();
    }

    let roles = body["roles"]["role"]
        .as_array()
        .map(|grants| {
            grants
                .iter()
                .filter_map(|grant| {
                    Some((
                        grant["roleId"].as_str()?.to_string(),
                        grant["scope"].as_str()?.to_string(),
                    ))
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let id = stored.next_user_id.to_string();
    stored.next_user_id += 1;
    stored.users.push(StoredUser {
        id: id.clone(),
        username: username.clone(),
        password: body["password"].as_str().unwrap_or_default().to_string(),
        roles,
    });

    let mut confirmed = json!({"id": id, "username": username});
    if let Some(roles_value) = body.get("roles") {
        confirmed["roles"] = roles_value.clone();
    }
    (StatusCode::OK, Json(confirmed)).into_response()
}

async fn read_user(
    State(state): State<SharedState>,
    Path(locator): Path<String>,
    headers: HeaderMap,
) -> Response {
    let stored = state.lock().expect("stub state lock");
    let caller = resolve_caller(&stored, &headers);
    if matches!(caller, Caller::Anonymous | Caller::BadCredentials) {
        return unauthorized();
    }
    let username_filter = locator.strip_prefix("username:");
    let found = stored.users.iter().find(|u| match username_filter {
        Some(username) => u.username == username,
        None => u.id == locator,
    });
    let Some(user) = found else {
        return (
            StatusCode::NOT_FOUND,
            format!("No user found by locator \"{locator}\""),
        )
            .into_response();
    };
    let allowed = match &caller {
        Caller::Superuser => true,
        Caller::User(username) => *username == user.username,
        Caller::Anonymous | Caller::BadCredentials => false,
    };
    if !allowed {
        return (StatusCode::FORBIDDEN, "Access denied").into_response();
    }
    (
        StatusCode::OK,
        Json(json!({"id": user.id, "username": user.username})),
    )
        .into_response()
}

async fn create_project(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stored = state.lock().expect("stub state lock");
    let creator = match resolve_caller(&stored, &headers) {
        Caller::Superuser => String::new(),
        Caller::User(username) => username,
        Caller::Anonymous | Caller::BadCredentials => return unauthorized(),
    };

    let id = body["id"].as_str().unwrap_or_default().to_string();
    let name = body["name"].as_str().unwrap_or_default().to_string();

    if id.is_empty() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Project ID must not be empty",
        )
            .into_response();
    }
    if !valid_external_id(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Project ID \"{id}\" is invalid"),
        )
            .into_response();
    }
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Project name cannot be empty").into_response();
    }
    if stored.projects.iter().any(|p| p.id == id) {
        return (
            StatusCode::BAD_REQUEST,
            format!("Project ID \"{id}\" is already used by another project"),
        )
            .into_response();
    }

    stored.projects.push(StoredProject {
        id: id.clone(),
        name: name.clone(),
        creator,
    });
    (StatusCode::OK, Json(json!({"id": id, "name": name}))).into_response()
}

async fn read_project(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let stored = state.lock().expect("stub state lock");
    match resolve_caller(&stored, &headers) {
        Caller::Anonymous | Caller::BadCredentials => return unauthorized(),
        Caller::Superuser | Caller::User(_) => {}
    }
    match stored.projects.iter().find(|p| p.id == id) {
        Some(project) => (
            StatusCode::OK,
            Json(json!({"id": project.id, "name": project.name})),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("No project found by locator \"{id}\""),
        )
            .into_response(),
    }
}

async fn create_build_type(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stored = state.lock().expect("stub state lock");
    let caller = resolve_caller(&stored, &headers);
    if matches!(caller, Caller::Anonymous | Caller::BadCredentials) {
        return unauthorized();
    }

    let id = body["id"].as_str().unwrap_or_default().to_string();
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let project_id = body["project"]["id"].as_str().unwrap_or_default().to_string();

    if project_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Build type project is not specified",
        )
            .into_response();
    }
    if !stored.projects.iter().any(|p| p.id == project_id) {
        return (
            StatusCode::NOT_FOUND,
            format!("No project found by locator \"{project_id}\""),
        )
            .into_response();
    }
    if !can_administer(&stored, &caller, &project_id) {
        return (
            StatusCode::FORBIDDEN,
            format!("You do not have enough permissions to edit project with id: {project_id}"),
        )
            .into_response();
    }
    if id.is_empty() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Build configuration ID must not be empty",
        )
            .into_response();
    }
    if !valid_external_id(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Build configuration ID \"{id}\" is invalid"),
        )
            .into_response();
    }
    if stored.build_types.iter().any(|bt| bt.id == id) {
        return (
            StatusCode::BAD_REQUEST,
            format!(
                "The build configuration / template ID \"{id}\" is already used by another configuration or template"
            ),
        )
            .into_response();
    }

    stored.build_types.push(StoredBuildType {
        id: id.clone(),
        name: name.clone(),
        project_id: project_id.clone(),
    });
    (
        StatusCode::OK,
        Json(json!({"id": id, "name": name, "project": {"id": project_id}})),
    )
        .into_response()
}

async fn read_build_type(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let stored = state.lock().expect("stub state lock");
    match resolve_caller(&stored, &headers) {
        Caller::Anonymous | Caller::BadCredentials => return unauthorized(),
        Caller::Superuser | Caller::User(_) => {}
    }
    match stored.build_types.iter().find(|bt| bt.id == id) {
        Some(bt) => (
            StatusCode::OK,
            Json(json!({"id": bt.id, "name": bt.name, "project": {"id": bt.project_id}})),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("No build type found by locator \"{id}\""),
        )
            .into_response(),
    }
}

async fn create_step(
    State(state): State<SharedState>,
    Path(build_type_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut stored = state.lock().expect("stub state lock");
    let caller = resolve_caller(&stored, &headers);
    if matches!(caller, Caller::Anonymous | Caller::BadCredentials) {
        return unauthorized();
    }

    let Some(project_id) = stored
        .build_types
        .iter()
        .find(|bt| bt.id == build_type_id)
        .map(|bt| bt.project_id.clone())
    else {
        return (
            StatusCode::NOT_FOUND,
            format!("No build type found by locator \"{build_type_id}\""),
        )
            .into_response();
    };
    if !can_administer(&stored, &caller, &project_id) {
        return (
            StatusCode::FORBIDDEN,
            format!("You do not have enough permissions to edit project with id: {project_id}"),
        )
            .into_response();
    }

    let id = format!("RUNNER_{}", stored.next_step_id);
    stored.next_step_id += 1;
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let step_type = body["type"].as_str().unwrap_or("simpleRunner").to_string();
    (
        StatusCode::OK,
        Json(json!({"id": id, "name": name, "type": step_type})),
    )
        .into_response()
}
