//! 集成测试公共部分：内存版 REST 后端 + 临时端口上的控制台

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

use tensports_admin::{
    build_router,
    infrastructure::{
        config::BackendConfig, http_client::BackendClient, session_store::SessionStore,
    },
    AppState,
};

pub const TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub uri: String,
    pub authorization: Option<String>,
}

/// 内存版后端，记录每个请求
#[derive(Default)]
pub struct MockBackend {
    requests: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
    products: Mutex<Vec<Value>>,
    participants: Mutex<Vec<Value>>,
    next_id: AtomicUsize,
    fail_lists: AtomicBool,
    bare_stock_response: AtomicBool,
    write_delay_ms: AtomicU64,
}

impl MockBackend {
    fn seeded() -> Self {
        let mock = Self::default();
        *mock.products.lock().unwrap() = vec![
            json!({
                "_id": "p1",
                "productName": "Trail Runner",
                "category": "Shoes",
                "price": 89.5,
                "productNo": 1001,
                "inStock": 5,
                "stockQuantity": 2,
                "sizes": "M,L",
                "colors": ["Red"],
                "description": "Lightweight trail shoe",
                "image": ""
            }),
            json!({
                "_id": "p2",
                "productName": "Race Tee",
                "category": "Clothing",
                "price": 20,
                "productNo": 2001,
                "inStock": 0,
                "stockQuantity": 0,
                "sizes": ["S"],
                "colors": [],
                "description": "",
                "image": ""
            }),
        ];
        *mock.participants.lock().unwrap() = vec![
            json!({
                "_id": "r1",
                "fullName": "Arjun Rao",
                "gender": 0,
                "bloodGroup": "B+",
                "licenseNumber": "LIC-1",
                "dateOfBirth": "1990-05-01T00:00:00.000Z",
                "instagramID": "",
                "address": "1 Hill St",
                "email": "arjun@tsr.test",
                "phoneNumber": "9000000001"
            }),
            json!({
                "_id": "r2",
                "fullName": "Lena Paul",
                "gender": "female",
                "bloodGroup": "A-",
                "licenseNumber": "LIC-2",
                "dateOfBirth": "1988-11-20T00:00:00.000Z",
                "instagramID": "@lena",
                "address": "7 Bay Rd",
                "email": "lena@tsr.test",
                "phoneNumber": "9000000002"
            }),
        ];
        mock
    }

    /// 列表接口（商品与参赛者）返回 500
    pub fn fail_list_fetches(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// 库存接口只返回消息，不带库存数值
    pub fn omit_stock_levels(&self, omit: bool) {
        self.bare_stock_response.store(omit, Ordering::SeqCst);
    }

    /// 写请求（非 GET）延迟响应
    pub fn delay_writes(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn product(&self, id: &str) -> Option<Value> {
        find(&self.products.lock().unwrap(), id).cloned()
    }

    pub fn participants(&self) -> Vec<Value> {
        self.participants.lock().unwrap().clone()
    }

    fn new_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 100)
    }
}

type Shared = Arc<MockBackend>;

fn find<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records.iter().find(|r| r["_id"] == id)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Record not found" }))).into_response()
}

async fn record(State(mock): State<Shared>, req: Request, next: Next) -> Response {
    mock.requests.fetch_add(1, Ordering::SeqCst);
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    mock.calls.lock().unwrap().push(RecordedCall {
        method: req.method().to_string(),
        uri: req.uri().to_string(),
        authorization,
    });

    let delay = mock.write_delay_ms.load(Ordering::SeqCst);
    if delay > 0 && *req.method() != axum::http::Method::GET {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    next.run(req).await
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({ "message": "Login successful", "token": TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn create_account(Json(body): Json<Value>) -> Response {
    if body["Email"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Email missing" })))
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
}

async fn list_products(State(mock): State<Shared>) -> Response {
    if mock.fail_lists.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(mock.products.lock().unwrap().clone()).into_response()
}

async fn get_product(State(mock): State<Shared>, Path(id): Path<String>) -> Response {
    match mock.product(&id) {
        Some(product) => Json(product).into_response(),
        None => not_found(),
    }
}

async fn create_product(State(mock): State<Shared>, Json(mut body): Json<Value>) -> Response {
    body["_id"] = json!(mock.new_id("p"));
    mock.products.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn replace_product(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut products = mock.products.lock().unwrap();
    match products.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(product) => {
            body["_id"] = json!(id);
            *product = body.clone();
            Json(body).into_response()
        }
        None => not_found(),
    }
}

async fn merge_product(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut products = mock.products.lock().unwrap();
    match products.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(product) => {
            if let (Some(target), Some(fields)) = (product.as_object_mut(), body.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            Json(product.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn update_stock(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let quantity: i64 = params
        .get("quantity")
        .and_then(|q| q.parse().ok())
        .unwrap_or(1);
    let delta = match params.get("action").map(String::as_str) {
        Some("in") => quantity,
        Some("out") => -quantity,
        _ => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Bad action" })))
                .into_response()
        }
    };

    let mut products = mock.products.lock().unwrap();
    match products.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(product) => {
            let in_stock = product["inStock"].as_i64().unwrap_or(0) + delta;
            if in_stock < 0 {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "Insufficient stock" })),
                )
                    .into_response();
            }
            product["inStock"] = json!(in_stock);
            if mock.bare_stock_response.load(Ordering::SeqCst) {
                return Json(json!({ "message": "Stock updated" })).into_response();
            }
            Json(json!({
                "inStock": in_stock,
                "stockQuantity": product["stockQuantity"].clone()
            }))
            .into_response()
        }
        None => not_found(),
    }
}

async fn delete_product(State(mock): State<Shared>, Path(id): Path<String>) -> Response {
    let mut products = mock.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() == before {
        return not_found();
    }
    Json(json!({ "message": "deleted" })).into_response()
}

async fn list_participants(State(mock): State<Shared>) -> Response {
    if mock.fail_lists.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(mock.participants()).into_response()
}

async fn get_participant(State(mock): State<Shared>, Path(id): Path<String>) -> Response {
    match find(&mock.participants.lock().unwrap(), &id) {
        Some(participant) => Json(participant.clone()).into_response(),
        None => not_found(),
    }
}

async fn register_participant(
    State(mock): State<Shared>,
    Json(mut body): Json<Value>,
) -> Response {
    let email = body["email"].clone();
    let mut participants = mock.participants.lock().unwrap();
    if participants.iter().any(|p| p["email"] == email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }
    body["_id"] = json!(mock.new_id("r"));
    participants.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_participant(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut participants = mock.participants.lock().unwrap();
    match participants.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(participant) => {
            body["_id"] = json!(id);
            *participant = body.clone();
            Json(body).into_response()
        }
        None => not_found(),
    }
}

async fn delete_participant(State(mock): State<Shared>, Path(id): Path<String>) -> Response {
    let mut participants = mock.participants.lock().unwrap();
    let before = participants.len();
    participants.retain(|p| p["_id"] != id.as_str());
    if participants.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// 在临时端口启动后端，返回基础地址
pub async fn spawn_backend() -> (String, Arc<MockBackend>) {
    let mock: Shared = Arc::new(MockBackend::seeded());

    let api = Router::new()
        .route("/login", post(login))
        .route("/createaccount", post(create_account))
        .route("/getaddproduct", get(list_products))
        .route("/AddProduct", post(create_product))
        .route("/AddProduct/:id", get(get_product).patch(merge_product))
        .route("/updateproduct/:id", put(replace_product))
        .route("/updatestock/:id", patch(update_stock))
        .route("/deleteproduct/:id", axum::routing::delete(delete_product))
        .route(
            "/ParticipantRegistration",
            get(list_participants).post(register_participant),
        )
        .route(
            "/ParticipantRegistration/:id",
            get(get_participant)
                .put(update_participant)
                .delete(delete_participant),
        )
        .with_state(mock.clone());

    let app = Router::new()
        .nest("/api/contact", api)
        .layer(middleware::from_fn_with_state(mock.clone(), record));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind backend");
    let addr = listener.local_addr().expect("backend addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}/api/contact"), mock)
}

/// 运行中的控制台
pub struct Console {
    base: String,
    /// 自动跟随重定向
    pub http: reqwest::Client,
    /// 不跟随重定向，用来检查门禁
    pub raw: reqwest::Client,
    pub session: SessionStore,
    pub session_path: std::path::PathBuf,
    _dir: Arc<TempDir>,
}

impl Console {
    pub async fn start(backend_url: &str) -> Self {
        let dir = Arc::new(tempfile::tempdir().expect("tempdir"));
        Self::start_in(backend_url, dir).await
    }

    /// 复用同一个会话目录（模拟重启）
    pub async fn start_in(backend_url: &str, dir: Arc<TempDir>) -> Self {
        let session_path = dir.path().join("session.json");
        let session = SessionStore::open(&session_path).expect("open session");
        let client = BackendClient::new(
            &BackendConfig {
                base_url: backend_url.to_string(),
                timeout_seconds: 5,
            },
            session.clone(),
        )
        .expect("backend client");

        let app = build_router(AppState::new(session.clone(), client), Duration::from_secs(10));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind console");
        let addr = listener.local_addr().expect("console addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::new(),
            raw: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("raw client"),
            session,
            session_path,
            _dir: dir,
        }
    }

    pub fn dir(&self) -> Arc<TempDir> {
        Arc::clone(&self._dir)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.expect("GET");
        let status = response.status();
        (status, response.json().await.expect("json body"))
    }

    pub async fn post(&self, path: &str, body: Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST");
        let status = response.status();
        (status, response.json().await.expect("json body"))
    }

    /// 不跟随重定向，返回状态码与 Location
    pub async fn raw_get(&self, path: &str) -> (reqwest::StatusCode, Option<String>) {
        let response = self.raw.get(self.url(path)).send().await.expect("GET");
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (response.status(), location)
    }

    pub async fn login(&self) -> Value {
        let (status, page) = self
            .post(
                "/login",
                json!({ "email": "admin@tsr.test", "password": PASSWORD, "remember_me": true }),
            )
            .await;
        assert_eq!(status, reqwest::StatusCode::OK, "{page}");
        assert_eq!(page["route"]["name"], "dashboard");
        page
    }
}

pub fn notification(page: &Value) -> (&str, &str) {
    (
        page["notification"]["severity"].as_str().unwrap_or_default(),
        page["notification"]["message"].as_str().unwrap_or_default(),
    )
}

pub fn ids(records: &Value) -> Vec<String> {
    records
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|r| r["_id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
