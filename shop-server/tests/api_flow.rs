//! HTTP 端到端测试
//!
//! 通过 `tower::ServiceExt::oneshot` 驱动完整路由 (含中间件)，
//! 数据库为临时目录中的 SQLite 文件。

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shop_server::core::config::AdminBootstrap;
use shop_server::{Config, ErrorCode, ServerState, api};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "admin-pass";

struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        shop_server::init_logger();

        let dir = TempDir::new().unwrap();
        let mut config = Config::with_database(dir.path().join("shop.db").to_string_lossy());
        config.admin = Some(AdminBootstrap {
            username: ADMIN_USER.into(),
            password: ADMIN_PASS.into(),
        });
        let state = ServerState::initialize(&config).await.unwrap();

        Self {
            router: api::build_app(state),
            _dir: dir,
        }
    }

    async fn call(
        &self,
        method: Method,
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

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, token, None).await
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({"username": username, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        self.login(ADMIN_USER, ADMIN_PASS).await
    }

    async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({"username": username, "password": "secret123"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_product(&self, admin: &str, name: &str, price: f64, stock: i64) -> i64 {
        let (status, body) = self
            .post(
                "/products",
                Some(admin),
                json!({"name": name, "price": price, "stock": stock, "description": format!("{name} description")}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["product"]["id"].as_i64().unwrap()
    }

    async fn stock_of(&self, product_id: i64) -> i64 {
        let (_, body) = self.get(&format!("/products/{product_id}"), None).await;
        body["data"]["product"]["stock"].as_i64().unwrap()
    }
}

fn assert_error(body: &Value, code: ErrorCode) {
    assert_eq!(body["success"], false, "{body}");
    assert_eq!(body["code"], code.code(), "{body}");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;
    let token = app.register("alice").await;

    let (status, body) = app.get("/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "user");

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({"username": "alice", "password": "another1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, ErrorCode::UsernameExists);

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({"username": "alice", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, ErrorCode::InvalidCredentials);

    let (status, unknown) = app
        .post(
            "/auth/login",
            None,
            json!({"username": "nobody", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], body["message"]);

    let token = app.login("alice", "secret123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post("/auth/register", None, json!({"username": "al", "password": "secret123"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ValidationFailed);

    let (status, body) = app
        .post("/auth/register", None, json!({"username": "alice", "password": "123"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn test_authentication_then_authorization() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, ErrorCode::NotAuthenticated);

    let (status, body) = app.get("/cart", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, ErrorCode::TokenInvalid);

    // admin routes check identity before role
    let (status, body) = app
        .post("/products", None, json!({"name": "X", "price": 1, "stock": 1, "description": "x"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, ErrorCode::NotAuthenticated);

    let user = app.register("bob").await;
    let (status, body) = app
        .post("/products", Some(&user), json!({"name": "X", "price": 1, "stock": 1, "description": "x"}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, ErrorCode::AdminRequired);

    let (status, _) = app.get("/reports/summary", Some(&user)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, _) = app.get("/reports/summary", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_crud() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/products",
            Some(&admin),
            json!({"name": "  Desk Lamp ", "price": 19.999, "stock": 4, "description": "LED"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let product = &body["data"]["product"];
    assert_eq!(product["name"], "Desk Lamp");
    assert_eq!(product["price"], 20.0);
    let id = product["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/products/{id}"),
            Some(&admin),
            Some(json!({"stock": 9})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["stock"], 9);
    assert_eq!(body["data"]["product"]["name"], "Desk Lamp");

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/products/{id}"),
            Some(&admin),
            Some(json!({"price": -1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ProductInvalidPrice);

    let (status, body) = app.get("/products/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid product ID");

    let (status, _) = app.delete(&format!("/products/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::ProductNotFound);

    let (status, _) = app.delete(&format!("/products/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_validation_and_malformed_json() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/products",
            Some(&admin),
            json!({"name": "", "price": 1, "stock": 1, "description": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ValidationFailed);

    let (status, body) = app
        .post(
            "/products",
            Some(&admin),
            json!({"name": "Mug", "price": 1, "stock": -3, "description": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ProductInvalidStock);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/products")
        .header(header::AUTHORIZATION, format!("Bearer {admin}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_product_listing_search_and_pages() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    for name in ["Red Mug", "Blue Mug", "Teapot", "100% Cotton Towel"] {
        app.create_product(&admin, name, 3.5, 10).await;
    }

    let (status, body) = app.get("/products?search=mug", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = body["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Blue Mug", "Red Mug"]);
    assert_eq!(body["data"]["pagination"]["totalItems"], 2);

    let (_, body) = app.get("/products?search=%25", None).await;
    assert_eq!(body["data"]["pagination"]["totalItems"], 1);

    let (_, body) = app.get("/products?page=2&limit=3", None).await;
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);

    let (_, body) = app.get("/products?limit=1000", None).await;
    assert_eq!(body["data"]["pagination"]["limit"], 100);

    let (status, body) = app.get("/products?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cart_flow() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.register("carol").await;
    let mug = app.create_product(&admin, "Mug", 4.5, 5).await;

    let (status, body) = app.get("/cart", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cart"]["items"], json!([]));
    assert_eq!(body["data"]["cart"]["subtotal"], 0.0);

    let (status, body) = app.delete(&format!("/cart/{mug}"), Some(&user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::CartNotFound);

    let (status, _) = app
        .post("/cart", Some(&user), json!({"productId": mug, "quantity": 2}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app
        .post("/cart", Some(&user), json!({"productId": mug.to_string(), "quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let cart = &body["data"]["cart"];
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["subtotal"], 13.5);

    let (status, body) = app
        .post("/cart", Some(&user), json!({"productId": mug, "quantity": 3}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::QuantityExceedsStock);
    assert_eq!(body["message"], "Quantity exceeds available stock (5)");

    let (status, body) = app.post("/cart", Some(&user), json!({"quantity": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "productId and quantity are required");

    let (status, body) = app
        .post("/cart", Some(&user), json!({"productId": mug + 1, "quantity": 1}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::ProductNotFound);

    let (status, body) = app.delete("/cart/abc", Some(&user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid product ID");

    let (status, body) = app.delete(&format!("/cart/{}", mug + 1), Some(&user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::CartItemNotFound);
    let (_, body) = app.get("/cart", Some(&user)).await;
    assert_eq!(body["data"]["cart"]["items"][0]["quantity"], 3);

    let (status, body) = app.delete(&format!("/cart/{mug}"), Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cart"]["items"], json!([]));
}

#[tokio::test]
async fn test_worked_example_over_http() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.register("dave").await;
    let a = app.create_product(&admin, "A", 10.0, 5).await;
    let b = app.create_product(&admin, "B", 5.0, 2).await;

    app.post("/cart", Some(&user), json!({"productId": a, "quantity": 3})).await;
    app.post("/cart", Some(&user), json!({"productId": b, "quantity": 2})).await;
    // B sells down to one unit after it was put in the cart
    app.call(
        Method::PUT,
        &format!("/products/{b}"),
        Some(&admin),
        Some(json!({"stock": 1})),
    )
    .await;

    let (status, body) = app.post("/orders", Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::InsufficientStock);
    assert_eq!(body["message"], "Insufficient stock for product: B");
    assert_eq!(app.stock_of(a).await, 5);
    assert_eq!(app.stock_of(b).await, 1);
    let (_, cart) = app.get("/cart", Some(&user)).await;
    assert_eq!(cart["data"]["cart"]["items"].as_array().unwrap().len(), 2);

    app.delete(&format!("/cart/{b}"), Some(&user)).await;
    let (status, body) = app.post("/orders", Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let order = &body["data"]["order"];
    assert_eq!(order["totalAmount"], 30.0);
    assert_eq!(order["items"][0]["name"], "A");
    assert_eq!(order["items"][0]["lineTotal"], 30.0);
    let order_id = order["id"].as_i64().unwrap();

    assert_eq!(app.stock_of(a).await, 2);
    assert_eq!(app.stock_of(b).await, 1);
    let (_, cart) = app.get("/cart", Some(&user)).await;
    assert_eq!(cart["data"]["cart"]["items"], json!([]));

    let (status, body) = app.get("/orders", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 1);

    let (status, body) = app.get(&format!("/orders/{order_id}"), Some(&user)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["id"], order_id);

    let other = app.register("erin").await;
    let (status, body) = app.get(&format!("/orders/{order_id}"), Some(&other)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, ErrorCode::OrderNotFound);

    let (status, body) = app.get("/reports/summary", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["totalOrders"], 1);
    assert_eq!(report["totalRevenue"], 30.0);
    assert_eq!(report["topProducts"][0]["productId"], a);
    assert_eq!(report["topProducts"][0]["totalSold"], 3);
}

#[tokio::test]
async fn test_order_failures() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.register("frank").await;

    let (status, body) = app.post("/orders", Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::CartEmpty);

    let lamp = app.create_product(&admin, "Lamp", 12.0, 3).await;
    app.post("/cart", Some(&user), json!({"productId": lamp, "quantity": 1})).await;
    app.delete(&format!("/products/{lamp}"), Some(&admin)).await;

    let (_, body) = app.get("/cart", Some(&user)).await;
    let line = &body["data"]["cart"]["items"][0];
    assert_eq!(line["product"], Value::Null);
    assert_eq!(body["data"]["cart"]["subtotal"], 0.0);

    let (status, body) = app.post("/orders", Some(&user), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, ErrorCode::ProductGone);
    assert_eq!(body["message"], "A product in the cart no longer exists");
}
