//! HTTP 路由集成测试 (tower oneshot，不监听端口)

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use shop_server::db::repository::{AdminRepository, MenuItemRepository};
use shop_server::services::http_server::build_router;
use shop_server::{Config, ServerState};
use shared::models::MenuItemCreate;

struct TestApp {
    _dir: tempfile::TempDir,
    state: ServerState,
    router: Router,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await.expect("initialize");
    let router = build_router(state.clone());
    TestApp {
        _dir: dir,
        state,
        router,
    }
}

impl TestApp {
    fn admin_token(&self) -> String {
        let repo = AdminRepository::new(self.state.storage.clone());
        let admin = match repo.find_by_username("tester").unwrap() {
            Some(admin) => admin,
            None => repo.create("tester", "tester-password").unwrap(),
        };
        self.state
            .jwt_service
            .generate_token(admin.id, &admin.username)
            .unwrap()
    }

    fn menu_item(&self, name: &str, category: &str, price: f64) -> i64 {
        MenuItemRepository::new(self.state.storage.clone())
            .create(MenuItemCreate {
                name: name.to_string(),
                category: category.to_string(),
                price,
                image: None,
                description: None,
            })
            .unwrap()
            .id
    }

    async fn send(
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
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = setup().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = setup().await;
    for uri in ["/api/dashboard", "/api/customers", "/api/rewards", "/api/menu/all"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], 1001, "{uri}");
    }

    let (status, _) = app
        .send(Method::GET, "/api/dashboard", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_menu_hides_inactive_items() {
    let app = setup().await;
    let mango = app.menu_item("Mango Smoothie", "Smoothie", 5.0);
    let kale = app.menu_item("Kale Juice", "Juice", 4.0);
    let token = app.admin_token();

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/menu/{kale}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, "/api/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![mango]);

    let (status, _) = app
        .send(Method::GET, &format!("/api/menu/{kale}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send(Method::GET, "/api/menu/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // 下架商品不能再收银
    let (status, body) = app
        .send(
            Method::POST,
            "/api/orders",
            None,
            Some(json!({ "customerName": "Ana", "customerPhone": "600", "itemId": kale })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);
}

#[tokio::test]
async fn test_order_claim_flow() {
    let app = setup().await;
    let item = app.menu_item("Mango Smoothie", "Smoothie", 5.0);
    let token = app.admin_token();

    let order = json!({
        "customerName": "Ana",
        "customerPhone": " 600111222 ",
        "itemId": item,
    });
    let mut customer_id = 0;
    for i in 0..5 {
        let (status, body) = app
            .send(Method::POST, "/api/orders", None, Some(order.clone()))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["isNewCustomer"], i == 0);
        customer_id = body["customer"]["id"].as_i64().unwrap();
    }

    // 未到第五杯前不能兑换; 第五杯后恰好一杯
    let claim = json!({ "customerId": customer_id, "category": "Smoothie" });
    let (status, body) = app
        .send(Method::POST, "/api/rewards/claim", Some(&token), Some(claim.clone()))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["reward"]["claimed"], 1);

    let (status, body) = app
        .send(Method::POST, "/api/rewards/claim", Some(&token), Some(claim))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5001);

    let (status, body) = app
        .send(Method::GET, "/api/rewards/lookup?phone=600111222", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerId"], customer_id);
    assert_eq!(body["totalOrders"], 6);
    assert_eq!(body["rewardsEarned"], 1);

    let (status, body) = app
        .send(Method::GET, &format!("/api/customers/{customer_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["orders"].as_array().unwrap().len(), 6);

    let (status, body) = app
        .send(Method::GET, "/api/earnings?timeRange=all", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalEarnings"], 25.0);
    assert_eq!(body["totalOrders"], 5);
}

#[tokio::test]
async fn test_order_validation_errors() {
    let app = setup().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/orders",
            None,
            Some(json!({ "customerName": "Ana", "customerPhone": "600", "drinkType": "Juice", "price": 3.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/rewards/lookup?phone=699999999",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

#[tokio::test]
async fn test_custom_earnings_range_needs_both_dates() {
    let app = setup().await;
    let token = app.admin_token();
    let (status, _) = app
        .send(
            Method::GET,
            "/api/earnings?startDate=2026-01-01",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
