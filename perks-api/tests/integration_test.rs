use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use perks_api::{app, AppState};
use perks_shared::ServiceKind;
use perks_store::app_config::SimulatorEndpoints;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

async fn simulator(kind: ServiceKind) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, perks_simulator::router_for(kind)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn api(travel_url: String, hotel_url: String, shopping_url: String) -> Router {
    let endpoints = SimulatorEndpoints {
        travel_url,
        hotel_url,
        shopping_url,
        timeout_ms: 5_000,
    };
    app(AppState::from_endpoints(&endpoints).unwrap())
}

async fn all_up() -> Router {
    api(
        simulator(ServiceKind::Travel).await,
        simulator(ServiceKind::Hotel).await,
        simulator(ServiceKind::Shopping).await,
    )
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn future_date(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = all_up().await;
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_simulator_status_reports_every_service() {
    let app = all_up().await;
    let (status, body) = call(&app, "GET", "/api/integration/simulator/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"], "all_healthy");
    assert_eq!(body["total"], 3);
    let names: Vec<&str> = body["services"].as_array().unwrap().iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["travel", "hotel", "shopping"]);

    let app = api(closed_port().await, closed_port().await, closed_port().await);
    let (_, body) = call(&app, "GET", "/api/integration/simulator/status", None).await;
    assert_eq!(body["overall"], "unavailable");
    assert_eq!(body["healthy"], 0);
}

#[tokio::test]
async fn test_flight_search_degrades_when_travel_is_down() {
    let app = api(
        closed_port().await,
        simulator(ServiceKind::Hotel).await,
        simulator(ServiceKind::Shopping).await,
    );
    let uri = format!(
        "/api/integration/offers/travel/search-flights?origin=NYC&destination=LAX&departure_date={}&passengers=2",
        future_date(30)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flights"], json!([]));
    assert_eq!(body["warning"], "travel service is currently unavailable, showing no results");

    // Other services are unaffected.
    let (status, body) = call(&app, "GET", "/api/integration/offers/hotel/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("warning").is_none());
    assert!(!body["cities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_date_is_validation_error() {
    let app = all_up().await;
    let uri = "/api/integration/offers/travel/search-flights?origin=NYC&destination=LAX&departure_date=20-12-2026";
    let (status, body) = call(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "departure_date");
}

#[tokio::test]
async fn test_travel_package_reports_failed_leg() {
    let app = api(
        simulator(ServiceKind::Travel).await,
        closed_port().await,
        simulator(ServiceKind::Shopping).await,
    );
    let uri = format!(
        "/api/integration/offers/search/travel-package?origin=NYC&destination=LAX&departure_date={}&return_date={}&passengers=2",
        future_date(30),
        future_date(33)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["failed_legs"], json!(["hotel"]));
    assert!(body.get("travel_packages").is_none());
}

#[tokio::test]
async fn test_travel_package_pairs_cheapest_options() {
    let app = all_up().await;
    let uri = format!(
        "/api/integration/offers/search/travel-package?origin=NYC&destination=LAX&departure_date={}&return_date={}&passengers=2",
        future_date(30),
        future_date(33)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let packages = body["travel_packages"].as_array().unwrap();
    assert!(!packages.is_empty());
    assert!(packages.len() <= 6);
    assert_eq!(body["count"], packages.len());

    let finals: Vec<f64> = packages.iter().map(|p| p["final_price"].as_f64().unwrap()).collect();
    assert!(finals.windows(2).all(|w| w[0] <= w[1]));
    for package in packages {
        assert_eq!(package["nights"], 3);
        let base = package["flight"]["total_price"].as_f64().unwrap() + package["hotel"]["min_price"].as_f64().unwrap();
        assert!((package["base_price"].as_f64().unwrap() - base).abs() < 0.01);
    }
}

#[tokio::test]
async fn test_offer_lifecycle_and_discounted_search() {
    let app = all_up().await;
    let expiry = chrono::Utc::now() + chrono::Duration::days(30);

    let (status, offer) = call(
        &app,
        "POST",
        "/api/offers",
        Some(json!({
            "title": "10% off flights",
            "category": "TRAVEL",
            "discount_percentage": 10.0,
            "max_discount_amount": 30.0,
            "expiry_date": expiry,
            "max_usage_per_customer": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(offer["status"], "ACTIVE");
    let offer_id = offer["id"].as_str().unwrap().to_string();

    let activate = format!("/api/offers/{}/activate", offer_id);
    let (status, _) = call(&app, "POST", &activate, Some(json!({ "customer_id": "cust-1" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(&app, "POST", &activate, Some(json!({ "customer_id": "cust-1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!(
        "/api/integration/offers/travel/search-flights?origin=NYC&destination=LAX&departure_date={}&passengers=2&customer_id=cust-1",
        future_date(30)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    for flight in body["flights"].as_array().unwrap() {
        let base = flight["base_price"].as_f64().unwrap();
        let expected = ((base - (base * 0.10).min(30.0)) * 100.0).round() / 100.0;
        assert!((flight["final_price"].as_f64().unwrap() - expected).abs() < 0.011);
        assert_eq!(flight["offer"]["offer_id"], offer_id.as_str());
    }

    let (status, body) = call(&app, "GET", "/api/offers/customers/cust-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activations"].as_array().unwrap().len(), 1);

    let (status, body) = call(&app, "POST", &format!("/api/offers/{}/expire", offer_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "EXPIRED");
}

#[tokio::test]
async fn test_booking_with_offer_counts_usage() {
    let app = all_up().await;
    let expiry = chrono::Utc::now() + chrono::Duration::days(30);
    let (_, offer) = call(
        &app,
        "POST",
        "/api/offers",
        Some(json!({
            "title": "Hotel saver",
            "category": "TRAVEL",
            "discount_percentage": 15.0,
            "expiry_date": expiry
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();
    call(
        &app,
        "POST",
        &format!("/api/offers/{}/activate", offer_id),
        Some(json!({ "customer_id": "cust-9" })),
    )
    .await;

    let booking = json!({
        "flight_id": "FL1001",
        "passenger_details": [{ "name": "Grace Hopper" }],
        "payment_method": "4111111111111111",
        "total_price": 357.0,
        "customer_id": "cust-9",
        "offer_id": offer_id,
        "discount_applied": 63.0
    });
    let (status, body) = call(&app, "POST", "/api/integration/offers/travel/book-flight", Some(booking.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["booking_reference"].as_str().is_some());
    assert_eq!(body["offer_usage"]["usage_count"], 1);
    assert_eq!(body["offer_usage"]["total_savings"], 63.0);

    // Single use by default.
    let (status, body) = call(&app, "POST", "/api/integration/offers/travel/book-flight", Some(booking)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "offer_id");
}

#[tokio::test]
async fn test_simulator_rejection_passes_through() {
    let app = all_up().await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/integration/offers/shopping/add-to-cart",
        Some(json!({ "product_id": "PROD001", "quantity": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity must be at least 1");

    let (status, body) = call(
        &app,
        "POST",
        "/api/integration/offers/travel/book-flight",
        Some(json!({ "passenger_details": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "body");
}

#[tokio::test]
async fn test_pass_through_when_partner_is_down() {
    let app = api(
        simulator(ServiceKind::Travel).await,
        simulator(ServiceKind::Hotel).await,
        closed_port().await,
    );
    let (status, body) = call(&app, "GET", "/api/integration/offers/shopping/order/ORD-1", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["service"], "shopping");

    let (status, body) = call(&app, "GET", "/api/integration/offers/shopping/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"].as_str().unwrap().starts_with("shopping service"));
}

#[tokio::test]
async fn test_unknown_places_are_caller_errors_not_outages() {
    let app = all_up().await;
    let uri = format!(
        "/api/integration/offers/travel/search-flights?origin=NYC&destination=XYZ&departure_date={}",
        future_date(30)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "destination");
    assert!(body.get("warning").is_none());

    let uri = format!(
        "/api/integration/offers/hotel/search-hotels?city=Paris&check_in={}&check_out={}",
        future_date(30),
        future_date(33)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "city");

    // Flights go to SFO, hotels do not.
    let uri = format!(
        "/api/integration/offers/search/travel-package?origin=NYC&destination=SFO&departure_date={}&return_date={}",
        future_date(30),
        future_date(33)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "destination");
}

#[tokio::test]
async fn test_booking_cannot_claim_more_than_the_offer_gives() {
    let app = all_up().await;
    let expiry = chrono::Utc::now() + chrono::Duration::days(30);
    let (_, offer) = call(
        &app,
        "POST",
        "/api/offers",
        Some(json!({
            "title": "Capped flights",
            "category": "TRAVEL",
            "discount_percentage": 10.0,
            "max_discount_amount": 30.0,
            "expiry_date": expiry
        })),
    )
    .await;
    let offer_id = offer["id"].as_str().unwrap().to_string();
    call(
        &app,
        "POST",
        &format!("/api/offers/{}/activate", offer_id),
        Some(json!({ "customer_id": "cust-3" })),
    )
    .await;

    let mut booking = json!({
        "flight_id": "FL1001",
        "passenger_details": [{ "name": "Alan Turing" }],
        "payment_method": "4111111111111111",
        "total_price": 390.0,
        "customer_id": "cust-3",
        "offer_id": offer_id,
        "discount_applied": 1000000.0
    });
    let (status, body) = call(&app, "POST", "/api/integration/offers/travel/book-flight", Some(booking.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "discount_applied");

    booking["discount_applied"] = json!(30.0);
    let (status, body) = call(&app, "POST", "/api/integration/offers/travel/book-flight", Some(booking)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offer_usage"]["total_savings"], 30.0);
}

#[tokio::test]
async fn test_travel_package_echoes_search_criteria() {
    let app = all_up().await;
    let uri = format!(
        "/api/integration/offers/search/travel-package?origin=NYC&destination=MIA&departure_date={}&return_date={}&passengers=2",
        future_date(30),
        future_date(33)
    );
    let (status, body) = call(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search_criteria"]["destination"], "MIA");
    assert_eq!(body["search_criteria"]["hotel_city"], "miami");
    assert_eq!(body["search_criteria"]["check_in"], future_date(30));
}
