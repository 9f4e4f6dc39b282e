//! Integration tests for the browse page and the cart badge.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use steam_tracker_integration_tests::TestApp;
use steam_tracker_storefront::services::analytics::AnalyticsEvent;

// ============================================================================
// Page and Fragments
// ============================================================================

#[tokio::test]
async fn test_browse_page_lists_whole_catalog() {
    let mut app = TestApp::new();

    let resp = app.get("/").await;

    assert_eq!(resp.status, StatusCode::OK);
    for name in [
        "Crystal Growing Kit",
        "Robot Building Arm",
        "Wooden Bridge Builder",
        "Digital Art Tablet",
        "Math Puzzle Cube",
        "Solar System Model",
        "Coding Board Game",
        "Hydraulic Claw",
        "Pottery Wheel Set",
        "Fraction Pizza Game",
    ] {
        assert!(resp.body.contains(name), "missing {name}");
    }
    assert!(resp.body.contains("$24.99"));
    assert!(resp.body.contains("$34.50"));
}

#[tokio::test]
async fn test_category_dropdown_starts_with_all() {
    let mut app = TestApp::new();

    let resp = app.get("/").await;

    let all = resp.body.find(">All</option>").unwrap();
    let science = resp.body.find(">Science</option>").unwrap();
    let math = resp.body.find(">Math</option>").unwrap();
    assert!(all < science);
    assert!(science < math);
}

#[tokio::test]
async fn test_navigation_reports_page_names() {
    let mut app = TestApp::new();

    app.get("/").await;
    app.get("/checkout").await;
    // HTMX refreshes are not navigations
    app.htmx_get("/products/grid").await;
    app.htmx_get("/cart/count").await;

    assert_eq!(app.analytics.pages(), vec!["Browse: Products", "Checkout"]);
}

#[tokio::test]
async fn test_fragments_loaded_directly_are_not_page_views() {
    let mut app = TestApp::new();

    app.get("/cart/count").await;
    app.get("/products/grid").await;

    assert!(app.analytics.pages().is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_reported_and_not_found() {
    let mut app = TestApp::new();

    let resp = app.get("/about").await;
    app.htmx_get("/nowhere").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(app.analytics.pages(), vec!["Unknown: /about"]);
}

#[tokio::test]
async fn test_live_filter_does_not_track_search() {
    let mut app = TestApp::new();

    let resp = app.htmx_get("/products/grid?q=ROBOT").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("Robot Building Arm"));
    assert!(!resp.body.contains("Crystal Growing Kit"));
    assert!(!resp.body.contains("<html"));
    assert!(app.analytics.events().is_empty());
}

#[tokio::test]
async fn test_category_filter() {
    let mut app = TestApp::new();

    let resp = app.htmx_get("/products/grid?category=Science").await;

    assert!(resp.body.contains("Crystal Growing Kit"));
    assert!(resp.body.contains("Solar System Model"));
    assert!(!resp.body.contains("Robot Building Arm"));
}

#[tokio::test]
async fn test_query_and_category_combine() {
    let mut app = TestApp::new();

    let resp = app
        .htmx_get("/products/grid?q=game&category=Technology")
        .await;

    assert!(resp.body.contains("Coding Board Game"));
    assert!(!resp.body.contains("Fraction Pizza Game"));
}

#[tokio::test]
async fn test_no_matches_shows_message() {
    let mut app = TestApp::new();

    let resp = app.htmx_get("/products/grid?q=zzz").await;

    assert!(resp.body.contains("No products found"));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let mut app = TestApp::new();

    let resp = app.htmx_get("/products/grid?category=History").await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submitted_search_is_tracked() {
    let mut app = TestApp::new();

    let resp = app
        .htmx_post_form("/search", &[("q", "game"), ("category", "All")])
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let events = app.analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        serde_json::to_value(&events[0]).unwrap(),
        json!({
            "name": "Search Performed",
            "properties": {"query": "game", "resultsCount": 2, "category": "All"}
        })
    );
}

#[tokio::test]
async fn test_plain_search_renders_whole_page() {
    let mut app = TestApp::new();

    let resp = app.post_form("/search", &[("q", "claw")]).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("<html"));
    assert!(resp.body.contains("Hydraulic Claw"));
    assert!(!resp.body.contains("Pottery Wheel Set"));
}

// ============================================================================
// Adding to the Cart
// ============================================================================

#[tokio::test]
async fn test_add_with_chosen_quantity() {
    let mut app = TestApp::new();

    app.step_quantity("1", 1).await;
    app.step_quantity("1", 1).await;
    let resp = app.add_to_cart("1").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.header("hx-trigger"), Some("cart-updated"));
    assert!(resp.body.contains("Added!"));
    assert_eq!(app.cart_count().await, 3);

    let events = app.analytics.events();
    assert_eq!(
        events,
        vec![AnalyticsEvent::ItemAddedToCart {
            product_id: "1".to_string(),
            product_name: "Crystal Growing Kit".to_string(),
            quantity: 3,
            unit_price: "24.99".parse().unwrap(),
        }]
    );
}

#[tokio::test]
async fn test_quantity_never_drops_below_one() {
    let mut app = TestApp::new();

    app.step_quantity("2", -1).await;
    app.step_quantity("2", -1).await;
    app.add_to_cart("2").await;

    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_adding_twice_accumulates() {
    let mut app = TestApp::new();

    app.add_to_cart("5").await;
    app.add_to_cart("5").await;
    app.add_to_cart("6").await;

    assert_eq!(app.cart_count().await, 3);
    assert_eq!(app.analytics.events().len(), 3);
}

#[tokio::test]
async fn test_out_of_stock_cannot_be_added() {
    let mut app = TestApp::new();

    let page = app.get("/").await;
    assert!(page.body.contains("Out of Stock"));

    let resp = app.add_to_cart("7").await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert_eq!(app.cart_count().await, 0);
    assert!(app.analytics.events().is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mut app = TestApp::new();

    let resp = app.add_to_cart("999").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plain_form_add_redirects_home() {
    let mut app = TestApp::new();

    let resp = app.post_form("/cart/add", &[("product_id", "3")]).await;

    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.header("location"), Some("/"));
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_badge_hidden_when_cart_empty() {
    let mut app = TestApp::new();

    assert_eq!(app.cart_count().await, 0);
    let page = app.get("/").await;
    assert!(page.body.contains("id=\"cart-count\""));
    assert_eq!(steam_tracker_integration_tests::badge_count(&page.body), 0);
}

#[tokio::test]
async fn test_badge_shown_in_page_nav() {
    let mut app = TestApp::new();

    app.add_to_cart("4").await;
    let page = app.get("/checkout").await;

    assert_eq!(steam_tracker_integration_tests::badge_count(&page.body), 1);
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let mut alice = TestApp::new();
    let mut bob = alice.second_visitor();

    alice.add_to_cart("1").await;

    assert_eq!(alice.cart_count().await, 1);
    assert_eq!(bob.cart_count().await, 0);
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_reading_pages_does_not_start_a_session() {
    let mut app = TestApp::new();

    let responses = [
        app.get("/").await,
        app.htmx_get("/products/grid").await,
        app.htmx_get("/cart/count").await,
        app.get("/checkout").await,
    ];

    for resp in &responses {
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.header("set-cookie").is_none());
    }
    assert!(!app.has_session());

    app.add_to_cart("1").await;
    assert!(app.has_session());
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_cookieless_traffic_does_not_evict_carts() {
    let mut alice = TestApp::new();
    alice.add_to_cart("1").await;

    let mut crawler = alice.second_visitor();
    for _ in 0..12_000 {
        crawler.htmx_get("/cart/count").await;
    }

    assert!(!crawler.has_session());
    assert_eq!(alice.cart_count().await, 1);
}

// ============================================================================
// Plumbing
// ============================================================================

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::new();

    let resp = app.get("/health").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");
    assert!(app.analytics.pages().is_empty());
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let mut app = TestApp::new();

    let resp = app.get("/").await;

    assert_eq!(resp.header("x-frame-options"), Some("DENY"));
    assert_eq!(resp.header("cache-control"), Some("no-store"));
    assert!(resp.header("content-security-policy").is_some());
    assert!(resp.header("x-request-id").is_some());
}
