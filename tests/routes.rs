use async_session::MemoryStore;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use quadraticlands::{
    auth::{store_profile, Profile, COOKIE_NAME},
    postcard::PostcardTemplate,
    server::{app, AppState},
    views::LoginGate,
};
use std::path::Path;
use tower::ServiceExt;

fn postcard_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/postcard.svg")
}

fn router(store: MemoryStore) -> Router {
    let postcard = PostcardTemplate::load(postcard_path()).unwrap();
    let state = AppState::new(store, LoginGate::new("/login/github/"), postcard);
    app(state, &Path::new(env!("CARGO_MANIFEST_DIR")).join("static"))
}

async fn get(router: Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, format!("{COOKIE_NAME}={cookie}"));
    }
    router
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn signed_in(store: &MemoryStore) -> String {
    let profile = Profile {
        handle: "owocki".into(),
        initial_dist: Some(1_500),
        completed_missions: vec!["use".into(), "receive".into()],
    };
    store_profile(store, &profile).await.unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn postcard_svg_filters_by_query() {
    let response = get(
        router(MemoryStore::new()),
        "/quadraticlands/mission/postcard/svg?front_frame=1&front_background=a&back_background=b&text=Hello",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );

    let svg = body_string(response).await;
    assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<svg width=\"100%\""));
    assert!(svg.contains("viewBox=\"0 0 1200 800\""));
    assert!(svg.contains("id=\"front_frame:1\""));
    assert!(!svg.contains("id=\"front_frame:2\""));
    assert!(svg.contains("id=\"front_background:a\""));
    assert!(!svg.contains("id=\"front_background:b\""));
    assert!(svg.contains("id=\"back_background:b\""));
    assert!(!svg.contains("id=\"back_background:a\""));
    assert!(svg.contains(">Hello</text>"));
    assert!(!svg.contains("<style>"));
    assert!(svg.ends_with("</svg>\n"));
}

#[tokio::test]
async fn postcard_svg_without_query_keeps_text_only() {
    let response = get(
        router(MemoryStore::new()),
        "/quadraticlands/mission/postcard/svg",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let svg = body_string(response).await;
    assert!(svg.contains("<text id=\"text\" class=\"caption\" x=\"640\" y=\"120\"></text>"));
    assert!(!svg.contains("front_frame"));
    assert!(!svg.contains("background"));
}

#[tokio::test]
async fn open_pages_render_for_anonymous_visitors() {
    for uri in [
        "/quadraticlands/",
        "/quadraticlands/about",
        "/quadraticlands/test",
        "/quadraticlands/mission",
        "/quadraticlands/mission/use",
    ] {
        let response = get(router(MemoryStore::new()), uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn faq_lists_entries() {
    let response = get(router(MemoryStore::new()), "/quadraticlands/faq", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("What is Quadratic Lands?"));
}

#[tokio::test]
async fn unknown_pages_are_not_found() {
    for uri in [
        "/quadraticlands/nowhere",
        "/quadraticlands/mission/Use",
        "/quadraticlands/mission/use/Claim",
    ] {
        let response = get(router(MemoryStore::new()), uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn gated_pages_redirect_to_login() {
    let response = get(
        router(MemoryStore::new()),
        "/quadraticlands/mission/use/question/2?lang=en",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "/login/github/?next=/quadraticlands/mission/use/question/2%3Flang%3Den"
    );

    for (uri, next) in [
        ("/quadraticlands/dashboard", "/quadraticlands/dashboard"),
        ("/quadraticlands/mission/use/claim", "/quadraticlands/mission/use/claim"),
        (
            "/quadraticlands/mission/use/question/1/a",
            "/quadraticlands/mission/use/question/1/a",
        ),
        ("/quadraticlands/mission/postcard", "/quadraticlands/mission/postcard"),
    ] {
        let response = get(router(MemoryStore::new()), uri, None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        assert_eq!(location(&response), format!("/login/github/?next={next}"));
    }
}

#[tokio::test]
async fn receive_mission_bounces_anonymous_visitors() {
    let response = get(
        router(MemoryStore::new()),
        "/quadraticlands/mission/receive",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/quadraticlands/mission");
}

#[tokio::test]
async fn signed_in_visitors_reach_gated_pages() {
    let store = MemoryStore::new();
    let cookie = signed_in(&store).await;

    let response = get(
        router(store.clone()),
        "/quadraticlands/dashboard",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Signed in as @owocki"));
    assert!(html.contains("Missions completed: 2"));

    let response = get(
        router(store.clone()),
        "/quadraticlands/mission/diplomacy/question/3/b",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Mission: diplomacy"));
    assert!(html.contains("<h2>question 3, answer b</h2>"));

    let response = get(
        router(store.clone()),
        "/quadraticlands/mission/receive",
        Some(&cookie),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn postcard_page_offers_slot_choices() {
    let store = MemoryStore::new();
    let cookie = signed_in(&store).await;

    let response = get(router(store), "/quadraticlands/mission/postcard", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("name=\"front_frame\" value=\"2\""));
    assert!(html.contains("name=\"back_background\" value=\"a\""));
}

#[tokio::test]
async fn stale_cookie_is_treated_as_anonymous() {
    let response = get(
        router(MemoryStore::new()),
        "/quadraticlands/dashboard",
        Some("c3RhbGU="),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}
