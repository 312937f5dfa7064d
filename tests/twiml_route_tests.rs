use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sip_dial_bridge::router::{WebhookState, webhook_router};
use sip_dial_bridge::types::DialSip;
use tower::ServiceExt;

const SIP_URL: &str = "sip:bridge@pbx.example.com:5060";

fn app() -> axum::Router {
    webhook_router(WebhookState::new(&DialSip::new(SIP_URL)))
}

async fn body_string(resp: axum::response::Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn get_twiml_returns_dial_sip_document() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/twiml")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/xml"));

    let body = body_string(resp).await;
    assert!(body.contains(&format!("<Dial><Sip>{SIP_URL}</Sip></Dial>")));
}

#[tokio::test]
async fn post_twiml_with_callback_form_returns_same_document() {
    let app = app();

    let get = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/twiml?CallSid=CA1&CallStatus=ringing")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let get_body = body_string(get).await;

    let post = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/twiml")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "AccountSid=AC123&CallSid=CA42&CallStatus=in-progress&From=%2B15550001111",
                ))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(post.status(), StatusCode::OK);
    assert!(
        post.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/xml"))
    );
    assert_eq!(body_string(post).await, get_body);
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let app = app();
    let mut bodies = Vec::new();
    for _ in 0..3 {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/twiml")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed");
        bodies.push(body_string(resp).await);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn other_paths_and_methods_are_rejected() {
    let not_found = app()
        .oneshot(
            Request::builder()
                .uri("/voice")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

    let not_allowed = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/twiml")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(not_allowed.status(), StatusCode::METHOD_NOT_ALLOWED);
}
