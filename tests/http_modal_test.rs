use gallery_modal::utils::error::ErrorCategory;
use gallery_modal::{
    CommentForm, ElementIds, HttpCommentService, ImageRef, LoadOutcome, MemorySurface,
    ModalController, ModalError, ModalSettings, SubmitOutcome,
};
use httpmock::prelude::*;
use std::time::Duration;

const COMMENTS: &str = "previous-comments";

fn http_controller(
    server: &MockServer,
    timeout: Duration,
) -> ModalController<HttpCommentService, MemorySurface> {
    let service = HttpCommentService::new(&server.base_url(), timeout).unwrap();
    ModalController::bind(
        service,
        MemorySurface::portfolio(),
        &ElementIds::default(),
        ModalSettings {
            image_count: Some(12),
            ..ModalSettings::default()
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_open_with_real_http() {
    let server = MockServer::start();
    let mock_data = serde_json::json!([
        {"username": "a", "body": "hi", "timestamp": "t1"},
        {"username": "b", "body": "yo", "zorblax": "t2"},
        {"username": "c", "body": "hey", "timestamp": 1591265700000i64}
    ]);

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/data").query_param("id", "3");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(mock_data);
    });

    let controller = http_controller(&server, Duration::from_secs(5));
    let outcome = controller
        .open_modal(ImageRef::new(3, "x.png", "cap"))
        .await;

    api_mock.assert();
    assert!(matches!(outcome, LoadOutcome::Rendered { index: 3, count: 3 }));

    let text = controller
        .inspect_surface(|surface| surface.render_text(COMMENTS))
        .await;
    assert_eq!(
        text,
        "a · t1\n  hi\nb · t2\n  yo\nc · 04/06/2020 10:15\n  hey"
    );
}

#[tokio::test]
async fn test_end_to_end_with_api_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(500);
    });

    let controller = http_controller(&server, Duration::from_secs(5));
    let outcome = controller
        .open_modal(ImageRef::new(2, "y.png", "sunset"))
        .await;

    api_mock.assert();
    match outcome {
        LoadOutcome::Failed { error, .. } => assert!(error.is_network_failure()),
        other => panic!("expected failure, got {:?}", other),
    }

    let (notices, visible) = controller
        .inspect_surface(|surface| {
            (
                surface.notices(COMMENTS).len(),
                surface.element("modal").unwrap().visible,
            )
        })
        .await;
    assert_eq!(notices, 1);
    assert!(visible);
}

#[tokio::test]
async fn test_legacy_html_payload_is_malformed() {
    let server = MockServer::start();
    // 舊 servlet 的輸出：單引號加上尾逗號，不是 JSON
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("[{'username': 'a', 'zorblax': '01/02/2020 10:00', 'body': 'hi'},]");
    });

    let controller = http_controller(&server, Duration::from_secs(5));
    let outcome = controller
        .open_modal(ImageRef::new(1, "z.png", "harbour"))
        .await;

    api_mock.assert();
    match outcome {
        LoadOutcome::Failed { error, .. } => {
            assert_eq!(error.category(), ErrorCategory::MalformedResponse)
        }
        other => panic!("expected malformed response, got {:?}", other),
    }
    let rendered = controller
        .inspect_surface(|surface| surface.comments(COMMENTS).len())
        .await;
    assert_eq!(rendered, 0);
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200)
            .delay(Duration::from_secs(2))
            .json_body(serde_json::json!([]));
    });

    let controller = http_controller(&server, Duration::from_millis(200));
    let outcome = controller
        .open_modal(ImageRef::new(4, "w.png", "field"))
        .await;

    match outcome {
        LoadOutcome::Failed { error, .. } => {
            assert!(matches!(error, ModalError::NetworkError { .. }));
            assert!(error.is_network_failure());
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_post_then_refresh() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/data").query_param("id", "5");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"username": "a", "body": "first", "timestamp": "t1"}
            ]));
    });
    let post_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/data")
            .x_www_form_urlencoded_tuple("id", "5")
            .x_www_form_urlencoded_tuple("username", "ada")
            .x_www_form_urlencoded_tuple("body", "second");
        then.status(200);
    });

    let controller = http_controller(&server, Duration::from_secs(5));
    controller
        .open_modal(ImageRef::new(5, "v.png", "dunes"))
        .await;

    let outcome = controller
        .submit_comment(CommentForm::new(5, "ada", "second"))
        .await;

    post_mock.assert();
    list_mock.assert_hits(2);
    assert!(matches!(
        outcome,
        SubmitOutcome::Posted {
            index: 5,
            refresh: Some(LoadOutcome::Rendered { .. })
        }
    ));
}

#[tokio::test]
async fn test_rejected_comment_never_reaches_service() {
    let server = MockServer::start();
    let post_mock = server.mock(|when, then| {
        when.method(POST).path("/data");
        then.status(200);
    });

    let controller = http_controller(&server, Duration::from_secs(5));
    let outcome = controller
        .submit_comment(CommentForm::new(5, "", "anonymous thoughts"))
        .await;

    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    post_mock.assert_hits(0);
}
