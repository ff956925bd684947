use std::time::Duration;

use serde_json::json;
use threadline::api::{ApiError, CommentBackend, HttpBackend, SubmitCommentRequest};
use threadline::core::comment::{CommentId, ReplyPlacement, ThreadTree};
use threadline::core::composer::{
    ComposerError, ComposerEvent, MSG_FAILED, MSG_POSTED, MSG_UNAUTHENTICATED, ReplyComposer,
};
use threadline::core::notify::Notifier;
use threadline::core::session::MemorySessionStore;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingNotifier {
    successes: Vec<String>,
    errors: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn logged_in() -> MemorySessionStore {
    MemorySessionStore::with_token(Some("jwt-abc".to_string()))
}

fn composer_with(parent: u64, content: &str) -> ReplyComposer {
    let mut composer = ReplyComposer::new(CommentId(parent));
    composer.content = content.to_string();
    composer
}

// ============================================================================
// SubmitComment
// ============================================================================

#[tokio::test]
async fn test_submit_sends_bearer_token_and_camel_case_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .and(header("Authorization", "Bearer jwt-abc"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"parentId": 11, "content": "Do you have a link?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 900})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(11, "Do you have a link?");
    let mut notifier = RecordingNotifier::default();

    let event = composer
        .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
        .await
        .unwrap();

    assert_eq!(event, ComposerEvent::Posted(json!({"id": 900})));
    assert!(composer.content.is_empty());
    assert!(!composer.is_submitting());
    assert_eq!(notifier.successes, vec![MSG_POSTED.to_string()]);
    assert!(notifier.errors.is_empty());
}

#[tokio::test]
async fn test_submit_preserves_content_whitespace() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .and(body_json(json!({"parentId": 1, "content": "  padded\n"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(1, "  padded\n");
    let mut notifier = RecordingNotifier::default();

    assert!(
        composer
            .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_server_error_keeps_text_and_reports_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(2, "my reply");
    let mut notifier = RecordingNotifier::default();

    let result = composer
        .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
        .await;

    match result {
        Err(ComposerError::Transport(ApiError::Api { status, message })) => {
            assert_eq!(status, 500);
            assert!(message.contains("database unavailable"));
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert_eq!(composer.content, "my reply");
    assert!(composer.can_submit());
    assert_eq!(notifier.errors, vec![MSG_FAILED.to_string()]);
}

#[tokio::test]
async fn test_unauthorized_is_a_failure_not_a_login_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(2, "hello");
    let mut notifier = RecordingNotifier::default();

    let result = composer
        .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
        .await;

    assert!(matches!(
        result,
        Err(ComposerError::Transport(ApiError::Api { status: 401, .. }))
    ));
    assert_eq!(notifier.errors, vec![MSG_FAILED.to_string()]);
}

#[tokio::test]
async fn test_empty_reply_never_reaches_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(1, " \n ");
    let mut notifier = RecordingNotifier::default();

    let result = composer
        .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
        .await;

    assert_eq!(result, Err(ComposerError::EmptyContent));
}

#[tokio::test]
async fn test_missing_token_never_reaches_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(1, "hello");
    let mut notifier = RecordingNotifier::default();

    let result = composer
        .submit(&MemorySessionStore::new(), &backend, TIMEOUT, &mut notifier)
        .await;

    assert_eq!(result, Err(ComposerError::Unauthenticated));
    assert_eq!(composer.content, "hello");
    assert_eq!(notifier.errors, vec![MSG_UNAUTHENTICATED.to_string()]);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut composer = composer_with(1, "anyone?");
    let mut notifier = RecordingNotifier::default();

    let result = composer
        .submit(&logged_in(), &backend, Duration::from_millis(200), &mut notifier)
        .await;

    assert_eq!(
        result,
        Err(ComposerError::Transport(ApiError::Timeout { after_secs: 0 }))
    );
    assert!(!composer.is_submitting());
    assert_eq!(composer.content, "anyone?");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 9 on loopback in CI
    let backend = HttpBackend::new("http://127.0.0.1:9");
    let request = SubmitCommentRequest {
        parent_id: CommentId(1),
        content: "hello",
    };

    let result = backend.submit_comment(request, "jwt").await;
    assert!(matches!(result, Err(ApiError::Network(_))));
}

// ============================================================================
// Comment listing
// ============================================================================

#[tokio::test]
async fn test_list_comments_parses_nested_thread() {
    let mock_server = MockServer::start().await;

    let body = json!([
        {
            "id": 1,
            "authorHandle": "audiophile_king",
            "bodyText": "Legendary transition.",
            "createdAtLabel": "2 hours ago",
            "score": 450,
            "children": [
                {
                    "id": 11,
                    "author": { "username": "music_fan_99" },
                    "text": "Glad you liked it!",
                    "createdAt": "2020-01-01T00:00:00Z",
                    "votes": 120,
                    "replies": []
                }
            ]
        },
        {
            "id": 2,
            "author": "coding_wizard",
            "content": "Context please?",
            "timeAgo": "5 hours ago",
            "isOp": true
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/posts/7/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(format!("{}/", mock_server.uri()));
    let comments = backend.list_comments(7).await.unwrap();
    let tree = ThreadTree::new(comments).unwrap();

    assert_eq!(tree.len(), 3);
    let reply = tree.find(CommentId(11)).unwrap();
    assert_eq!(reply.author_handle, "music_fan_99");
    assert_eq!(reply.body_text, "Glad you liked it!");
    assert_eq!(reply.score, 120);
    // Old timestamps fall back to an absolute date
    assert_eq!(reply.created_at_label, "Jan 01, 2020");
    assert_eq!(tree.depth_of(CommentId(11)), Some(1));

    let second = tree.find(CommentId(2)).unwrap();
    assert!(second.is_original_poster);
    assert_eq!(second.score, 0);
    assert!(second.children.is_empty());
}

#[tokio::test]
async fn test_list_comments_accepts_deeply_nested_thread() {
    let mock_server = MockServer::start().await;

    let mut node = json!({"id": 100, "authorHandle": "u", "bodyText": "bottom"});
    for id in (0..100).rev() {
        node = json!({"id": id, "authorHandle": "u", "bodyText": "link", "children": [node]});
    }

    Mock::given(method("GET"))
        .and(path("/posts/9/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([node])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let comments = backend.list_comments(9).await.unwrap();
    let tree = ThreadTree::new(comments).unwrap();

    assert_eq!(tree.len(), 101);
    assert_eq!(tree.depth_of(CommentId(100)), Some(100));
    assert_eq!(tree.find(CommentId(100)).unwrap().body_text, "bottom");
}

#[tokio::test]
async fn test_list_comments_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let result = backend.list_comments(1).await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn test_list_comments_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/404/comments"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such post"))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let result = backend.list_comments(404).await;
    assert_eq!(
        result,
        Err(ApiError::Api {
            status: 404,
            message: "no such post".to_string()
        })
    );
}

// ============================================================================
// End to end: reply posted over HTTP and spliced into the thread
// ============================================================================

#[tokio::test]
async fn test_posted_reply_can_be_spliced_under_parent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/SubmitComment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "author": "me",
            "content": "Welcome!",
        })))
        .mount(&mock_server)
        .await;

    let backend = HttpBackend::new(mock_server.uri());
    let mut tree = ThreadTree::new(vec![threadline::core::comment::Comment::new(
        1, "op", "First post",
    )])
    .unwrap();
    let mut composer = composer_with(1, "Welcome!");
    let mut notifier = RecordingNotifier::default();

    let ComposerEvent::Posted(value) = composer
        .submit(&logged_in(), &backend, TIMEOUT, &mut notifier)
        .await
        .unwrap()
    else {
        panic!("Expected Posted");
    };

    let wire: threadline::api::WireComment = serde_json::from_value(value).unwrap();
    tree.insert_reply(
        CommentId(1),
        wire.into_comment(chrono::Utc::now()),
        ReplyPlacement::NewestLast,
    )
    .unwrap();

    assert_eq!(tree.depth_of(CommentId(12)), Some(1));
    assert_eq!(tree.find(CommentId(1)).unwrap().children[0].body_text, "Welcome!");
}
