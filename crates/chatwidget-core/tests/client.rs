use std::time::Duration;

use chatwidget_core::{ChatApi, ChatClient, Sender, CONNECTION_ERROR_TEXT};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> ChatClient {
    ChatClient::new(ChatApi::new(&server.uri()))
}

fn texts(client: &ChatClient) -> Vec<(Sender, String)> {
    client
        .view()
        .messages()
        .iter()
        .map(|m| (m.sender(), m.text().to_string()))
        .collect()
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_reply_rendered_after_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut input = "  hello \n".to_string();
    let handle = client.send_message(&mut input).expect("request should be sent");

    // user message is there before the reply comes back
    assert_eq!(texts(&client), vec![(Sender::User, "hello".to_string())]);
    assert!(input.is_empty());

    handle.await.unwrap();
    assert_eq!(
        texts(&client),
        vec![
            (Sender::User, "hello".to_string()),
            (Sender::Bot, "hi".to_string()),
        ]
    );
    assert!(!client.view().pending().is_visible());
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": "hi" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for blank in ["", "   ", "\t\n  "] {
        let mut input = blank.to_string();
        assert!(client.send_message(&mut input).is_none());
        assert_eq!(input, blank);
    }

    assert!(client.view().is_empty());
    assert!(!client.view().pending().is_visible());
    assert_eq!(requests_to(&server, "/chat").await, 0);
}

#[tokio::test]
async fn test_missing_responses_renders_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "other": 1 })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut input = "ping".to_string();
    client.send_message(&mut input).unwrap().await.unwrap();

    assert_eq!(texts(&client), vec![(Sender::User, "ping".to_string())]);
    assert!(!client.view().pending().is_visible());
}

#[tokio::test]
async fn test_server_error_shows_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut input = "ping".to_string();
    client.send_message(&mut input).unwrap().await.unwrap();

    assert_eq!(
        texts(&client),
        vec![
            (Sender::User, "ping".to_string()),
            (Sender::Bot, CONNECTION_ERROR_TEXT.to_string()),
        ]
    );
    assert!(!client.view().pending().is_visible());
}

#[tokio::test]
async fn test_non_json_reply_shows_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut input = "ping".to_string();
    client.send_message(&mut input).unwrap().await.unwrap();

    let messages = texts(&client);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], (Sender::Bot, CONNECTION_ERROR_TEXT.to_string()));
}

#[tokio::test]
async fn test_unreachable_server_shows_notice() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = ChatClient::new(ChatApi::new(&uri));
    let mut input = "anyone there?".to_string();
    client.send_message(&mut input).unwrap().await.unwrap();

    let messages = texts(&client);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], (Sender::Bot, CONNECTION_ERROR_TEXT.to_string()));
    assert_eq!(messages[1].1, "⚠️ Error connecting to the server.");
    assert!(!client.view().pending().is_visible());
}

#[tokio::test]
async fn test_indicator_stays_until_last_request_finishes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "fast" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "responses": "fast reply" }))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "slow" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "responses": "slow reply" }))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let slow = client.send_message(&mut "slow".to_string()).unwrap();
    let fast = client.send_message(&mut "fast".to_string()).unwrap();
    assert_eq!(client.view().pending().in_flight(), 2);

    fast.await.unwrap();
    assert!(client.view().pending().is_visible());

    slow.await.unwrap();
    assert!(!client.view().pending().is_visible());

    // replies land in arrival order, not send order
    assert_eq!(
        texts(&client),
        vec![
            (Sender::User, "slow".to_string()),
            (Sender::User, "fast".to_string()),
            (Sender::Bot, "fast reply".to_string()),
            (Sender::Bot, "slow reply".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_poll_renders_results_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["a", "b"] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.poll_once().await;

    assert_eq!(
        texts(&client),
        vec![(Sender::Bot, "a".to_string()), (Sender::Bot, "b".to_string())]
    );
}

#[tokio::test]
async fn test_poll_empty_or_failed_renders_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.poll_once().await;
    client.poll_once().await;

    assert!(client.view().is_empty());
    assert_eq!(requests_to(&server, "/scheduler/results").await, 2);
}

#[tokio::test]
async fn test_start_polling_twice_keeps_one_timer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let period = Duration::from_millis(200);
    let client = ChatClient::with_poll_interval(ChatApi::new(&server.uri()), period);
    assert!(client.start_polling());
    assert!(!client.start_polling());
    assert!(client.is_polling());

    // ticks at 200, 400 and 600ms; a second timer would double that
    tokio::time::sleep(Duration::from_millis(700)).await;
    let polled = requests_to(&server, "/scheduler/results").await;
    assert!((1..=3).contains(&polled), "polled {} times", polled);

    assert!(client.stop_polling());
    assert!(!client.stop_polling());
    assert!(!client.is_polling());

    let after_stop = requests_to(&server, "/scheduler/results").await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(requests_to(&server, "/scheduler/results").await, after_stop);
}

#[tokio::test]
async fn test_polling_survives_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["done"] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = ChatClient::with_poll_interval(ChatApi::new(&server.uri()), Duration::from_millis(50));
    client.start_polling();
    tokio::time::sleep(Duration::from_millis(400)).await;
    client.stop_polling();

    assert_eq!(texts(&client), vec![(Sender::Bot, "done".to_string())]);
}

#[tokio::test]
async fn test_history_is_append_only_across_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": "reply" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scheduler/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": ["job"] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut seen = Vec::new();

    client.send_message(&mut "one".to_string()).unwrap().await.unwrap();
    seen.extend(texts(&client));

    client.poll_once().await;
    let now = texts(&client);
    assert_eq!(&now[..seen.len()], &seen[..]);
    seen = now;

    client.send_message(&mut "   ".to_string());
    client.send_message(&mut "two".to_string()).unwrap().await.unwrap();
    let now = texts(&client);
    assert_eq!(&now[..seen.len()], &seen[..]);

    let expected: Vec<(Sender, String)> = vec![
        (Sender::User, "one".to_string()),
        (Sender::Bot, "reply".to_string()),
        (Sender::Bot, "job".to_string()),
        (Sender::User, "two".to_string()),
        (Sender::Bot, "reply".to_string()),
    ];
    assert_eq!(now, expected);
}
