//! HTTP-level tests for the workspace API client.

use serde_json::json;
use slackline_client::{ConversationType, Error, ListConversationsQuery, SlackClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SlackClient {
    SlackClient::builder()
        .api_url(format!("{}/api/", server.uri()))
        .token("xoxp-test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_auth_test_decodes_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .and(header("authorization", "Bearer xoxp-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "url": "https://acme.slack.com/",
            "team": "Acme",
            "user": "alice",
            "team_id": "T1",
            "user_id": "U1",
            "enterprise_id": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let identity = client_for(&server).auth().test().await.unwrap();
    assert_eq!(identity.team_id, "T1");
    assert_eq!(identity.user_id, "U1");
    assert_eq!(identity.enterprise_id, None);
    assert_eq!(identity.bot_id, None);
}

#[tokio::test]
async fn test_remote_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_auth"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).auth().test().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(matches!(err, Error::Api { ref error, .. } if error == "invalid_auth"));
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users.list"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = client_for(&server).users().list(None).await.unwrap_err();
    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after: Some(7),
            ..
        }
    ));
}

#[tokio::test]
async fn test_users_list_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users.list"))
        .and(query_param("limit", "1000"))
        .and(query_param("cursor", "next-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "members": [{"id": "U2", "name": "bob"}],
            "response_metadata": {"next_cursor": ""}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users.list"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "members": [{"id": "U1", "name": "alice", "profile": {"email": "a@example.com"}}],
            "response_metadata": {"next_cursor": "next-1"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let first = client.users().list(None).await.unwrap();
    assert_eq!(first.items[0].profile.email, "a@example.com");
    assert_eq!(first.next_cursor.as_deref(), Some("next-1"));

    let second = client.users().list(Some("next-1")).await.unwrap();
    assert_eq!(second.items[0].name, "bob");
    assert_eq!(second.next_cursor, None);
}

#[tokio::test]
async fn test_conversations_list_sends_type_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/conversations.list"))
        .and(query_param("types", "mpim,im,public_channel,private_channel"))
        .and(query_param("exclude_archived", "true"))
        .and(query_param("limit", "999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "channels": [
                {"id": "C1", "name": "general", "name_normalized": "general", "num_members": 12},
                {"id": "D1", "is_im": true, "user": "U2"}
            ],
            "response_metadata": {"next_cursor": ""}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .conversations()
        .list(&ListConversationsQuery::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].num_members, 12);
    assert!(page.items[1].is_im);
    assert_eq!(page.next_cursor, None);
    assert_eq!(
        ListConversationsQuery::default().types,
        ConversationType::ALL.to_vec()
    );
}

#[tokio::test]
async fn test_edge_conversations_merge_channels_and_ims() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/client.userBoot"))
        .and(header("cookie", "d=xoxd-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "channels": [{"id": "C1", "name": "general", "is_archived": true}],
            "ims": [{"id": "D1", "is_im": true, "user": "U2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SlackClient::builder()
        .token("xoxc-test")
        .cookie("xoxd-secret")
        .build()
        .unwrap();
    let edge = client.rebased(&server.uri()).unwrap();

    let all = edge.edge().conversations().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].is_archived);
    assert_eq!(all[1].user, "U2");
}

#[tokio::test]
async fn test_custom_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .and(header("user-agent", "slackline-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SlackClient::builder()
        .api_url(format!("{}/api/", server.uri()))
        .token("xoxb-test")
        .user_agent("slackline-test/1.0")
        .build()
        .unwrap();

    client.auth().test().await.unwrap();
}
