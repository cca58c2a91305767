// Integration tests for one-shot and instance execution modes

use courier::debug::{DEBUG_CONFIG, DEBUG_RESPONSE};
use courier::{ErrorKind, ExportSink, Exports, Executor, Reply, RequestConfig, SignConfig};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_modes_return_equal_replies() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/acme/widgets/issues")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("state".into(), "open".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "title": "Broken build"}]"#)
        .expect(2)
        .create_async()
        .await;

    let executor = Executor::new();

    let one_shot = executor
        .execute(
            None,
            RequestConfig::get("/repos/acme/widgets/issues?state=open")
                .base_url(server.url())
                .header("Accept", "application/json")
                .param("per_page", 10),
            None,
        )
        .await
        .unwrap();

    let instance = executor.create(
        RequestConfig::default()
            .base_url(server.url())
            .header("Accept", "application/json")
            .param("per_page", 10),
        None,
        None,
    );
    let through_instance = instance
        .get("/repos/acme/widgets/issues?state=open")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(one_shot, through_instance);
    assert!(matches!(one_shot, Reply::Guarded(_)));
}

#[tokio::test]
async fn test_instance_signs_every_call() {
    let mut server = Server::new_async().await;
    let signer = server
        .mock("POST", "/sign")
        .match_body(Matcher::PartialJson(json!({"token": "secret"})))
        .with_status(200)
        .with_body("OAuth signed")
        .expect(2)
        .create_async()
        .await;
    let api = server
        .mock("POST", "/statuses/update.json")
        .match_header("authorization", "OAuth signed")
        .with_status(200)
        .with_body(r#"{"id": 42}"#)
        .expect(2)
        .create_async()
        .await;

    let sign_config = SignConfig {
        oauth_signer_uri: format!("{}/sign", server.url()),
        token: json!("secret"),
    };
    let instance = Executor::new().create(
        RequestConfig::default().base_url(server.url()),
        Some(sign_config),
        None,
    );

    for text in ["first", "second"] {
        let reply = instance
            .post("/statuses/update.json", json!({ "status": text }))
            .await
            .unwrap();
        assert_eq!(reply.get("id").unwrap(), Some(&json!(42)));
    }

    signer.assert_async().await;
    api.assert_async().await;
}

#[tokio::test]
async fn test_instance_rejects_body() {
    let mut server = Server::new_async().await;
    let api = server
        .mock("POST", "/items")
        .expect(0)
        .create_async()
        .await;

    let instance = Executor::new().create(RequestConfig::default().base_url(server.url()), None, None);
    let mut config = RequestConfig::post("/items");
    config.body = Some(json!("payload"));

    let err = instance.request(config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    api.assert_async().await;
}

#[tokio::test]
async fn test_instance_translates_failures() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/items")
        .with_status(422)
        .with_body(r#"{"errors": ["invalid"]}"#)
        .create_async()
        .await;

    let instance = Executor::new().create(RequestConfig::default().base_url(server.url()), None, None);
    let err = instance.get("/items").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Response);
    assert_eq!(err.response().unwrap().status, 422);
    assert!(err.to_string().ends_with(r#"{"errors":["invalid"]}"#));
}

#[tokio::test]
async fn test_instance_exports_to_shared_sink() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/items")
        .with_status(200)
        .with_body(r#"{"count": 3}"#)
        .create_async()
        .await;

    let exports = Arc::new(Exports::new());
    let sink: Arc<dyn ExportSink> = exports.clone();
    let instance = Executor::new().create(
        RequestConfig::default().base_url(server.url()),
        None,
        Some(sink),
    );

    instance
        .request(RequestConfig::get("/items").debug(true))
        .await
        .unwrap();

    assert_eq!(exports.get(DEBUG_CONFIG).unwrap()["url"], "/items");
    assert_eq!(exports.get(DEBUG_RESPONSE), Some(json!({"count": 3})));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for id in 0..5 {
        mocks.push(
            server
                .mock("GET", format!("/items/{}", id).as_str())
                .with_status(200)
                .with_body(json!({ "id": id }).to_string())
                .create_async()
                .await,
        );
    }

    let instance = Executor::new().create(RequestConfig::default().base_url(server.url()), None, None);
    let calls = (0..5).map(|id| {
        let instance = instance.clone();
        tokio::spawn(async move { instance.get(format!("/items/{}", id)).await })
    });

    let results = futures::future::join_all(calls).await;
    for (id, result) in results.into_iter().enumerate() {
        let reply = result.unwrap().unwrap();
        assert_eq!(reply.get("id").unwrap(), Some(&json!(id)));
    }
    for mock in mocks {
        mock.assert_async().await;
    }
}
