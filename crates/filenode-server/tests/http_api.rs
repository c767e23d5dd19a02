use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use filenode_server::{routes, AppState, NodeConfig};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let mut config = NodeConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.auth_enabled = false;

    let state = Arc::new(AppState::new(config).unwrap());
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn block_json(cid: &str, data: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "cid": cid,
        "data_base64": BASE64.encode(data),
    })
}

#[tokio::test]
async fn health_check_responds_ok() {
    let base_url = spawn_server().await;
    let res = Client::new()
        .get(format!("{base_url}/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn add_then_get_roundtrips_over_http() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let data = b"hello over http";
    let cid = filenode_block::cid_utils::create_cid(data).to_string();

    let res = client
        .post(format!("{base_url}/v1/spaces/s1/files/f1/blocks"))
        .json(&serde_json::json!({ "blocks": [block_json(&cid, data)] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{base_url}/v1/blocks/{cid}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), data);
}

#[tokio::test]
async fn get_unknown_cid_is_404() {
    let base_url = spawn_server().await;
    let cid = filenode_block::cid_utils::create_cid(b"never uploaded").to_string();

    let res = Client::new()
        .get(format!("{base_url}/v1/blocks/{cid}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn space_info_reflects_bound_files() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let data = b"space info payload";
    let cid = filenode_block::cid_utils::create_cid(data).to_string();
    client
        .post(format!("{base_url}/v1/spaces/s2/files/f1/blocks"))
        .json(&serde_json::json!({ "blocks": [block_json(&cid, data)] }))
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{base_url}/v1/spaces/s2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["cid_count"], 1);
    assert_eq!(body["file_count"], 1);
}

#[tokio::test]
async fn wrong_hash_is_rejected_as_bad_request() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let real_cid = filenode_block::cid_utils::create_cid(b"real content").to_string();
    let res = client
        .post(format!("{base_url}/v1/spaces/s3/files/f1/blocks"))
        .json(&serde_json::json!({ "blocks": [block_json(&real_cid, b"not the real content")] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn files_delete_removes_binding() {
    let base_url = spawn_server().await;
    let client = Client::new();

    let data = b"deletable over http";
    let cid = filenode_block::cid_utils::create_cid(data).to_string();
    client
        .post(format!("{base_url}/v1/spaces/s4/files/f1/blocks"))
        .json(&serde_json::json!({ "blocks": [block_json(&cid, data)] }))
        .send()
        .await
        .unwrap();

    let res = client
        .delete(format!("{base_url}/v1/spaces/s4/files"))
        .json(&serde_json::json!({ "file_ids": ["f1"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{base_url}/v1/spaces/s4/files/f1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_bearer_token_is_forbidden_when_auth_enabled() {
    let mut config = NodeConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.auth_enabled = true;
    config.jwt_secret = Some("test-secret".to_string());

    let state = Arc::new(AppState::new(config).unwrap());
    let app = routes::create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let res = Client::new()
        .get(format!("http://{addr}/v1/spaces/s1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
