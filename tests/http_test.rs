//! HTTP front end tests against a live listener

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tabconvert::server::router;
use tabconvert::Dispatcher;

async fn spawn_server(max_upload_bytes: usize) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(Dispatcher::new()), max_upload_bytes);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn upload(name: &str, content: &[u8], target: &str) -> Form {
    Form::new()
        .part("file", Part::bytes(content.to_vec()).file_name(name.to_string()))
        .text("targetFormat", target.to_string())
}

async fn post_convert(base: &str, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/convert", base))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_list_formats() {
    let base = spawn_server(1024 * 1024).await;

    let response = reqwest::get(format!("{}/formats", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let formats: Vec<String> = response.json().await.unwrap();
    assert_eq!(formats.len(), 12);
    assert_eq!(formats.first().map(String::as_str), Some("csv-to-excel"));
    assert!(formats.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_convert_csv_to_json() {
    let base = spawn_server(1024 * 1024).await;

    let form = upload("data.csv", b"a,b\n1,x\n2,y\n", "csv-to-json");
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(
        headers["content-disposition"],
        "attachment; filename=\"data.json\""
    );
    assert_eq!(headers["x-record-count"], "2");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!([{"a": "1", "b": "x"}, {"a": "2", "b": "y"}])
    );
}

#[tokio::test]
async fn test_options_field_is_accepted() {
    let base = spawn_server(1024 * 1024).await;

    let form = upload("data.json", br#"[{"a":1}]"#, "JSON-to-CSV")
        .text("options", r#"{"delimiter":";"}"#);
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "a\r\n1\r\n");

    let form = upload("data.json", br#"[{"a":1}]"#, "json-to-csv").text("options", "not json");
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_file() {
    let base = spawn_server(1024 * 1024).await;

    let form = Form::new().text("targetFormat", "csv-to-json");
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "No file uploaded");
}

#[tokio::test]
async fn test_missing_target_format() {
    let base = spawn_server(1024 * 1024).await;

    let form = Form::new().part("file", Part::bytes(b"a\n1\n".to_vec()).file_name("a.csv"));
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Target format is required");
}

#[tokio::test]
async fn test_unsupported_format() {
    let base = spawn_server(1024 * 1024).await;

    let response = post_convert(&base, upload("a.csv", b"a\n1\n", "csv-to-yaml")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("csv-to-yaml"));
}

#[tokio::test]
async fn test_decode_failure() {
    let base = spawn_server(1024 * 1024).await;

    let form = upload("bad.xlsx", b"not a workbook", "excel-to-csv");
    let response = post_convert(&base, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_limit() {
    let base = spawn_server(64).await;

    let big = vec![b'x'; 4096];
    let response = post_convert(&base, upload("big.csv", &big, "csv-to-json")).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
