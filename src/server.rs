//! HTTP front end
//!
//! - `GET /formats` returns the sorted list of supported format pairs.
//! - `POST /convert` takes a multipart form with `file`, `targetFormat` and an
//!   optional `options` JSON object, and answers with the converted bytes.
//!
//! Client mistakes and conversion failures come back as `400` with a plain
//! text reason; anything that escapes the converters becomes a generic `500`.

use crate::config::ServerConfig;
use crate::conversion::{ConversionRequest, ConvertedFile};
use crate::dispatcher::Dispatcher;
use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;

const RECORD_COUNT_HEADER: HeaderName = HeaderName::from_static("x-record-count");

/// Error responses produced by the handlers
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Multipart(MultipartError),
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Multipart(err) => (err.status(), err.body_text()).into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            )
                .into_response(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

/// Build the service router around a shared dispatcher
pub fn router(dispatcher: Arc<Dispatcher>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/formats", get(list_formats))
        .route("/convert", post(convert))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(dispatcher)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let dispatcher = Arc::new(Dispatcher::new().with_options(config.decode.options()));
    let app = router(dispatcher, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        max_upload_bytes = config.max_upload_bytes,
        "conversion service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("conversion service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}

async fn list_formats(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Vec<String>> {
    Json(dispatcher.list_supported_formats())
}

async fn convert(
    State(dispatcher): State<Arc<Dispatcher>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let request = read_request(multipart).await?;

    if request.content.is_empty() {
        tracing::warn!("rejected upload without a file");
        return Err(ApiError::BadRequest("No file uploaded".to_string()));
    }
    if request.target_format.trim().is_empty() {
        tracing::warn!(file = %request.file_name, "rejected upload without a target format");
        return Err(ApiError::BadRequest("Target format is required".to_string()));
    }

    let result = tokio::task::spawn_blocking(move || dispatcher.convert(&request))
        .await
        .map_err(|e| {
            tracing::error!("conversion task failed: {}", e);
            ApiError::Internal
        })?;

    match result {
        Ok(file) => {
            tracing::info!(
                file = %file.file_name,
                records = file.metadata.record_count,
                bytes = file.content.len(),
                "conversion finished"
            );
            Ok(file_response(file))
        }
        Err(e) => {
            tracing::warn!(kind = ?e.kind(), "conversion rejected: {}", e);
            Err(ApiError::BadRequest(e.to_string()))
        }
    }
}

async fn read_request(mut multipart: Multipart) -> Result<ConversionRequest, ApiError> {
    let mut file_name = String::new();
    let mut content = Bytes::new();
    let mut target_format = String::new();
    let mut options = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_string();
                content = field.bytes().await?;
            }
            "targetFormat" => target_format = field.text().await?,
            "options" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    options = serde_json::from_str::<HashMap<String, String>>(&text).map_err(
                        |e| ApiError::BadRequest(format!("Invalid options: {}", e)),
                    )?;
                }
            }
            _ => {}
        }
    }

    Ok(ConversionRequest {
        file_name,
        content,
        target_format,
        options,
    })
}

fn file_response(file: ConvertedFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&file.file_name)
    );

    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (RECORD_COUNT_HEADER, file.metadata.record_count.to_string()),
        ],
        file.content,
    )
        .into_response()
}

// Header values must be visible ASCII; quotes would end the filename early
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_safe_file_name() {
        assert_eq!(header_safe_file_name("report 1.csv"), "report 1.csv");
        assert_eq!(header_safe_file_name("a\"b.json"), "a_b.json");
        assert_eq!(header_safe_file_name("données.xlsx"), "donn_es.xlsx");
    }

    #[test]
    fn test_error_statuses() {
        let response = ApiError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
