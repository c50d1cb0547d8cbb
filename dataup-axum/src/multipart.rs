use std::io;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use dataup_blob::ByteStream;
use dataup_core::DataupError;
use futures::StreamExt;
use serde_json::json;

/// Multipart part carrying the video payload.
pub const UPLOAD_FIELD: &str = "data";

fn malformed(err: multer::Error) -> DataupError {
    DataupError::bad_request("Failed to parse multipart body")
        .with_data(json!({"_schema": [err.to_string()]}))
}

/// Stream the contents of the multipart part named `field_name`.
///
/// The body is consumed lazily: parts before `field_name` are skipped, and
/// the returned stream pulls the payload straight off the connection. A
/// body that ends mid-part surfaces as an error on the stream.
pub async fn field_stream(
    headers: &HeaderMap,
    body: Body,
    field_name: &str,
) -> Result<ByteStream, DataupError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let boundary = multer::parse_boundary(content_type).map_err(|e| {
        DataupError::bad_request("Expected a multipart/form-data body")
            .with_data(json!({"_schema": [e.to_string()]}))
    })?;

    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() == Some(field_name) {
            tracing::debug!(
                field = field_name,
                filename = field.file_name().unwrap_or_default(),
                content_type = ?field.content_type(),
                "Streaming multipart field"
            );
            let stream = field.map(|chunk| {
                chunk.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            });
            return Ok(Box::pin(stream));
        }
    }

    Err(DataupError::bad_request(format!(
        "Missing multipart field '{}'",
        field_name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=X-BOUNDARY"),
        );
        headers
    }

    fn part(name: &str, data: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"v.mpeg\"\r\nContent-Type: video/mpeg\r\n\r\n{data}\r\n"
        )
    }

    async fn collect(mut stream: ByteStream) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn picks_the_named_part() {
        let body = format!("{}{}--{BOUNDARY}--\r\n", part("other", "skip me"), part("data", "payload"));

        let stream = field_stream(&headers(), Body::from(body), UPLOAD_FIELD).await.unwrap();
        assert_eq!(collect(stream).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn missing_part_is_bad_request() {
        let body = format!("{}--{BOUNDARY}--\r\n", part("other", "x"));

        let err = field_stream(&headers(), Body::from(body), UPLOAD_FIELD).await.err().unwrap();
        assert_eq!(err.code(), 400);
        assert!(err.message.contains("'data'"));
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let err = field_stream(&headers, Body::from("{}"), UPLOAD_FIELD).await.err().unwrap();
        assert_eq!(err.code(), 400);
    }

    #[tokio::test]
    async fn truncated_body_errors_instead_of_truncating() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\nhalf of the pay"
        );

        let stream = field_stream(&headers(), Body::from(body), UPLOAD_FIELD).await.unwrap();
        assert!(collect(stream).await.is_err());
    }
}
