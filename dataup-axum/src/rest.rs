use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    extract::{OriginalUri, Path, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dataup_core::{DataupError, VideoId, VideoRecord, VideoStatus};
use serde_json::json;

use crate::{multipart, origin::request_origin, DataupAxumError, DataupAxumState};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn map_json_rejection(rejection: JsonRejection) -> DataupAxumError {
    DataupError::bad_request("Failed to parse the request body as JSON")
        .with_data(json!({"_schema": [rejection.to_string()]}))
        .into()
}

/// Ids that do not parse can never name a video.
fn parse_id(raw: &str) -> Result<VideoId, DataupAxumError> {
    raw.parse::<VideoId>()
        .map_err(|_| DataupError::not_found(format!("Video {} not found", raw)).into())
}

pub fn video_router(state: DataupAxumState) -> Router<()> {
    Router::new()
        .route("/video", get(list_videos).post(save_video))
        .route("/video/{id}/data", get(download_video).post(upload_video))
        .route("/video/{id}/status", get(video_status))
        .with_state(state)
}

async fn list_videos(
    State(state): State<DataupAxumState>,
) -> Result<Json<Vec<VideoRecord>>, DataupAxumError> {
    let videos = state.service.list().await?;
    Ok(Json(videos))
}

async fn save_video(
    State(state): State<DataupAxumState>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    data: Result<Json<VideoRecord>, JsonRejection>,
) -> Result<Json<VideoRecord>, DataupAxumError> {
    let Json(record) = data.map_err(map_json_rejection)?;
    let origin = request_origin(&headers, &uri, &state.origin);

    let saved = state.service.save(record, &origin).await?;
    Ok(Json(saved))
}

async fn upload_video(
    State(state): State<DataupAxumState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<VideoStatus>, DataupAxumError> {
    let id = parse_id(&id)?;
    let stream = multipart::field_stream(&headers, body, multipart::UPLOAD_FIELD).await?;

    let status = state.service.upload(id, stream).await?;
    Ok(Json(status))
}

async fn download_video(
    State(state): State<DataupAxumState>,
    Path(id): Path<String>,
) -> Result<Response, DataupAxumError> {
    let id = parse_id(&id)?;
    let download = state.service.download(id).await?;

    let content_type = download
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    let content_length = HeaderValue::from(download.content_length());

    Ok((
        [(CONTENT_TYPE, content_type), (CONTENT_LENGTH, content_length)],
        Body::from_stream(download.blob.stream),
    )
        .into_response())
}

async fn video_status(
    State(state): State<DataupAxumState>,
    Path(id): Path<String>,
) -> Result<Json<VideoStatus>, DataupAxumError> {
    let id = parse_id(&id)?;
    let status = state.service.status(id).await?;
    Ok(Json(status))
}
