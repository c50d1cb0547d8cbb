use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dataup_blob::{
    bytes_stream, BlobHandle, BlobId, BlobResult, BlobStore, ByteStream, MemoryBlobStore,
    OpenedBlob,
};
use dataup_core::{
    DataupError, ErrorKind, NetworkOrigin, StatusTracker, VideoRecord, VideoRegistry,
    VideoService, VideoState,
};
use futures::StreamExt;

/// Memory store that counts how often it is written to.
#[derive(Default)]
struct CountingStore {
    inner: MemoryBlobStore,
    puts: AtomicUsize,
}

#[async_trait]
impl BlobStore for CountingStore {
    async fn put(&self, id: BlobId, stream: ByteStream) -> BlobResult<BlobHandle> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(id, stream).await
    }

    async fn get(&self, id: BlobId) -> BlobResult<Option<BlobHandle>> {
        self.inner.get(id).await
    }

    async fn open(&self, handle: &BlobHandle) -> BlobResult<OpenedBlob> {
        self.inner.open(handle).await
    }
}

fn origin() -> NetworkOrigin {
    NetworkOrigin::new("host", 8080)
}

fn kind_of(err: &anyhow::Error) -> ErrorKind {
    DataupError::from_anyhow(err).expect("DataupError").kind
}

async fn read_all(mut stream: ByteStream) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(chunk) = stream.next().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    out
}

#[tokio::test]
async fn save_upload_download_scenario() {
    let blobs = Arc::new(CountingStore::default());
    let statuses = Arc::new(StatusTracker::new());
    let service = VideoService::from_parts(
        VideoRegistry::in_memory(),
        Arc::clone(&statuses),
        blobs.clone(),
    );

    let saved = service.save(VideoRecord::new("A"), &origin()).await.unwrap();
    assert_eq!(saved.id, 1);
    assert_eq!(saved.data_url.as_deref(), Some("http://host:8080/video/1/data"));

    let payload: Vec<u8> = (0..1024u32).map(|i| (i * 7 % 256) as u8).collect();
    let status = service.upload(1, bytes_stream(payload.clone())).await.unwrap();
    assert_eq!(status.state, VideoState::Ready);
    assert_eq!(service.status(1).await.unwrap().state, VideoState::Ready);

    let download = service.download(1).await.unwrap();
    assert_eq!(download.content_length(), 1024);
    assert_eq!(read_all(download.blob.stream).await, payload);

    let missing = service.download(2).await.unwrap_err();
    assert_eq!(kind_of(&missing), ErrorKind::NotFound);

    let puts_before = blobs.puts.load(Ordering::SeqCst);
    let unknown = service.upload(99, bytes_stream(&b"nope"[..])).await.unwrap_err();
    assert_eq!(kind_of(&unknown), ErrorKind::NotFound);
    assert!(statuses.get(99).is_none());
    assert_eq!(blobs.puts.load(Ordering::SeqCst), puts_before);
}

#[tokio::test]
async fn ids_below_minimum_are_not_found() {
    let service = VideoService::in_memory();
    service.save(VideoRecord::new("A"), &origin()).await.unwrap();

    for id in [0, -1] {
        let err = service.upload(id, bytes_stream(&b"x"[..])).await.unwrap_err();
        assert_eq!(kind_of(&err), ErrorKind::NotFound);
        assert!(service.statuses().get(id).is_none());
    }
}

#[tokio::test]
async fn download_before_upload_is_not_found() {
    let service = VideoService::in_memory();
    service.save(VideoRecord::new("A"), &origin()).await.unwrap();

    let err = service.download(1).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::NotFound);

    let err = service.status(1).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn broken_upload_marks_failed_and_stores_nothing() {
    let service = VideoService::in_memory();
    service.save(VideoRecord::new("A"), &origin()).await.unwrap();

    let broken: ByteStream = Box::pin(futures::stream::iter(vec![
        Ok(Bytes::from_static(b"half")),
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stream cut")),
    ]));

    let err = service.upload(1, broken).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::GeneralError);

    let status = service.status(1).await.unwrap();
    assert_eq!(status.state, VideoState::Failed);
    assert!(status.reason.unwrap().contains("stream cut"));

    let err = service.download(1).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::NotFound);

    // a retry goes through the normal lifecycle again
    let status = service.upload(1, bytes_stream(&b"whole"[..])).await.unwrap();
    assert_eq!(status.state, VideoState::Ready);
}

#[tokio::test]
async fn download_carries_the_record_content_type() {
    let service = VideoService::in_memory();
    service
        .save(VideoRecord::new("A").with_content_type("video/mp4"), &origin())
        .await
        .unwrap();
    service.upload(1, bytes_stream(&b"mp4"[..])).await.unwrap();

    let download = service.download(1).await.unwrap();
    assert_eq!(download.id, 1);
    assert_eq!(download.content_type.as_deref(), Some("video/mp4"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_get_unique_ids() {
    let service = VideoService::in_memory();

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .save(VideoRecord::new(format!("video-{i}")), &origin())
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        assert!(ids.insert(task.await.unwrap()), "duplicate id");
    }

    assert_eq!(ids.len(), 64);
    assert_eq!(*ids.iter().min().unwrap(), 1);
    assert_eq!(service.list().await.unwrap().len(), 64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_uploads_to_different_ids_all_complete() {
    let service = VideoService::in_memory();
    for i in 0..8 {
        service.save(VideoRecord::new(format!("v{i}")), &origin()).await.unwrap();
    }

    let tasks: Vec<_> = (1..=8i64)
        .map(|id| {
            let service = service.clone();
            tokio::spawn(async move {
                let payload = vec![id as u8; 256 * id as usize];
                service.upload(id, bytes_stream(payload)).await.unwrap()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().state, VideoState::Ready);
    }

    for id in 1..=8i64 {
        let download = service.download(id).await.unwrap();
        assert_eq!(download.content_length(), 256 * id as u64);
    }
}

#[tokio::test]
async fn failed_replace_keeps_previous_payload_ready() {
    let service = VideoService::in_memory();
    service.save(VideoRecord::new("A"), &origin()).await.unwrap();
    service.upload(1, bytes_stream(&b"good"[..])).await.unwrap();

    let broken: ByteStream = Box::pin(futures::stream::iter(vec![
        Ok(Bytes::from_static(b"ba")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
    ]));
    let err = service.upload(1, broken).await.unwrap_err();
    assert_eq!(kind_of(&err), ErrorKind::GeneralError);

    assert_eq!(service.status(1).await.unwrap().state, VideoState::Ready);
    let download = service.download(1).await.unwrap();
    assert_eq!(read_all(download.blob.stream).await, b"good");
}
