use anyhow::Result;
use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use relay_client::{
    ClientConfig, InvokeError, MAX_FILE_SIZE, RelayClient, SelectedFile, ValidationError,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

// Fake relay: echoes the image back, fails on `fail`, is slow on `slow`.
async fn spawn_relay(hits: Arc<AtomicUsize>) -> Result<RelayClient> {
    let router = Router::new().route(
        "/remove-bg",
        post(move |Json(body): Json<serde_json::Value>| {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);

                let image = body["image"].as_str().unwrap_or_default().to_string();
                let bytes = data_url::decode(&image).unwrap_or_default();

                match bytes.as_slice() {
                    b"fail" => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({ "error": "Invalid API key" })),
                    )
                        .into_response(),
                    b"garbage" => (StatusCode::OK, "not json").into_response(),
                    slow => {
                        if slow == b"slow" {
                            tokio::time::sleep(Duration::from_millis(300)).await;
                        }
                        let result_url = data_url::encode(slow, "image/png");
                        Json(serde_json::json!({ "resultUrl": result_url })).into_response()
                    }
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        _ = axum::serve(listener, router).await;
    });

    let config = ClientConfig::default()
        .with_relay_url(format!("http://{addr}/remove-bg"))
        .with_timeout(Duration::from_secs(5));
    Ok(RelayClient::new(config)?)
}

fn image(bytes: &[u8]) -> SelectedFile {
    SelectedFile::new("photo.png", "image/png", bytes.to_vec())
}

#[tokio::test]
async fn test_remove_background_success() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = spawn_relay(hits.clone()).await?;

    let file = image(b"original");
    let result = client.remove_background(&file).await?;

    assert_eq!(result.processed_bytes()?, b"original");
    assert_eq!(data_url::decode(&result.original_url)?, b"original");
    assert!(result.original_url.starts_with("data:image/png;base64,"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_non_image_never_reaches_relay() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = spawn_relay(hits.clone()).await?;

    let file = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = client.remove_background(&file).await.unwrap_err();

    assert!(matches!(
        err,
        InvokeError::Validation(ValidationError::NotAnImage(_))
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_oversized_image_never_reaches_relay() -> Result<()> {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = spawn_relay(hits.clone()).await?;

    let file = SelectedFile::new("huge.jpg", "image/jpeg", vec![0; 11 * 1024 * 1024]);
    let err = client.remove_background(&file).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.user_message(), "Please select an image under 10MB");
    assert!(file.size() > MAX_FILE_SIZE);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_relay_error_is_normalized() -> Result<()> {
    let client = spawn_relay(Arc::new(AtomicUsize::new(0))).await?;

    let err = client.remove_background(&image(b"fail")).await.unwrap_err();
    assert!(matches!(err, InvokeError::Relay { status: 500, .. }));
    assert_eq!(err.user_message(), "Invalid API key");

    let err = client.remove_background(&image(b"garbage")).await.unwrap_err();
    assert!(matches!(err, InvokeError::InvalidResponse(_)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_relay_is_transport_error() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = ClientConfig::default().with_relay_url(format!("http://{addr}/remove-bg"));
    let client = RelayClient::new(config)?;

    let err = client.remove_background(&image(b"x")).await.unwrap_err();
    assert!(matches!(err, InvokeError::Transport(_)));
    assert!(!err.user_message().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stale_response_is_discarded() -> Result<()> {
    let client = spawn_relay(Arc::new(AtomicUsize::new(0))).await?;

    let slow = image(b"slow");
    let fast = image(b"fast");

    let first = client.remove_background(&slow);
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.remove_background(&fast).await
    };

    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, Err(InvokeError::Superseded)));
    assert_eq!(second?.processed_bytes()?, b"fast");
    Ok(())
}

#[test]
fn test_from_path_sniffs_mime() -> Result<()> {
    let dir = tempfile::tempdir()?;

    let png = dir.path().join("picture.bin");
    std::fs::write(&png, PNG_MAGIC)?;
    let file = SelectedFile::from_path(&png)?;
    assert_eq!(file.mime, "image/png");
    assert_eq!(file.name, "picture.bin");
    assert!(file.validate().is_ok());

    let text = dir.path().join("notes.png");
    std::fs::write(&text, "just text")?;
    let file = SelectedFile::from_path(&text)?;
    assert_eq!(file.mime, "application/octet-stream");
    assert!(file.validate().is_err());
    Ok(())
}
