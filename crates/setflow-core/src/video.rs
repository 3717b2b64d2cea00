//! Video guidance lookup.
//!
//! Resolving an exercise name to a demo video is asynchronous and must
//! never stall a running session: callers race the lookup against a
//! bounded timeout via [`lookup_or_none`] and fall back to a "no video"
//! state on timeout or failure. A missing video is a normal outcome, not
//! an error.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VideoError;

/// Bound on how long a session will wait for a video before going on
/// without one.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub title: String,
    pub url: String,
}

pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<VideoRef>, VideoError>> + Send + 'a>>;

/// Injected collaborator that resolves an exercise name to an optional
/// video reference.
pub trait VideoLookup: Send + Sync {
    fn lookup<'a>(&'a self, exercise: &'a str) -> LookupFuture<'a>;
}

/// Race a lookup against `timeout`. Timeouts and lookup failures both
/// degrade to `None`.
pub async fn lookup_or_none(
    service: &dyn VideoLookup,
    exercise: &str,
    timeout: Duration,
) -> Option<VideoRef> {
    match tokio::time::timeout(timeout, service.lookup(exercise)).await {
        Ok(Ok(video)) => video,
        Ok(Err(_)) | Err(_) => None,
    }
}

/// HTTP client for a video directory service.
///
/// Queries `GET {base_url}/videos?exercise=<name>`; a 404 means the
/// directory has no video for that exercise.
pub struct VideoDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl VideoDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, exercise: &str) -> Result<Option<VideoRef>, VideoError> {
        let url = format!("{}/videos", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .get(&url)
            .query(&[("exercise", exercise)])
            .send()
            .await
            .map_err(|e| VideoError::Request(e.to_string()))?;

        match resp.status().as_u16() {
            200 => {
                let video = resp
                    .json::<VideoRef>()
                    .await
                    .map_err(|e| VideoError::Request(e.to_string()))?;
                Ok(Some(video))
            }
            404 => Ok(None),
            status => Err(VideoError::Status { status }),
        }
    }
}

impl VideoLookup for VideoDirectory {
    fn lookup<'a>(&'a self, exercise: &'a str) -> LookupFuture<'a> {
        Box::pin(self.fetch(exercise))
    }
}

/// Lookup that always reports no video; used when no directory is
/// configured.
pub struct NoVideo;

impl VideoLookup for NoVideo {
    fn lookup<'a>(&'a self, _exercise: &'a str) -> LookupFuture<'a> {
        Box::pin(async { Ok(None) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowLookup;

    impl VideoLookup for SlowLookup {
        fn lookup<'a>(&'a self, _exercise: &'a str) -> LookupFuture<'a> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Some(VideoRef {
                    title: "never delivered".into(),
                    url: "http://example.invalid".into(),
                }))
            })
        }
    }

    #[tokio::test]
    async fn directory_hit_returns_video() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/videos")
            .match_query(mockito::Matcher::UrlEncoded(
                "exercise".into(),
                "Squat".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"title": "Squat form guide", "url": "https://videos.example/squat"}"#)
            .create_async()
            .await;

        let dir = VideoDirectory::new(server.url());
        let video = dir.lookup("Squat").await.unwrap();
        assert_eq!(
            video,
            Some(VideoRef {
                title: "Squat form guide".into(),
                url: "https://videos.example/squat".into(),
            })
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn directory_miss_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/videos")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let dir = VideoDirectory::new(server.url());
        assert_eq!(dir.lookup("Obscure Move").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_surfaces_as_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/videos")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let dir = VideoDirectory::new(server.url());
        assert!(matches!(
            dir.lookup("Squat").await,
            Err(VideoError::Status { status: 500 })
        ));
    }

    #[tokio::test]
    async fn slow_lookup_degrades_to_no_video() {
        let video = lookup_or_none(&SlowLookup, "Squat", Duration::from_millis(50)).await;
        assert_eq!(video, None);
    }

    #[tokio::test]
    async fn no_video_fallback_always_none() {
        let video = lookup_or_none(&NoVideo, "Squat", Duration::from_secs(2)).await;
        assert_eq!(video, None);
    }
}
