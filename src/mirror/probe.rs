use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Existence check for one segment on one mirror.
///
/// The answer is a plain boolean: a mirror that is down and a mirror that
/// lacks the segment look the same to the resolver.
#[async_trait]
pub trait SegmentProbe: Send + Sync {
    /// Whether `url` currently answers with a success status.
    async fn has_segment(&self, url: &str) -> bool;
}

/// Probe that issues a bodiless `HEAD` request.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl SegmentProbe for HttpProbe {
    async fn has_segment(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(%url, %status, "probe");
                status.is_success()
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!(%url, "probe timed out");
                false
            }
            Err(e) => {
                tracing::debug!(%url, error = %e, "probe transport error");
                false
            }
        }
    }
}

/// URL of a segment on a mirror: `<mirror>/<hash>.<ext>`.
pub fn segment_url(mirror: &str, hash: &str, extension: &str) -> String {
    let base = mirror.trim_end_matches('/');
    if extension.is_empty() {
        format!("{base}/{hash}")
    } else {
        format!("{base}/{hash}.{extension}")
    }
}
