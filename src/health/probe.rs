// ABOUTME: One-shot HTTP/1.1 GET probe built on a hyper client connection.
// ABOUTME: Connection errors and timeouts collapse into status 000.

use async_trait::async_trait;
use http_body_util::Empty;
use hyper::Uri;
use hyper_util::rt::TokioIo;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;

/// Status reported when no HTTP response arrived.
pub const NO_RESPONSE: u16 = 0;

/// Issues a single GET and reports the status code.
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Status of one request, or [`NO_RESPONSE`].
    async fn probe(&self, url: &str) -> u16;
}

#[derive(Debug, Error)]
enum ProbeError {
    /// Carries only the reason; the URL may embed the target host.
    #[error("invalid URL: {0}")]
    InvalidUrl(&'static str),

    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("failed to build request: {0}")]
    Request(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Plain-HTTP probe with a per-request timeout. Redirects are not followed.
#[derive(Debug, Clone)]
pub struct HyperProbe {
    timeout: Duration,
}

impl HyperProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn get(&self, url: &str) -> Result<u16, ProbeError> {
        match tokio::time::timeout(self.timeout, get_status(url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl HttpProbe for HyperProbe {
    async fn probe(&self, url: &str) -> u16 {
        match self.get(url).await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("health probe got no response: {}", e);
                NO_RESPONSE
            }
        }
    }
}

async fn get_status(url: &str) -> Result<u16, ProbeError> {
    let uri: Uri = url
        .parse()
        .map_err(|_| ProbeError::InvalidUrl("unparsable"))?;
    if uri.scheme_str() != Some("http") {
        return Err(ProbeError::InvalidUrl("only http:// is supported"));
    }
    let host = uri
        .host()
        .ok_or(ProbeError::InvalidUrl("missing host"))?;
    let port = uri.port_u16().unwrap_or(80);
    let authority = uri
        .authority()
        .map(|a| a.as_str().to_string())
        .unwrap_or_else(|| host.to_string());
    let path = uri
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    let stream = TcpStream::connect((host.trim_matches(['[', ']']), port)).await?;
    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!("health probe connection error: {}", e);
        }
    });

    let req = hyper::Request::builder()
        .method("GET")
        .uri(path)
        .header("Host", authority)
        .header("User-Agent", concat!("caravel/", env!("CARGO_PKG_VERSION")))
        .body(Empty::<bytes::Bytes>::new())
        .map_err(|e| ProbeError::Request(e.to_string()))?;

    let resp = sender.send_request(req).await?;
    Ok(resp.status().as_u16())
}
