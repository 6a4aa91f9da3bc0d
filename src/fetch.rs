use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};

use crate::error::CollectError;

/// Crawler user agent sent with every page request
pub const CRAWLER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Create HTTP client. One attempt per request, transport default timeouts.
pub fn create_client(user_agent: &str) -> Result<Client, CollectError> {
    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(CollectError::Client)
}

/// GET a URL, failing on anything but `200 OK`
pub async fn fetch_url_raw(client: &Client, url: &str) -> Result<Response, CollectError> {
    tracing::debug!("Fetching URL: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CollectError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CollectError::Status {
            url: url.to_string(),
            status,
        });
    }

    Ok(response)
}

/// Fetch URL and return the body bytes
pub async fn fetch_url_bytes(client: &Client, url: &str) -> Result<Bytes, CollectError> {
    let response = fetch_url_raw(client, url).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|source| CollectError::Request {
            url: url.to_string(),
            source,
        })?;
    tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve a single canned HTTP response on localhost.
    ///
    /// Returns the URL to request and a receiver for the raw request text.
    pub(crate) async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}/page", addr), rx)
    }

    #[tokio::test]
    async fn test_fetch_sends_crawler_user_agent() {
        let (url, request) = serve_once("200 OK", "<html></html>").await;
        let client = create_client(CRAWLER_USER_AGENT).unwrap();

        let body = fetch_url_bytes(&client, &url).await.unwrap();
        assert_eq!(body.as_ref(), b"<html></html>");

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /page "));
        assert!(request.contains("user-agent: mozilla/5.0 (compatible; googlebot/2.1;"));
    }

    #[tokio::test]
    async fn test_non_200_is_error() {
        let (url, _request) = serve_once("404 Not Found", "missing").await;
        let client = create_client(CRAWLER_USER_AGENT).unwrap();

        let err = fetch_url_bytes(&client, &url).await.unwrap_err();
        match err {
            CollectError::Status { status, .. } => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_success_codes_rejected() {
        let (url, _request) = serve_once("204 No Content", "").await;
        let client = create_client(CRAWLER_USER_AGENT).unwrap();

        let err = fetch_url_bytes(&client, &url).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = create_client(CRAWLER_USER_AGENT).unwrap();
        let err = fetch_url_bytes(&client, &format!("http://{}/", addr)).await.unwrap_err();
        assert!(matches!(err, CollectError::Request { .. }));
    }
}
