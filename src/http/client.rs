//! HTTP client that follows at most one redirect and streams bodies to a writer.

use log::debug;
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode, Url};
use std::io::Write;
use std::path::Path;

use crate::error::ShimError;

/// Release hosts answer with one redirect to their storage backend; a second
/// redirect is returned as-is and treated as a failure.
pub const MAX_REDIRECT_HOPS: usize = 1;

/// HTTP client for release downloads.
///
/// The wrapped reqwest Client must have automatic redirects disabled (see
/// `ShimConfig::http_client`) so the hop limit here is the only one in effect.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` on the first request only.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request, following a 301/302 response at most
    /// [`MAX_REDIRECT_HOPS`] times. The last response is returned whatever
    /// its status.
    #[tracing::instrument(skip(self))]
    pub async fn get_following_redirect(&self, url: &str) -> Result<Response, ShimError> {
        let mut current =
            Url::parse(url).map_err(|e| ShimError::download_failed(url, format!("invalid URL: {}", e)))?;
        let mut hops = 0;

        loop {
            let mut request = self.client.get(current.clone());
            if hops == 0 {
                if let Some(token) = &self.token {
                    request = request.bearer_auth(token);
                }
            }

            let response = request.send().await.map_err(|e| {
                ShimError::download_failed(current.as_str(), format!("{:#}", anyhow::Error::from(e)))
            })?;

            let status = response.status();
            if !is_followed_redirect(status) || hops >= MAX_REDIRECT_HOPS {
                return Ok(response);
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    ShimError::download_failed(
                        current.as_str(),
                        format!("HTTP {} without a usable Location header", status),
                    )
                })?;

            let next = current.join(location).map_err(|e| {
                ShimError::download_failed(current.as_str(), format!("invalid redirect target {:?}: {}", location, e))
            })?;

            debug!("Following {} redirect to {}", status.as_u16(), next);
            current = next;
            hops += 1;
        }
    }

    /// Downloads `url` into `writer`, returning the number of bytes written.
    ///
    /// Fails with `DownloadFailed` on transport errors or a non-2xx final
    /// status, and with `WriteFailed` (naming `dest`) when the writer fails.
    #[tracing::instrument(skip(self, writer))]
    pub async fn download_file<W: Write>(
        &self,
        url: &str,
        writer: &mut W,
        dest: &Path,
    ) -> Result<u64, ShimError> {
        debug!("Downloading file from {}...", url);

        let mut response = self.get_following_redirect(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShimError::download_failed(url, format!("HTTP status {}", status)));
        }

        let mut downloaded_bytes: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(|e| {
            ShimError::download_failed(url, format!("{:#}", anyhow::Error::from(e)))
        })? {
            writer
                .write_all(&chunk)
                .map_err(|e| ShimError::write_failed(dest, e))?;
            downloaded_bytes += chunk.len() as u64;
        }

        writer.flush().map_err(|e| ShimError::write_failed(dest, e))?;

        debug!(
            "Downloaded {:.2} MB",
            downloaded_bytes as f64 / (1024.0 * 1024.0)
        );

        Ok(downloaded_bytes)
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::redirect::Policy;

    fn client() -> HttpClient {
        HttpClient::new(Client::builder().redirect(Policy::none()).build().unwrap())
    }

    #[tokio::test]
    async fn test_download_file_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.bin")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        let mut buffer = Vec::new();
        let bytes = client()
            .download_file(&format!("{}/file.bin", url), &mut buffer, Path::new("file.bin"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 12); // "test content" is 12 bytes
        assert_eq!(buffer, b"test content");
    }

    #[tokio::test]
    async fn test_download_file_not_found() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.bin")
            .with_status(404)
            .create_async()
            .await;

        let mut buffer = Vec::new();
        let target = format!("{}/file.bin", url);
        let err = client()
            .download_file(&target, &mut buffer, Path::new("file.bin"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        match err {
            ShimError::DownloadFailed { url, cause } => {
                assert_eq!(url, target);
                assert!(cause.contains("404"), "{}", cause);
            }
            other => panic!("Expected DownloadFailed, got {:?}", other),
        }
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_follows_single_redirect() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let redirect = server
            .mock("GET", "/start")
            .with_status(302)
            .with_header("location", &format!("{}/storage/file.bin", url))
            .create_async()
            .await;
        let target = server
            .mock("GET", "/storage/file.bin")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        let mut buffer = Vec::new();
        client()
            .download_file(&format!("{}/start", url), &mut buffer, Path::new("file.bin"))
            .await
            .unwrap();

        redirect.assert_async().await;
        target.assert_async().await;
        assert_eq!(buffer, b"payload");
    }

    #[tokio::test]
    async fn test_follows_relative_moved_permanently() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _redirect = server
            .mock("GET", "/old/file.bin")
            .with_status(301)
            .with_header("location", "/new/file.bin")
            .create_async()
            .await;
        let target = server
            .mock("GET", "/new/file.bin")
            .with_status(200)
            .with_body("moved")
            .create_async()
            .await;

        let mut buffer = Vec::new();
        client()
            .download_file(&format!("{}/old/file.bin", url), &mut buffer, Path::new("file.bin"))
            .await
            .unwrap();

        target.assert_async().await;
        assert_eq!(buffer, b"moved");
    }

    #[tokio::test]
    async fn test_second_redirect_is_not_followed() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _first = server
            .mock("GET", "/first")
            .with_status(302)
            .with_header("location", "/second")
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/second")
            .with_status(302)
            .with_header("location", "/third")
            .create_async()
            .await;
        let third = server
            .mock("GET", "/third")
            .with_status(200)
            .with_body("unreachable")
            .expect(0)
            .create_async()
            .await;

        let response = client()
            .get_following_redirect(&format!("{}/first", url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        let mut buffer = Vec::new();
        let err = client()
            .download_file(&format!("{}/first", url), &mut buffer, Path::new("file.bin"))
            .await
            .unwrap_err();

        third.assert_async().await;
        assert!(matches!(err, ShimError::DownloadFailed { .. }));
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_other_redirect_statuses_are_not_followed() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _temporary = server
            .mock("GET", "/file.bin")
            .with_status(307)
            .with_header("location", "/elsewhere")
            .create_async()
            .await;

        let response = client()
            .get_following_redirect(&format!("{}/file.bin", url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_redirect_without_location_fails() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _redirect = server
            .mock("GET", "/file.bin")
            .with_status(302)
            .create_async()
            .await;

        let result = client()
            .get_following_redirect(&format!("{}/file.bin", url))
            .await;
        assert!(matches!(result, Err(ShimError::DownloadFailed { .. })));
    }

    #[tokio::test]
    async fn test_token_only_sent_on_first_hop() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let first = server
            .mock("GET", "/release/file.bin")
            .match_header("authorization", "Bearer secret-token")
            .with_status(302)
            .with_header("location", "/storage/file.bin")
            .create_async()
            .await;
        let second = server
            .mock("GET", "/storage/file.bin")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let mut buffer = Vec::new();
        client()
            .with_token(Some("secret-token".to_string()))
            .download_file(&format!("{}/release/file.bin", url), &mut buffer, Path::new("file.bin"))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let result = client().get_following_redirect("not a url").await;
        match result {
            Err(ShimError::DownloadFailed { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("Expected DownloadFailed, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn test_write_error_maps_to_write_failed() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _mock = server
            .mock("GET", "/file.bin")
            .with_status(200)
            .with_body("data")
            .create_async()
            .await;

        let err = client()
            .download_file(&format!("{}/file.bin", url), &mut FailingWriter, Path::new("dest.bin"))
            .await
            .unwrap_err();

        match err {
            ShimError::WriteFailed { path, .. } => assert_eq!(path, Path::new("dest.bin")),
            other => panic!("Expected WriteFailed, got {:?}", other),
        }
    }
}
