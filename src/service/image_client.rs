use crate::{
    config::ServiceConfig,
    error::{ImageGenError, Result},
    models::{FetchedImage, GenerationRequest},
    service::ImageFetcher,
};
use async_trait::async_trait;
use reqwest::{header, Client};

#[derive(Clone)]
pub struct PollinationsClient {
    client: Client,
    config: ServiceConfig,
}

impl PollinationsClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// `<endpoint>/prompt/<prompt>?nologo=1&seed=..&height=..&width=..`
    pub fn request_url(&self, request: &GenerationRequest) -> String {
        let mut url = format!(
            "{}/prompt/{}?",
            self.config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&request.prompt)
        );
        if request.nologo {
            url.push_str("nologo=1&");
        }
        url.push_str(&format!(
            "seed={}&height={}&width={}",
            request.seed, request.size.height, request.size.width
        ));
        url
    }

    fn cache_hint(&self) -> String {
        format!("max-age={}", self.config.cache_max_age_secs)
    }
}

#[async_trait]
impl ImageFetcher for PollinationsClient {
    async fn fetch(&self, request: &GenerationRequest) -> Result<FetchedImage> {
        let url = self.request_url(request);
        log::debug!("Requesting image: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::CACHE_CONTROL, self.cache_hint())
            .send()
            .await
            .map_err(|e| ImageGenError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenError::RequestFailed {
                status: status.as_u16(),
            });
        }

        Ok(FetchedImage {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageGenError::Transport(e.to_string()))?
            .error_for_status()?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageGenError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Size;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn route(path: &str) -> String {
        let (status, extra, body) = if path.starts_with("/prompt/redirect") {
            ("302 Found", "Location: /final.jpg\r\n", "")
        } else if path == "/final.jpg" {
            ("200 OK", "Content-Type: image/jpeg\r\n", "IMG")
        } else if path.starts_with("/prompt/fail") {
            ("500 Internal Server Error", "", "boom")
        } else {
            ("404 Not Found", "", "")
        };
        format!(
            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            extra,
            body.len(),
            body
        )
    }

    /// Serves `route` on a local port and records every raw request head.
    async fn spawn_server() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let mut raw = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => raw.extend_from_slice(&buf[..n]),
                        }
                    }
                    let head = String::from_utf8_lossy(&raw).to_string();
                    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                    log.lock().unwrap().push(head);
                    let _ = socket.write_all(route(&path).as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (base, seen)
    }

    fn local_client(base: &str) -> PollinationsClient {
        PollinationsClient::new(ServiceConfig::new().with_endpoint(base))
    }

    #[tokio::test]
    async fn test_fetch_resolves_redirect_and_sends_cache_hint() {
        let (base, seen) = spawn_server().await;
        let client = local_client(&base);
        let request = GenerationRequest::with_seed("redirect", Size::new(1280, 720), 9);

        let image = client.fetch(&request).await.unwrap();
        assert_eq!(image.url, format!("{}/final.jpg", base));
        assert_eq!(image.status, 200);

        let requests = seen.lock().unwrap().clone();
        let first = requests[0].to_ascii_lowercase();
        assert!(first.starts_with("get /prompt/redirect?nologo=1&seed=9&height=720&width=1280 "));
        assert!(first.contains("cache-control: max-age=86400"));
    }

    #[tokio::test]
    async fn test_fetch_non_ok_status() {
        let (base, _) = spawn_server().await;
        let client = local_client(&base);
        let request = GenerationRequest::with_seed("fail", Size::new(1080, 1080), 1);

        assert!(matches!(
            client.fetch(&request).await,
            Err(ImageGenError::RequestFailed { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = local_client(&base);
        let request = GenerationRequest::with_seed("fox", Size::new(1080, 1080), 1);
        assert!(matches!(
            client.fetch(&request).await,
            Err(ImageGenError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let (base, _) = spawn_server().await;
        let client = local_client(&base);

        let bytes = client.fetch_bytes(&format!("{}/final.jpg", base)).await.unwrap();
        assert_eq!(bytes, b"IMG");

        assert!(matches!(
            client.fetch_bytes(&format!("{}/missing.jpg", base)).await,
            Err(ImageGenError::RequestFailed { status: 404 })
        ));
    }

    #[test]
    fn test_hand_built_endpoint_is_normalized() {
        let client = PollinationsClient::new(ServiceConfig {
            endpoint: "http://x/".into(),
            cache_max_age_secs: 60,
        });
        let request = GenerationRequest::with_seed("cat", Size::new(100, 100), 3);
        assert_eq!(
            client.request_url(&request),
            "http://x/prompt/cat?nologo=1&seed=3&height=100&width=100"
        );
        assert_eq!(client.cache_hint(), "max-age=60");
    }

    #[test]
    fn test_request_url() {
        let client = PollinationsClient::new(ServiceConfig::default());
        let request = GenerationRequest::with_seed("a red fox", Size::new(1080, 1080), 42);
        assert_eq!(
            client.request_url(&request),
            "https://image.pollinations.ai/prompt/a%20red%20fox?nologo=1&seed=42&height=1080&width=1080"
        );
    }

    #[test]
    fn test_prompt_is_a_single_path_segment() {
        let client =
            PollinationsClient::new(ServiceConfig::new().with_endpoint("http://localhost:8080/"));
        let request = GenerationRequest::with_seed("cats/dogs?#", Size::new(720, 1280), 7);
        assert_eq!(
            client.request_url(&request),
            "http://localhost:8080/prompt/cats%2Fdogs%3F%23?nologo=1&seed=7&height=1280&width=720"
        );
    }

    #[test]
    fn test_cache_hint() {
        let client = PollinationsClient::new(ServiceConfig::default());
        assert_eq!(client.cache_hint(), "max-age=86400");
    }
}
