//! reqwest-backed implementation of the hero gateway

use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::error::{ApiError, Failure};
use super::pipeline::RequestPipeline;
use super::HeroApi;
use crate::hero::Hero;

/// Stateless facade over the `/heroes` resource
pub struct HeroesClient {
    http: reqwest::Client,
    /// `{api_url}/heroes`
    base: Url,
    pipeline: RequestPipeline,
}

impl HeroesClient {
    pub fn new(api_url: &str, pipeline: RequestPipeline) -> Result<Self> {
        let base = resource_url(api_url)?;

        // No timeout here: the transport's defaults apply
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::debug!("Hero gateway targeting {}", base);

        Ok(Self {
            http,
            base,
            pipeline,
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// `{base}/{id}` with the id percent-encoded as a single path segment
    fn hero_url(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }
}

fn resource_url(api_url: &str) -> Result<Url> {
    let trimmed = api_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/heroes"))
        .with_context(|| format!("Invalid API URL: {api_url}"))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("API URL must be an http(s) URL: {api_url}");
    }
    Ok(url)
}

/// Send the request; any non-2xx status becomes a `Failure`
async fn fetch(request: RequestBuilder, url: &Url) -> Result<(u16, String), Failure> {
    let response = request
        .send()
        .await
        .map_err(|e| Failure::unreachable(url.as_str(), e))?;

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        // The status line arrived, so the status still decides the error
        Err(e) if status.is_success() => {
            return Err(Failure::decode(url.as_str(), status.as_u16(), e));
        }
        Err(e) => {
            let failure = Failure::from_response(
                url.as_str(),
                status.as_u16(),
                status.canonical_reason(),
                "",
            );
            return Err(Failure {
                detail: Some(e.to_string()),
                ..failure
            });
        }
    };

    if !status.is_success() {
        return Err(Failure::from_response(
            url.as_str(),
            status.as_u16(),
            status.canonical_reason(),
            &body,
        ));
    }

    Ok((status.as_u16(), body))
}

fn decode<T: DeserializeOwned>(url: &Url, status: u16, body: &str) -> Result<T, Failure> {
    serde_json::from_str(body).map_err(|e| Failure::decode(url.as_str(), status, e))
}

impl HeroApi for HeroesClient {
    fn list(&self) -> BoxFuture<'_, Result<Vec<Hero>, ApiError>> {
        async move {
            let url = self.base.clone();
            self.pipeline
                .run("GET", url.as_str(), async {
                    let (status, body) = fetch(self.http.get(url.clone()), &url).await?;
                    decode(&url, status, &body)
                })
                .await
        }
        .boxed()
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            let url = self.hero_url(id);
            self.pipeline
                .run("GET", url.as_str(), async {
                    let (status, body) = fetch(self.http.get(url.clone()), &url).await?;
                    decode(&url, status, &body)
                })
                .await
        }
        .boxed()
    }

    fn create<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            let url = self.base.clone();
            self.pipeline
                .run("POST", url.as_str(), async {
                    let request = self.http.post(url.clone()).json(hero);
                    let (status, body) = fetch(request, &url).await?;
                    decode(&url, status, &body)
                })
                .await
        }
        .boxed()
    }

    fn update<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            let url = self.hero_url(&hero.id);
            self.pipeline
                .run("PUT", url.as_str(), async {
                    let request = self.http.put(url.clone()).json(hero);
                    let (status, body) = fetch(request, &url).await?;
                    decode(&url, status, &body)
                })
                .await
        }
        .boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), ApiError>> {
        async move {
            let url = self.hero_url(id);
            self.pipeline
                .run("DELETE", url.as_str(), async {
                    // Body on success is ignored
                    fetch(self.http.delete(url.clone()), &url).await.map(|_| ())
                })
                .await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::fixtures;
    use crate::notify::NotificationCenter;
    use crate::server::{self, HeroStore};
    use crate::tracker::{LoadingTracker, RequestTracker};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct Harness {
        client: HeroesClient,
        tracker: Arc<LoadingTracker>,
        center: Arc<NotificationCenter>,
    }

    fn harness(api_url: &str) -> Harness {
        let tracker = Arc::new(LoadingTracker::new());
        let center = Arc::new(NotificationCenter::default());
        let pipeline = RequestPipeline::new(tracker.clone(), center.clone());
        Harness {
            client: HeroesClient::new(api_url, pipeline).unwrap(),
            tracker,
            center,
        }
    }

    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Answers every connection with `head` and a body cut short of its
    /// declared `Content-Length`
    async fn truncating_backend(head: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let response = format!("{head}\r\nContent-Length: 100\r\n\r\nshort");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }

    async fn demo_backend(heroes: Vec<Hero>) -> Harness {
        let url = spawn(server::router(HeroStore::new(heroes))).await;
        harness(&url)
    }

    #[test]
    fn test_resource_url_trims_trailing_slash() {
        let h = harness("http://localhost:3000/");
        assert_eq!(h.client.base_url(), "http://localhost:3000/heroes");
        assert_eq!(
            h.client.hero_url("dc-batman").as_str(),
            "http://localhost:3000/heroes/dc-batman"
        );
    }

    #[test]
    fn test_resource_url_rejects_garbage() {
        assert!(resource_url("not a url").is_err());
        assert!(resource_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_hero_url_encodes_segment() {
        let h = harness("http://localhost:3000");
        assert_eq!(
            h.client.hero_url("a b/c").as_str(),
            "http://localhost:3000/heroes/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn test_list_preserves_backend_order() {
        let h = demo_backend(vec![fixtures::spiderman(), fixtures::batman()]).await;

        let heroes = h.client.list().await.unwrap();
        let ids: Vec<&str> = heroes.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["marvel-spider", "dc-batman"]);
        assert_eq!(h.tracker.in_flight(), 0);
        assert_eq!(h.center.len(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let h = demo_backend(vec![fixtures::batman()]).await;
        let hero = h.client.get("dc-batman").await.unwrap();
        assert_eq!(hero, fixtures::batman());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found_and_notified() {
        let h = demo_backend(vec![]).await;

        let err = h.client.get("dc-nobody").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
        assert_eq!(h.tracker.in_flight(), 0);

        let toasts = h.center.drain();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].notification.body, "Resource not found");
    }

    #[tokio::test]
    async fn test_create_then_duplicate() {
        let h = demo_backend(vec![]).await;
        let hero = fixtures::spiderman();

        let created = h.client.create(&hero).await.unwrap();
        assert_eq!(created, hero);

        let err = h.client.create(&hero).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Hero with id 'marvel-spider' already exists"
        );
    }

    #[tokio::test]
    async fn test_update_replaces_whole_record() {
        let h = demo_backend(vec![fixtures::batman()]).await;
        let mut hero = fixtures::batman();
        hero.alter_ego = "Terry McGinnis".to_string();
        hero.alt_img = Some("beyond.jpg".to_string());

        let updated = h.client.update(&hero).await.unwrap();
        assert_eq!(updated, hero);
        assert_eq!(h.client.get("dc-batman").await.unwrap(), hero);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let h = demo_backend(vec![]).await;
        let err = h.client.update(&fixtures::batman()).await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_record() {
        let h = demo_backend(vec![fixtures::spiderman(), fixtures::batman()]).await;

        h.client.delete("dc-batman").await.unwrap();

        let heroes = h.client.list().await.unwrap();
        assert_eq!(heroes, vec![fixtures::spiderman()]);
        assert_eq!(
            h.client.delete("dc-batman").await.unwrap_err(),
            ApiError::NotFound
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Grab a free port, then close it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let h = harness(&format!("http://{addr}"));
        let err = h.client.list().await.unwrap_err();

        assert_eq!(err, ApiError::Unreachable);
        assert_eq!(h.tracker.in_flight(), 0);
        assert_eq!(h.center.drain()[0].notification.body, "Cannot connect to server");
    }

    #[tokio::test]
    async fn test_server_fault() {
        let app = Router::new().route(
            "/heroes",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"message": "database exploded"})),
                )
            }),
        );
        let h = harness(&spawn(app).await);

        let err = h.client.list().await.unwrap_err();
        assert_eq!(err, ApiError::Server { status: 500 });
        assert_eq!(err.to_string(), "Server error");
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let app = Router::new().route("/heroes", get(|| async { "definitely not json" }));
        let url = spawn(app).await;
        let h = harness(&url);

        let err = h.client.list().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Http failure during parsing for {url}/heroes")
        );
        assert!(!h.tracker.is_busy());
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        let h = harness(&truncating_backend("HTTP/1.1 500 Internal Server Error").await);
        let err = h.client.list().await.unwrap_err();
        assert_eq!(err, ApiError::Server { status: 500 });

        let h = harness(&truncating_backend("HTTP/1.1 404 Not Found").await);
        let err = h.client.get("dc-batman").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound);
        assert_eq!(h.center.drain()[0].notification.body, "Resource not found");
        assert_eq!(h.tracker.in_flight(), 0);
    }
}
