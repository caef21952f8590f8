//! HTTP client for the posts API

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{ApiError, PostApi};
use crate::composer::{MultipartBody, Payload};
use crate::config::Config;
use crate::models::Post;

/// Posts API client
pub struct HttpClient {
    client: Client,
    posts_url: String,
}

impl HttpClient {
    /// Create a client for the posts collection at `posts_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(posts_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(format!("murmur/{}", crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            posts_url: posts_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the user's configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// Collection URL
    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }

    fn post_url(&self, id: i64) -> String {
        format!("{}/{id}", self.posts_url)
    }

    async fn send_payload(&self, request: RequestBuilder, payload: &Payload) -> Result<Post, ApiError> {
        let request = match payload {
            Payload::Structured(body) => request.json(body),
            Payload::Multipart(body) => request.multipart(build_form(body).await?),
        };
        let response = request.send().await?;
        read_json(response).await
    }
}

impl PostApi for HttpClient {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        tracing::debug!("GET {}", self.posts_url);
        let response = self.client.get(&self.posts_url).send().await?;
        read_json(response).await
    }

    async fn create_post(&self, payload: &Payload) -> Result<Post, ApiError> {
        tracing::debug!(
            "POST {} (multipart: {})",
            self.posts_url,
            payload.is_multipart()
        );
        let request = self.client.post(&self.posts_url);
        self.send_payload(request, payload).await
    }

    async fn update_post(&self, id: i64, payload: &Payload) -> Result<Post, ApiError> {
        let url = self.post_url(id);
        tracing::debug!("PUT {url} (multipart: {})", payload.is_multipart());
        let request = self.client.put(&url);
        self.send_payload(request, payload).await
    }

    async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let url = self.post_url(id);
        tracing::debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn like_post(&self, id: i64) -> Result<Post, ApiError> {
        let url = format!("{}/like", self.post_url(id));
        tracing::debug!("POST {url}");
        let response = self.client.post(&url).send().await?;
        read_json(response).await
    }
}

/// Build the multipart form, reading the selected files from disk
async fn build_form(body: &MultipartBody) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in body.fields.form_fields() {
        form = form.text(name, value);
    }
    for (slot, file) in body.files() {
        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| ApiError::File {
                path: file.path.clone(),
                reason: e.to_string(),
            })?;
        let part = Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(file.mime.as_ref())?;
        form = form.part(slot.file_field(), part);
    }
    Ok(form)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::warn!("Request failed with {status}: {}", message.as_deref().unwrap_or("-"));
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::PostBody;
    use crate::models::LocalFile;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post_json(id: i64, content: &str, likes: u32) -> Value {
        json!({
            "id": id,
            "content": content,
            "imageUrl": null,
            "videoUrl": null,
            "likes": likes,
            "createdAt": "2025-03-01T10:15:30",
            "updatedAt": "2025-03-01T10:15:30"
        })
    }

    async fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(&format!("{}/posts/", server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn test_list_posts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([post_json(1, "hi", 0)])))
            .mount(&server)
            .await;

        let posts = client_for(&server).await.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "hi");
    }

    #[tokio::test]
    async fn test_structured_create_sends_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(2, "new", 0)))
            .mount(&server)
            .await;

        let payload = Payload::Structured(PostBody {
            image_url: Some("http://x/a.png".to_string()),
            ..PostBody::text("new")
        });
        let post = client_for(&server).await.create_post(&payload).await.unwrap();
        assert_eq!(post.id, 2);

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({"content": "new", "imageUrl": "http://x/a.png"}));
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("application/json"));
    }

    #[tokio::test]
    async fn test_multipart_update_carries_file() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(1, "edited", 0)))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("cat.png");
        std::fs::write(&file_path, b"PNGDATA").unwrap();

        let payload = Payload::Multipart(MultipartBody {
            fields: PostBody::text("edited"),
            image_file: Some(LocalFile::open(&file_path).unwrap()),
            video_file: None,
        });
        client_for(&server).await.update_post(1, &payload).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains("name=\"imageFile\"; filename=\"cat.png\""));
        assert!(body.contains("PNGDATA"));
        assert!(body.contains("name=\"content\""));
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_reported() {
        let server = MockServer::start().await;
        let payload = Payload::Multipart(MultipartBody {
            fields: PostBody::text(""),
            image_file: None,
            video_file: Some(LocalFile::with_size("/definitely/not/here.mp4", 1)),
        });
        let err = client_for(&server).await.create_post(&payload).await.unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/posts/9/like"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Post not found with id: 9"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.like_post(9).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: Some("Post not found with id: 9".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/posts/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
            .mount(&server)
            .await;

        client_for(&server).await.delete_post(4).await.unwrap();
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"error": "Bad Request"}"#).as_deref(), Some("Bad Request"));
        assert_eq!(error_message("plain failure").as_deref(), Some("plain failure"));
        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
