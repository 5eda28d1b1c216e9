use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::api::{BlogInput, BlogView, Credentials, LoginResponse, MessageResponse, PublicUser};
use crate::auth::Principal;
use crate::client::error::ClientError;

/// Thin typed wrapper over the HTTP API. Attaches the bearer token when one
/// is set; holds no other state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http: Client::new(),
            base,
            token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        // Error bodies carry {message}; fall back to the status text
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("An error occurred")
                    .to_string()
            });

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.http.get(self.endpoint("health")?)).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<PublicUser, ClientError> {
        self.send(self.http.post(self.endpoint("api/auth/register")?).json(credentials))
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ClientError> {
        self.send(self.http.post(self.endpoint("api/auth/login")?).json(credentials))
            .await
    }

    pub async fn whoami(&self) -> Result<Principal, ClientError> {
        self.send(self.http.get(self.endpoint("api/auth/whoami")?)).await
    }

    pub async fn list_blogs(&self) -> Result<Vec<BlogView>, ClientError> {
        self.send(self.http.get(self.endpoint("api/blogs")?)).await
    }

    pub async fn get_blog(&self, id: Uuid) -> Result<BlogView, ClientError> {
        self.send(self.http.get(self.endpoint(&format!("api/blogs/{}", id))?))
            .await
    }

    pub async fn create_blog(&self, input: &BlogInput) -> Result<BlogView, ClientError> {
        self.send(self.http.post(self.endpoint("api/blogs")?).json(input))
            .await
    }

    pub async fn update_blog(&self, id: Uuid, input: &BlogInput) -> Result<BlogView, ClientError> {
        self.send(
            self.http
                .put(self.endpoint(&format!("api/blogs/{}", id))?)
                .json(input),
        )
        .await
    }

    pub async fn delete_blog(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.send(self.http.delete(self.endpoint(&format!("api/blogs/{}", id))?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_under_base_path() {
        let client = ApiClient::new("http://localhost:5000/blog").unwrap();
        assert_eq!(
            client.endpoint("api/blogs").unwrap().as_str(),
            "http://localhost:5000/blog/api/blogs"
        );

        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.endpoint("api/auth/login").unwrap().as_str(),
            "http://localhost:5000/api/auth/login"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Url(_))));
    }
}
