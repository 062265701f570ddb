use std::{future::Future, time::Duration};

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{sync::RwLock, time::Instant};

/// A role as the identity provider describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The identity provider's user management API.
#[cfg_attr(test, mockall::automock)]
pub trait UserManagement {
    fn add_roles(
        &self,
        user_id: &str,
        roles: &[String],
    ) -> impl Future<Output = Result<(), ManagementError>> + Send;

    fn remove_roles(
        &self,
        user_id: &str,
        roles: &[String],
    ) -> impl Future<Output = Result<(), ManagementError>> + Send;

    fn list_roles(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Role>, ManagementError>> + Send;

    fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> impl Future<Output = Result<(), ManagementError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Tokens are renewed this long before they actually expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Management API client authenticating with the client credentials grant.
///
/// Without credentials every call fails with [`ManagementError::NotConfigured`].
#[derive(Debug)]
pub struct HttpUserManagement {
    domain: String,
    credentials: Option<ClientCredentials>,
    http_client: reqwest::Client,
    access_token: RwLock<Option<AccessToken>>,
}

impl HttpUserManagement {
    pub fn new(
        domain: String,
        credentials: Option<ClientCredentials>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            domain,
            credentials,
            http_client,
            access_token: RwLock::new(None),
        }
    }

    fn api_audience(&self) -> String {
        format!("https://{}/api/v2/", self.domain)
    }

    fn user_url(&self, user_id: &str, roles: bool) -> Result<Url, ManagementError> {
        let mut url = Url::parse(&self.api_audience()).map_err(|_| ManagementError::Url)?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| ManagementError::Url)?;

            segments.pop_if_empty().push("users").push(user_id);

            if roles {
                segments.push("roles");
            }
        }

        Ok(url)
    }

    #[tracing::instrument(skip_all)]
    async fn access_token(&self) -> Result<String, ManagementError> {
        if let Some(token) = self.access_token.read().await.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ManagementError::NotConfigured)?;

        tracing::debug!("Requesting management API token");

        let response = self
            .http_client
            .post(format!("https://{}/oauth/token", self.domain))
            .json(&json!({
                "grant_type": "client_credentials",
                "client_id": credentials.client_id,
                "client_secret": credentials.client_secret,
                "audience": self.api_audience(),
            }))
            .send()
            .await
            .map_err(ManagementError::Request)?
            .error_for_status()
            .map_err(ManagementError::Status)?
            .json::<TokenResponse>()
            .await
            .map_err(ManagementError::Parse)?;

        *(self.access_token.write().await) = Some(AccessToken {
            value: response.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(response.expires_in),
        });

        Ok(response.access_token)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ManagementError> {
        let token = self.access_token().await?;

        let mut request = self.http_client.request(method, url).bearer_auth(token);

        if let Some(body) = body {
            request = request.json(&body);
        }

        request
            .send()
            .await
            .map_err(ManagementError::Request)?
            .error_for_status()
            .map_err(ManagementError::Status)
    }
}

impl UserManagement for HttpUserManagement {
    #[tracing::instrument(skip(self))]
    async fn add_roles(&self, user_id: &str, roles: &[String]) -> Result<(), ManagementError> {
        let url = self.user_url(user_id, true)?;

        self.send(Method::POST, url, Some(json!({ "roles": roles })))
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_roles(&self, user_id: &str, roles: &[String]) -> Result<(), ManagementError> {
        let url = self.user_url(user_id, true)?;

        self.send(Method::DELETE, url, Some(json!({ "roles": roles })))
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_roles(&self, user_id: &str) -> Result<Vec<Role>, ManagementError> {
        let url = self.user_url(user_id, true)?;

        self.send(Method::GET, url, None)
            .await?
            .json::<Vec<Role>>()
            .await
            .map_err(ManagementError::Parse)
    }

    #[tracing::instrument(skip(self))]
    async fn update_username(&self, user_id: &str, username: &str) -> Result<(), ManagementError> {
        let url = self.user_url(user_id, false)?;

        self.send(Method::PATCH, url, Some(json!({ "username": username })))
            .await?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("User management is not configured")]
    NotConfigured,
    #[error("Invalid management API url")]
    Url,
    #[error("Management API request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Management API answered with an error: {0}")]
    Status(#[source] reqwest::Error),
    #[error("Failed to parse management API response: {0}")]
    Parse(#[source] reqwest::Error),
}
