//! Main directory client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::types::{ApiErrorBody, ClientConfig};
use crate::users::UsersClient;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use roster_core::{
    CreatedUser, Credentials, NewUser, RosterError, SessionToken, User, UserApi, UserId,
    UserPage, UserPatch,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::error;

/// Main client for the remote user directory.
///
/// Requests are unauthenticated: the remote issues a session token but never
/// asks for it back.
///
/// # Example
///
/// ```ignore
/// use roster_client::{ApiClient, ClientConfig};
///
/// let client = ApiClient::new(ClientConfig::new("https://reqres.in/api"))?;
/// let page = client.users().list(1).await?;
/// println!("Found {} users", page.total);
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Roster/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(self)
    }

    /// User endpoints.
    pub fn users(&self) -> UsersClient<'_> {
        UsersClient::new(self)
    }

    /// Start a request against `path` (relative to the base URL).
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }
}

/// Send a request, classifying connection failures.
pub(crate) async fn send(builder: RequestBuilder) -> Result<Response> {
    builder.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            ClientError::ServerUnreachable(e.to_string())
        } else {
            ClientError::Request(e)
        }
    })
}

/// Turn a non-success response into `ClientError::Api`, keeping the
/// server's `error` text when the body carries one.
pub(crate) async fn error_from_response(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    ClientError::Api { status, message }
}

/// Decode a successful JSON body, or convert the failure.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

/// Require a success status, ignoring the body.
pub(crate) async fn expect_success(response: Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from_response(response).await)
    }
}

fn auth_failure(
    operation: &'static str,
    fallback: &'static str,
) -> impl FnOnce(ClientError) -> RosterError {
    move |e| {
        error!(operation = %operation, error = %e, "Authentication request failed");
        e.into_auth(fallback)
    }
}

fn network_failure(
    operation: &'static str,
    fallback: &'static str,
) -> impl FnOnce(ClientError) -> RosterError {
    move |e| {
        error!(operation = %operation, error = %e, "Directory request failed");
        e.into_network(fallback)
    }
}

#[async_trait]
impl UserApi for ApiClient {
    async fn register(&self, credentials: &Credentials) -> roster_core::Result<SessionToken> {
        self.auth()
            .register(credentials)
            .await
            .map_err(auth_failure("register", "Registration failed"))
    }

    async fn login(&self, credentials: &Credentials) -> roster_core::Result<SessionToken> {
        self.auth()
            .login(credentials)
            .await
            .map_err(auth_failure("login", "Login failed"))
    }

    async fn list_users(&self, page: u32) -> roster_core::Result<UserPage> {
        self.users()
            .list(page)
            .await
            .map_err(network_failure("list_users", "Failed to fetch users"))
    }

    async fn get_user(&self, id: UserId) -> roster_core::Result<User> {
        self.users()
            .get(id)
            .await
            .map_err(network_failure("get_user", "Failed to fetch user"))
    }

    async fn create_user(&self, user: &NewUser) -> roster_core::Result<CreatedUser> {
        self.users()
            .create(user)
            .await
            .map_err(network_failure("create_user", "Failed to create user"))
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> roster_core::Result<()> {
        self.users()
            .update(id, patch)
            .await
            .map_err(network_failure("update_user", "Update failed"))
    }

    async fn delete_user(&self, id: UserId) -> roster_core::Result<()> {
        self.users()
            .delete(id)
            .await
            .map_err(network_failure("delete_user", "Delete failed"))
    }
}
