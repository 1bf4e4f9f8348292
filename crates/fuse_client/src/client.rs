use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::http::{HttpClient, HttpRequest, ReqwestClient};
use crate::model::{
    AccessTokenRequest, CreateLinkTokenRequest, CreateLinkTokenResponse, CreateSessionRequest,
    CreateSessionResponse, ExchangePublicTokenRequest, ExchangePublicTokenResponse,
    GetAccountDetailsResponse, GetAccountsResponse, GetBalancesResponse,
};

const SANDBOX_URL: &str = "https://sandbox-api.letsfuse.com/v1/";
const PRODUCTION_URL: &str = "https://api.letsfuse.com/v1/";

/// Header carrying the Fuse API key. The same key signs webhook
/// deliveries.
pub const API_KEY_HEADER: &str = "fuse-api-key";
/// Header carrying the Fuse client id.
pub const CLIENT_ID_HEADER: &str = "fuse-client-id";
/// Header Fuse attaches to webhook deliveries with the body signature.
pub const VERIFICATION_HEADER: &str = "fuse-verification";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx backend response. The body is preserved verbatim so
    /// callers can surface it unchanged.
    #[error("backend returned {status}")]
    Api { status: u16, body: String },
    #[error("unable to decode response body")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    Sandbox,
    Production,
    /// Point the client somewhere else, e.g. a local stub.
    Custom(String),
}

impl Environment {
    pub fn base_url(&self) -> &str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Production => PRODUCTION_URL,
            Environment::Custom(url) => url,
        }
    }
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sandbox" => Environment::Sandbox,
            "production" => Environment::Production,
            _ => Environment::Custom(value),
        }
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        match value {
            Environment::Sandbox => "sandbox".to_string(),
            Environment::Production => "production".to_string(),
            Environment::Custom(url) => url,
        }
    }
}

pub struct Builder<T: HttpClient = ReqwestClient> {
    env: Environment,
    headers: HashMap<String, String>,
    http: T,
}

impl Builder<ReqwestClient> {
    pub fn new() -> Self {
        Self {
            env: Environment::Sandbox,
            headers: HashMap::new(),
            http: ReqwestClient::new(),
        }
    }
}

impl Default for Builder<ReqwestClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HttpClient> Builder<T> {
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_lowercase(), value.to_string());
        self
    }

    /// Credential headers attached verbatim to every request, e.g. the
    /// Fuse API key and any aggregator-specific keys.
    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.to_lowercase(), value);
        }
        self
    }

    pub fn with_http_client<C: HttpClient>(self, http: C) -> Builder<C> {
        Builder {
            env: self.env,
            headers: self.headers,
            http,
        }
    }

    pub fn build(self) -> Fuse<T> {
        Fuse {
            base_url: self.env.base_url().to_string(),
            headers: self.headers,
            http: self.http,
        }
    }
}

pub struct Fuse<T: HttpClient = ReqwestClient> {
    base_url: String,
    headers: HashMap<String, String>,
    http: T,
}

impl<T: HttpClient> Fuse<T> {
    async fn post<R, D>(&self, path: &str, request: &R) -> Result<D, ClientError>
    where
        R: Serialize,
        D: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fuse request");

        let response = self
            .http
            .post(HttpRequest {
                url,
                headers: self
                    .headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                body: serde_json::to_string(request)?,
            })
            .await?;

        if !response.is_success() {
            return Err(ClientError::Api {
                status: response.status,
                body: response.body,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, ClientError> {
        self.post("session/create", request).await
    }

    pub async fn create_link_token(
        &self,
        request: &CreateLinkTokenRequest,
    ) -> Result<CreateLinkTokenResponse, ClientError> {
        self.post("link/token", request).await
    }

    pub async fn exchange_public_token(
        &self,
        request: &ExchangePublicTokenRequest,
    ) -> Result<ExchangePublicTokenResponse, ClientError> {
        self.post("financial_connections/public_token/exchange", request)
            .await
    }

    pub async fn accounts(&self, access_token: &str) -> Result<GetAccountsResponse, ClientError> {
        self.post(
            "financial_connections/accounts",
            &AccessTokenRequest {
                access_token: access_token.to_string(),
            },
        )
        .await
    }

    pub async fn account_details(
        &self,
        access_token: &str,
    ) -> Result<GetAccountDetailsResponse, ClientError> {
        self.post(
            "financial_connections/accounts/details",
            &AccessTokenRequest {
                access_token: access_token.to_string(),
            },
        )
        .await
    }

    pub async fn balances(&self, access_token: &str) -> Result<GetBalancesResponse, ClientError> {
        self.post(
            "financial_connections/balances",
            &AccessTokenRequest {
                access_token: access_token.to_string(),
            },
        )
        .await
    }

    /// Checks the HMAC-SHA256 signature Fuse attaches to webhook
    /// deliveries. The signature is keyed on the configured API key and
    /// encoded as url-safe base64 in the verification header.
    pub fn verify_webhook(&self, body: &str, headers: &HashMap<String, String>) -> bool {
        let key = match self.headers.get(API_KEY_HEADER) {
            Some(key) => key,
            None => return false,
        };
        let signature = match lookup_header(headers, VERIFICATION_HEADER) {
            Some(signature) => signature,
            None => return false,
        };
        let decoded = match base64::decode_config(signature.as_bytes(), base64::URL_SAFE) {
            Ok(decoded) => decoded,
            Err(_) => return false,
        };
        let mut mac = match Hmac::<Sha256>::new_from_slice(key.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };

        mac.update(body.as_bytes());
        mac.verify_slice(&decoded).is_ok()
    }
}

fn lookup_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
