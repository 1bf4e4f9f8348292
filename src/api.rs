use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::debug;

use fuse_client::model::{
    CreateLinkTokenRequest, CreateSessionRequest, CreateSessionResponse, Entity,
    ExchangePublicTokenRequest, PlaidPassthrough,
};
use fuse_client::{Builder, Environment, Fuse, HttpClient, ReqwestClient};

use crate::error::Error;
use crate::model::{
    AccountBalance, AccountsBalanceGetRequest, AccountsGetRequest, AccountsGetResponse,
    AuthGetNumbers, AuthGetRequest, AuthGetResponse, Item, ItemPublicTokenExchangeRequest,
    ItemPublicTokenExchangeResponse, LinkTokenCreateRequest, LinkTokenCreateResponse, NumbersAch,
    NumbersBacs,
};
use crate::translate;

/// Base paths Plaid callers already configure against.
pub mod environments {
    pub const SANDBOX: &str = "https://sandbox.plaid.com";
    pub const DEVELOPMENT: &str = "https://development.plaid.com";
    pub const PRODUCTION: &str = "https://production.plaid.com";
}

/// Plaid-style configuration: a base path plus passthrough HTTP options.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub base_path: String,
    pub base_options: HttpOptions,
}

#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Credential headers forwarded on every backend request: the Fuse
    /// API key and client id plus any aggregator-specific keys.
    pub headers: HashMap<String, String>,
}

/// Drop-in replacement for the Plaid client. Every operation delegates
/// to the Fuse backend and reshapes the payloads; nothing is retried,
/// cached, or reordered, and backend failures surface unchanged.
pub struct PlaidApi<T: HttpClient = ReqwestClient> {
    fuse: Fuse<T>,
}

impl PlaidApi<ReqwestClient> {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            fuse: Builder::new()
                .with_env(environment_for(&configuration.base_path))
                .with_headers(configuration.base_options.headers)
                .build(),
        }
    }
}

pub(crate) fn environment_for(base_path: &str) -> Environment {
    match base_path {
        environments::SANDBOX | environments::DEVELOPMENT => Environment::Sandbox,
        environments::PRODUCTION => Environment::Production,
        other => Environment::Custom(other.to_string()),
    }
}

impl<T: HttpClient> PlaidApi<T> {
    /// Wraps an already-built backend client. Tests use this with a stub
    /// transport.
    pub fn with_client(fuse: Fuse<T>) -> Self {
        Self { fuse }
    }

    /// Pure passthrough; the session shape is Fuse's own.
    pub async fn session_create(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, Error> {
        Ok(self.fuse.create_session(request).await?)
    }

    pub async fn link_token_create(
        &self,
        request: &LinkTokenCreateRequest,
    ) -> Result<LinkTokenCreateResponse, Error> {
        let backend = shape_link_token_request(request)?;

        let started = Utc::now();
        let response = self.fuse.create_link_token(&backend).await?;

        // Upstream documents a fixed four hour token lifetime; the
        // backend does not report one.
        Ok(LinkTokenCreateResponse {
            link_token: response.link_token,
            expiration: started + Duration::hours(4),
            request_id: response.request_id,
        })
    }

    pub async fn item_public_token_exchange(
        &self,
        request: &ItemPublicTokenExchangeRequest,
    ) -> Result<ItemPublicTokenExchangeResponse, Error> {
        let response = self
            .fuse
            .exchange_public_token(&ExchangePublicTokenRequest {
                public_token: request.public_token.clone(),
            })
            .await?;

        Ok(ItemPublicTokenExchangeResponse {
            access_token: response.access_token,
            item_id: response.financial_connection_id,
            request_id: response.request_id,
        })
    }

    pub async fn accounts_get(
        &self,
        request: &AccountsGetRequest,
    ) -> Result<AccountsGetResponse, Error> {
        let response = self.fuse.accounts(&request.access_token).await?;
        debug!(
            accounts = response.accounts.len(),
            mapping = translate::MAPPING_VERSION,
            "translating accounts"
        );

        Ok(AccountsGetResponse {
            item: Item {
                item_id: response.financial_connection.id,
                institution_id: response.financial_connection.institution_id,
            },
            accounts: response
                .accounts
                .into_iter()
                .map(translate::account_to_plaid)
                .collect(),
            request_id: response.request_id,
        })
    }

    pub async fn auth_get(&self, request: &AuthGetRequest) -> Result<AuthGetResponse, Error> {
        let details = self.fuse.account_details(&request.access_token).await?;
        let accounts = self
            .accounts_get(&AccountsGetRequest {
                access_token: request.access_token.clone(),
            })
            .await?;

        // Routing numbers are read from the first detail entry only;
        // connections are assumed to carry a single set of numbers. A
        // connection without detail entries yields empty number sets.
        let numbers = match details.account_details.first() {
            Some(detail) => AuthGetNumbers {
                ach: vec![NumbersAch {
                    account_id: detail.remote_id.clone(),
                    account: detail.ach.account.clone(),
                    routing: detail.ach.routing.clone(),
                    wire_routing: detail.ach.wire_routing.clone(),
                }],
                bacs: detail
                    .ach
                    .bacs_routing
                    .clone()
                    .map(|sort_code| {
                        vec![NumbersBacs {
                            account_id: detail.remote_id.clone(),
                            account: detail.ach.account.clone(),
                            sort_code,
                        }]
                    })
                    .unwrap_or_default(),
            },
            None => AuthGetNumbers::default(),
        };

        Ok(AuthGetResponse {
            item: Item {
                item_id: details.financial_connection.id,
                institution_id: details.financial_connection.institution_id,
            },
            request_id: details.request_id,
            numbers,
            accounts: accounts.accounts,
        })
    }

    /// The accounts call defines the account set; each account is then
    /// joined to its refreshed balance record. An account without a
    /// matching record is a [`Error::MissingBalance`], never a panic.
    pub async fn accounts_balance_get(
        &self,
        request: &AccountsBalanceGetRequest,
    ) -> Result<AccountsGetResponse, Error> {
        let response = self.fuse.balances(&request.access_token).await?;
        let accounts = self
            .accounts_get(&AccountsGetRequest {
                access_token: request.access_token.clone(),
            })
            .await?;

        let refreshed = accounts
            .accounts
            .into_iter()
            .map(|mut account| {
                let balance = response
                    .balances
                    .iter()
                    .find(|balance| balance.remote_account_id == account.account_id)
                    .ok_or_else(|| Error::MissingBalance {
                        account_id: account.account_id.clone(),
                    })?;

                account.balances = AccountBalance {
                    available: balance.available,
                    current: balance.current,
                    limit: None,
                    iso_currency_code: balance.iso_currency_code.clone(),
                    unofficial_currency_code: None,
                    last_updated_datetime: None,
                };

                Ok(account)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(AccountsGetResponse {
            item: accounts.item,
            accounts: refreshed,
            request_id: response.request_id,
        })
    }

    /// Delegates signature verification wholesale to the backend client.
    pub fn verify(&self, webhook_body: &str, headers: &HashMap<String, String>) -> bool {
        self.fuse.verify_webhook(webhook_body, headers)
    }
}

fn shape_link_token_request(
    request: &LinkTokenCreateRequest,
) -> Result<CreateLinkTokenRequest, Error> {
    let mx = match &request.mx {
        Some(mx) => Some(
            mx.config
                .clone()
                .map(|config| serde_json::json!({ "config": config }))
                .ok_or_else(|| {
                    Error::InvalidRequest("mx in request but missing mx config".to_string())
                })?,
        ),
        None => None,
    };

    // The passthrough block is a deep copy of the caller's request with
    // the adapter-only fields stripped out.
    let mut config = serde_json::Map::new();
    config.insert(
        "client_name".to_string(),
        Value::String(request.client_name.clone()),
    );
    config.insert(
        "user".to_string(),
        serde_json::json!({ "client_user_id": request.user.client_user_id }),
    );
    for (key, value) in &request.extra {
        config.insert(key.clone(), value.clone());
    }

    Ok(CreateLinkTokenRequest {
        entity: Entity {
            id: request.user.client_user_id.clone(),
        },
        session_client_secret: request.session_client_secret.clone(),
        institution_id: request.fuse_institution_id.clone(),
        client_name: request.client_name.clone(),
        plaid: PlaidPassthrough {
            config: Value::Object(config),
        },
        mx,
    })
}
