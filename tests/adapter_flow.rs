use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use fuse_client::model::{Aggregator, CreateSessionRequest};
use fuse_client::{
    Builder, ClientError, Environment, HttpClient, HttpRequest, HttpResponse, API_KEY_HEADER,
    VERIFICATION_HEADER,
};
use fuse_plaid::model::{
    AccountSubtype, AccountType, AccountsBalanceGetRequest, AccountsGetRequest, AuthGetRequest,
    ItemPublicTokenExchangeRequest, LinkTokenCreateRequest, LinkUser, MxOptions, Subtype,
};
use fuse_plaid::{Error, PlaidApi};

/// In-memory transport: hands out canned responses in order and records
/// every request for inspection.
#[derive(Clone, Default)]
struct StubTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl StubTransport {
    fn with_responses(responses: Vec<(u16, Value)>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| HttpResponse {
                        status,
                        body: body.to_string(),
                    })
                    .collect(),
            )),
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn request_body(&self, index: usize) -> Value {
        serde_json::from_str(&self.requests()[index].body).unwrap()
    }
}

#[async_trait]
impl HttpClient for StubTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no canned response left for request"))
    }
}

fn api_with(stub: StubTransport) -> PlaidApi<StubTransport> {
    PlaidApi::with_client(
        Builder::new()
            .with_env(Environment::Sandbox)
            .with_header(API_KEY_HEADER, "key_123")
            .with_http_client(stub)
            .build(),
    )
}

fn link_request() -> LinkTokenCreateRequest {
    let mut extra = serde_json::Map::new();
    extra.insert("language".to_string(), json!("en"));
    extra.insert("country_codes".to_string(), json!(["US"]));

    LinkTokenCreateRequest {
        client_name: "demo".to_string(),
        user: LinkUser {
            client_user_id: "user-1".to_string(),
        },
        fuse_institution_id: "fuse_ins_1".to_string(),
        session_client_secret: "sess_secret".to_string(),
        mx: None,
        extra,
    }
}

fn accounts_body() -> Value {
    json!({
        "financial_connection": {"id": "conn_1", "institution_id": "ins_9"},
        "accounts": [
            {
                "remote_id": "acc_1",
                "fingerprint": "fp_1",
                "mask": "1234",
                "name": "Everyday Checking",
                "type": "depository",
                "subtype": "checking",
                "balance": {
                    "available": 100.5,
                    "current": 110.0,
                    "iso_currency_code": "USD",
                    "last_updated_date": "2023-05-01T00:00:00Z"
                }
            },
            {
                "remote_id": "acc_2",
                "fingerprint": "fp_2",
                "mask": null,
                "name": "Umbrella Policy",
                "type": "insurance",
                "subtype": "prize_pool",
                "balance": {
                    "available": null,
                    "current": 5000.0,
                    "iso_currency_code": "USD"
                }
            }
        ],
        "request_id": "req_accounts"
    })
}

#[tokio::test]
async fn link_token_create_shapes_request_and_fixes_expiration() {
    let stub = StubTransport::with_responses(vec![(
        200,
        json!({"link_token": "fuse_lt_1", "request_id": "req_1"}),
    )]);
    let api = api_with(stub.clone());

    let before = Utc::now();
    let response = api.link_token_create(&link_request()).await.unwrap();
    let after = Utc::now();

    assert_eq!(response.link_token, "fuse_lt_1");
    assert_eq!(response.request_id, "req_1");
    assert!(response.expiration >= before + Duration::hours(4));
    assert!(response.expiration <= after + Duration::hours(4));

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "https://sandbox-api.letsfuse.com/v1/link/token"
    );
    assert!(requests[0]
        .headers
        .iter()
        .any(|(name, value)| name == API_KEY_HEADER && value == "key_123"));

    let body = stub.request_body(0);
    assert_eq!(body["entity"]["id"], "user-1");
    assert_eq!(body["session_client_secret"], "sess_secret");
    assert_eq!(body["institution_id"], "fuse_ins_1");
    assert_eq!(body["client_name"], "demo");
    assert_eq!(body["plaid"]["config"]["language"], "en");
    assert!(body["plaid"]["config"].get("session_client_secret").is_none());
    assert!(body["plaid"]["config"].get("fuse_institution_id").is_none());
    assert!(body.get("mx").is_none());
}

#[tokio::test]
async fn link_token_create_rejects_mx_without_config_before_any_call() {
    let stub = StubTransport::default();
    let api = api_with(stub.clone());

    let mut request = link_request();
    request.mx = Some(MxOptions { config: None });

    let err = api.link_token_create(&request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn link_token_create_forwards_mx_config() {
    let stub = StubTransport::with_responses(vec![(
        200,
        json!({"link_token": "fuse_lt_1", "request_id": "req_1"}),
    )]);
    let api = api_with(stub.clone());

    let mut request = link_request();
    request.mx = Some(MxOptions {
        config: Some(json!({"color_scheme": "dark"})),
    });

    api.link_token_create(&request).await.unwrap();

    let body = stub.request_body(0);
    assert_eq!(body["mx"]["config"]["color_scheme"], "dark");
    assert!(body["plaid"]["config"].get("mx").is_none());
}

#[tokio::test]
async fn token_exchange_renames_connection_id() {
    let stub = StubTransport::with_responses(vec![(
        200,
        json!({
            "access_token": "fuse_at_1",
            "financial_connection_id": "conn_1",
            "request_id": "req_2"
        }),
    )]);
    let api = api_with(stub.clone());

    let response = api
        .item_public_token_exchange(&ItemPublicTokenExchangeRequest {
            public_token: "public_tok".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.access_token, "fuse_at_1");
    assert_eq!(response.item_id, "conn_1");
    assert_eq!(response.request_id, "req_2");

    let body = stub.request_body(0);
    assert_eq!(body["public_token"], "public_tok");
}

#[tokio::test]
async fn backend_errors_pass_through_with_status_and_body() {
    let error_body = json!({"error_code": "invalid_public_token", "request_id": "req_err"});
    let stub = StubTransport::with_responses(vec![(400, error_body.clone())]);
    let api = api_with(stub);

    let err = api
        .item_public_token_exchange(&ItemPublicTokenExchangeRequest {
            public_token: "bad_tok".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        Error::Backend(ClientError::Api { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, error_body.to_string());
        }
        other => panic!("expected backend passthrough, got {other:?}"),
    }
}

#[tokio::test]
async fn accounts_get_translates_types_and_defaults_fields() {
    let stub = StubTransport::with_responses(vec![(200, accounts_body())]);
    let api = api_with(stub);

    let response = api
        .accounts_get(&AccountsGetRequest {
            access_token: "fuse_at_1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.item.item_id, "conn_1");
    assert_eq!(response.item.institution_id.as_deref(), Some("ins_9"));
    assert_eq!(response.request_id, "req_accounts");
    assert_eq!(response.accounts.len(), 2);

    let checking = &response.accounts[0];
    assert_eq!(checking.account_id, "acc_1");
    assert_eq!(checking.account_type, AccountType::Depository);
    assert_eq!(
        checking.subtype,
        Some(Subtype::Standard(AccountSubtype::Checking))
    );
    assert_eq!(checking.balances.available, Some(100.5));
    assert_eq!(checking.balances.limit, None);
    assert_eq!(checking.balances.unofficial_currency_code, None);
    assert_eq!(checking.fingerprint, "fp_1");

    // Insurance has no upstream type; an unknown subtype lands in the
    // generic bucket.
    let insurance = &response.accounts[1];
    assert_eq!(insurance.account_type, AccountType::Other);
    assert_eq!(
        insurance.subtype,
        Some(Subtype::Standard(AccountSubtype::Other))
    );
}

#[tokio::test]
async fn auth_get_merges_first_detail_entry_with_account_list() {
    let stub = StubTransport::with_responses(vec![
        (
            200,
            json!({
                "financial_connection": {"id": "conn_1", "institution_id": "ins_9"},
                "account_details": [
                    {
                        "remote_id": "acc_1",
                        "ach": {
                            "account": "000123456",
                            "routing": "110000000",
                            "wire_routing": "110000001",
                            "bacs_routing": "10-20-30"
                        }
                    },
                    {
                        "remote_id": "acc_2",
                        "ach": {"account": "000654321", "routing": "110000002"}
                    }
                ],
                "request_id": "req_auth"
            }),
        ),
        (200, accounts_body()),
    ]);
    let api = api_with(stub.clone());

    let response = api
        .auth_get(&AuthGetRequest {
            access_token: "fuse_at_1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.item.item_id, "conn_1");
    assert_eq!(response.request_id, "req_auth");
    assert_eq!(response.accounts.len(), 2);

    // Only the first detail entry contributes routing numbers.
    assert_eq!(response.numbers.ach.len(), 1);
    let ach = &response.numbers.ach[0];
    assert_eq!(ach.account_id, "acc_1");
    assert_eq!(ach.account, "000123456");
    assert_eq!(ach.routing, "110000000");
    assert_eq!(ach.wire_routing.as_deref(), Some("110000001"));

    assert_eq!(response.numbers.bacs.len(), 1);
    assert_eq!(response.numbers.bacs[0].sort_code, "10-20-30");

    // The details call goes out before the accounts call.
    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].url.ends_with("financial_connections/accounts/details"));
    assert!(requests[1].url.ends_with("financial_connections/accounts"));
}

#[tokio::test]
async fn auth_get_without_details_yields_empty_numbers() {
    let stub = StubTransport::with_responses(vec![
        (
            200,
            json!({
                "financial_connection": {"id": "conn_1", "institution_id": "ins_9"},
                "account_details": [],
                "request_id": "req_auth"
            }),
        ),
        (200, accounts_body()),
    ]);
    let api = api_with(stub);

    let response = api
        .auth_get(&AuthGetRequest {
            access_token: "fuse_at_1".to_string(),
        })
        .await
        .unwrap();

    assert!(response.numbers.ach.is_empty());
    assert!(response.numbers.bacs.is_empty());
    assert_eq!(response.accounts.len(), 2);
}

#[tokio::test]
async fn balance_refresh_joins_by_account_id() {
    let stub = StubTransport::with_responses(vec![
        (
            200,
            json!({
                "balances": [
                    {
                        "remote_account_id": "acc_1",
                        "available": 90.0,
                        "current": 95.0,
                        "iso_currency_code": "USD"
                    },
                    {
                        "remote_account_id": "acc_2",
                        "available": null,
                        "current": 4900.0,
                        "iso_currency_code": "USD"
                    }
                ],
                "request_id": "req_balances"
            }),
        ),
        (200, accounts_body()),
    ]);
    let api = api_with(stub);

    let response = api
        .accounts_balance_get(&AccountsBalanceGetRequest {
            access_token: "fuse_at_1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.request_id, "req_balances");

    let refreshed = &response.accounts[0];
    assert_eq!(refreshed.balances.available, Some(90.0));
    assert_eq!(refreshed.balances.current, Some(95.0));
    assert_eq!(refreshed.balances.limit, None);
    assert_eq!(refreshed.balances.last_updated_datetime, None);
}

#[tokio::test]
async fn balance_refresh_surfaces_missing_balance_as_error() {
    let stub = StubTransport::with_responses(vec![
        (
            200,
            json!({
                "balances": [
                    {
                        "remote_account_id": "acc_1",
                        "available": 100.0,
                        "current": 100.0,
                        "iso_currency_code": "USD"
                    }
                ],
                "request_id": "req_balances"
            }),
        ),
        (200, accounts_body()),
    ]);
    let api = api_with(stub);

    let err = api
        .accounts_balance_get(&AccountsBalanceGetRequest {
            access_token: "fuse_at_1".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        Error::MissingBalance { account_id } => assert_eq!(account_id, "acc_2"),
        other => panic!("expected missing balance error, got {other:?}"),
    }
}

#[tokio::test]
async fn session_create_passes_through() {
    let stub = StubTransport::with_responses(vec![(
        200,
        json!({
            "client_secret": "sess_secret",
            "expiration": "2023-05-01T01:00:00Z",
            "request_id": "req_session"
        }),
    )]);
    let api = api_with(stub.clone());

    let response = api
        .session_create(&CreateSessionRequest {
            supported_financial_institution_aggregators: vec![
                Aggregator::Plaid,
                Aggregator::Teller,
                Aggregator::Mx,
            ],
            extra: serde_json::Map::new(),
        })
        .await
        .unwrap();

    assert_eq!(response.client_secret, "sess_secret");
    assert_eq!(response.request_id, "req_session");

    let body = stub.request_body(0);
    assert_eq!(
        body["supported_financial_institution_aggregators"],
        json!(["plaid", "teller", "mx"])
    );
}

#[tokio::test]
async fn verify_delegates_to_backend_signature_check() {
    let api = api_with(StubTransport::default());
    let body = r#"{"webhook_type":"financial_connection.sync_data"}"#;

    let mut mac = Hmac::<Sha256>::new_from_slice(b"key_123").unwrap();
    mac.update(body.as_bytes());
    let signature = base64::encode_config(mac.finalize().into_bytes(), base64::URL_SAFE);

    let mut headers = HashMap::new();
    headers.insert(VERIFICATION_HEADER.to_string(), signature);

    assert!(api.verify(body, &headers));
    assert!(!api.verify(r#"{"tampered":true}"#, &headers));
}
