//! Wire types for the Fuse API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bank-connectivity providers Fuse aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregator {
    Plaid,
    Teller,
    Mx,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub supported_financial_institution_aggregators: Vec<Aggregator>,
    /// Any remaining session fields, forwarded verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub client_secret: String,
    pub expiration: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
}

/// Provider-specific block nested under the link token request. The
/// `config` payload is opaque to Fuse and handed to the provider as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaidPassthrough {
    pub config: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkTokenRequest {
    pub entity: Entity,
    pub session_client_secret: String,
    pub institution_id: String,
    pub client_name: String,
    pub plaid: PlaidPassthrough,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkTokenResponse {
    pub link_token: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangePublicTokenRequest {
    pub public_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangePublicTokenResponse {
    pub access_token: String,
    pub financial_connection_id: String,
    pub request_id: String,
}

/// Request body shared by the accounts, account details, and balances
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenRequest {
    pub access_token: String,
}

/// One linked connection between an end user and an institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialConnection {
    pub id: String,
    #[serde(default)]
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuseAccountBalance {
    pub available: Option<f64>,
    pub current: Option<f64>,
    pub iso_currency_code: Option<String>,
    #[serde(default)]
    pub last_updated_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuseAccount {
    /// Account id as known by the underlying provider.
    pub remote_id: String,
    /// Stable de-duplication key across aggregators.
    pub fingerprint: String,
    pub mask: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: FuseAccountType,
    #[serde(default)]
    pub subtype: Option<FuseAccountSubtype>,
    pub balance: FuseAccountBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountsResponse {
    pub financial_connection: FinancialConnection,
    pub accounts: Vec<FuseAccount>,
    pub request_id: String,
}

/// Payment-routing numbers for one account. `bacs_routing` is the UK
/// sort code and is absent for US-only accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchNumbers {
    pub account: String,
    pub routing: String,
    #[serde(default)]
    pub wire_routing: Option<String>,
    #[serde(default)]
    pub bacs_routing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuseAccountDetails {
    pub remote_id: String,
    pub ach: AchNumbers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountDetailsResponse {
    pub financial_connection: FinancialConnection,
    pub account_details: Vec<FuseAccountDetails>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuseBalance {
    pub remote_account_id: String,
    pub available: Option<f64>,
    pub current: Option<f64>,
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBalancesResponse {
    pub balances: Vec<FuseBalance>,
    pub request_id: String,
}

/// Account type vocabulary as Fuse reports it. Values the enum does not
/// know yet deserialize to `Other`, so additions on the backend side
/// never break decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuseAccountType {
    Credit,
    Depository,
    Insurance,
    Investment,
    Loan,
    Property,
    #[serde(other)]
    Other,
}

/// Account subtype vocabulary as Fuse reports it. Same fallback rule as
/// [`FuseAccountType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuseAccountSubtype {
    Checking,
    Savings,
    Hsa,
    CertificateOfDeposit,
    MoneyMarket,
    Paypal,
    Prepaid,
    CashManagement,
    Ebt,
    CreditCard,
    Auto,
    Business,
    Commercial,
    Construction,
    Consumer,
    HomeEquity,
    Loan,
    Mortgage,
    Overdraft,
    LineOfCredit,
    Student,
    #[serde(rename = "529")]
    Plan529,
    #[serde(rename = "401a")]
    Plan401a,
    #[serde(rename = "401k")]
    Plan401k,
    #[serde(rename = "403b")]
    Plan403b,
    #[serde(rename = "457b")]
    Plan457b,
    Brokerage,
    CashIsa,
    CryptoExchange,
    EducationSavingAccount,
    FixedAnnuity,
    Gic,
    HealthReimbursementArrangement,
    Ira,
    Isa,
    Keogh,
    Lif,
    LifeInsurance,
    Lira,
    Lrif,
    Lrsp,
    MutualFund,
    NonCustodialWallet,
    NonTaxableBrokerageAccount,
    OtherAnnuity,
    OtherInsurance,
    Pension,
    Prif,
    ProfitSharingPlan,
    Qshr,
    Rdsp,
    Resp,
    Retirement,
    Rlif,
    RothIra,
    #[serde(rename = "roth_401k")]
    Roth401k,
    Rrif,
    Rrsp,
    Sarsep,
    SepIra,
    SimpleIra,
    Sipp,
    StockPlan,
    Tfsa,
    Trust,
    Ugma,
    Utma,
    VariableAnnuity,
    #[serde(other)]
    Other,
}
