//! Plaid-shaped request and response records.
//!
//! These mirror the upstream wire contract so existing Plaid callers can
//! deserialize responses without modification. Every record is built
//! fresh per call from a backend response and handed to the caller;
//! nothing here is cached or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkUser {
    pub client_user_id: String,
}

/// MX-specific link options. When the block is present its `config`
/// payload is required; the adapter rejects the request otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MxOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenCreateRequest {
    pub client_name: String,
    pub user: LinkUser,
    /// Fuse institution to link against, promoted to a top-level backend
    /// field and stripped from the passthrough config.
    pub fuse_institution_id: String,
    /// Session secret from a prior `session_create`, promoted the same
    /// way.
    pub session_client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mx: Option<MxOptions>,
    /// Remaining Plaid-shaped fields (language, country codes, products,
    /// webhook, ...). Forwarded verbatim inside the passthrough config.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenCreateResponse {
    pub link_token: String,
    pub expiration: DateTime<Utc>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPublicTokenExchangeRequest {
    pub public_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPublicTokenExchangeResponse {
    pub access_token: String,
    pub item_id: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsGetRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGetRequest {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsBalanceGetRequest {
    pub access_token: String,
}

/// One linked financial connection in upstream terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    #[serde(default)]
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub available: Option<f64>,
    pub current: Option<f64>,
    pub limit: Option<f64>,
    pub iso_currency_code: Option<String>,
    pub unofficial_currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_datetime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBase {
    pub account_id: String,
    pub balances: AccountBalance,
    pub mask: Option<String>,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub subtype: Option<Subtype>,
    /// Stable de-duplication key carried over from the backend.
    pub fingerprint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsGetResponse {
    pub accounts: Vec<AccountBase>,
    pub item: Item,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumbersAch {
    pub account_id: String,
    pub account: String,
    pub routing: String,
    pub wire_routing: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumbersBacs {
    pub account_id: String,
    pub account: String,
    pub sort_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthGetNumbers {
    pub ach: Vec<NumbersAch>,
    pub bacs: Vec<NumbersBacs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGetResponse {
    pub accounts: Vec<AccountBase>,
    pub numbers: AuthGetNumbers,
    pub item: Item,
    pub request_id: String,
}

/// Upstream account type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Investment,
    Credit,
    Depository,
    Loan,
    Brokerage,
    Other,
}

/// Upstream account subtype vocabulary. Wire names follow the upstream
/// contract exactly, including its space-separated multi-word values and
/// the odd capital in `403B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountSubtype {
    Checking,
    Savings,
    Hsa,
    Cd,
    #[serde(rename = "money market")]
    MoneyMarket,
    Paypal,
    Prepaid,
    #[serde(rename = "cash management")]
    CashManagement,
    Ebt,
    #[serde(rename = "credit card")]
    CreditCard,
    Auto,
    Business,
    Commercial,
    Construction,
    Consumer,
    #[serde(rename = "home equity")]
    HomeEquity,
    Loan,
    Mortgage,
    Overdraft,
    #[serde(rename = "line of credit")]
    LineOfCredit,
    Student,
    #[serde(rename = "529")]
    Plan529,
    #[serde(rename = "401a")]
    Plan401a,
    #[serde(rename = "401k")]
    Plan401k,
    #[serde(rename = "403B")]
    Plan403b,
    #[serde(rename = "457b")]
    Plan457b,
    Brokerage,
    #[serde(rename = "cash isa")]
    CashIsa,
    #[serde(rename = "crypto exchange")]
    CryptoExchange,
    #[serde(rename = "education savings account")]
    EducationSavingsAccount,
    #[serde(rename = "fixed annuity")]
    FixedAnnuity,
    Gic,
    #[serde(rename = "health reimbursement arrangement")]
    HealthReimbursementArrangement,
    Ira,
    Isa,
    Keogh,
    Lif,
    #[serde(rename = "life insurance")]
    LifeInsurance,
    Lira,
    Lrif,
    Lrsp,
    #[serde(rename = "mutual fund")]
    MutualFund,
    #[serde(rename = "non-custodial wallet")]
    NonCustodialWallet,
    #[serde(rename = "non-taxable brokerage account")]
    NonTaxableBrokerageAccount,
    #[serde(rename = "other annuity")]
    OtherAnnuity,
    #[serde(rename = "other insurance")]
    OtherInsurance,
    Pension,
    Prif,
    #[serde(rename = "profit sharing plan")]
    ProfitSharingPlan,
    Rdsp,
    Resp,
    Retirement,
    Rlif,
    Roth,
    #[serde(rename = "roth 401k")]
    Roth401k,
    Rrif,
    Rrsp,
    Sarsep,
    #[serde(rename = "sep ira")]
    SepIra,
    #[serde(rename = "simple ira")]
    SimpleIra,
    Sipp,
    #[serde(rename = "stock plan")]
    StockPlan,
    Tfsa,
    Trust,
    Ugma,
    Utma,
    #[serde(rename = "variable annuity")]
    VariableAnnuity,
    Other,
}

/// Subtype values that only exist in the upstream investment vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentAccountSubtype {
    Qshr,
}

/// Union of the standard and investment subtype vocabularies. The
/// translator produces this explicitly instead of widening one
/// vocabulary into the other; on the wire both arms serialize as the
/// bare subtype string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subtype {
    Standard(AccountSubtype),
    Investment(InvestmentAccountSubtype),
}
