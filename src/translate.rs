//! Cross-walk between the Fuse account vocabulary and the upstream one.
//!
//! Exactly one mapping table exists; [`MAPPING_VERSION`] tags the
//! upstream schema revision it tracks. Both functions are total over the
//! backend vocabulary: anything the backend adds later arrives as the
//! `Other` variant and lands in the generic bucket, which is the
//! documented fallback rather than an error.

use fuse_client::model::{FuseAccount, FuseAccountSubtype, FuseAccountType};

use crate::model::{
    AccountBalance, AccountBase, AccountSubtype, AccountType, InvestmentAccountSubtype, Subtype,
};

/// Upstream schema revision the mapping table tracks.
pub const MAPPING_VERSION: &str = "2023-05";

pub fn account_type_to_plaid(value: FuseAccountType) -> AccountType {
    match value {
        FuseAccountType::Credit => AccountType::Credit,
        FuseAccountType::Depository => AccountType::Depository,
        FuseAccountType::Investment => AccountType::Investment,
        FuseAccountType::Loan => AccountType::Loan,
        // Insurance and property accounts have no upstream equivalent.
        FuseAccountType::Insurance | FuseAccountType::Property | FuseAccountType::Other => {
            AccountType::Other
        }
    }
}

pub fn account_subtype_to_plaid(value: FuseAccountSubtype) -> Subtype {
    use AccountSubtype::*;

    let subtype = match value {
        FuseAccountSubtype::Checking => Checking,
        FuseAccountSubtype::Savings => Savings,
        FuseAccountSubtype::Hsa => Hsa,
        FuseAccountSubtype::CertificateOfDeposit => Cd,
        FuseAccountSubtype::MoneyMarket => MoneyMarket,
        FuseAccountSubtype::Paypal => Paypal,
        FuseAccountSubtype::Prepaid => Prepaid,
        FuseAccountSubtype::CashManagement => CashManagement,
        FuseAccountSubtype::Ebt => Ebt,
        FuseAccountSubtype::CreditCard => CreditCard,
        FuseAccountSubtype::Auto => Auto,
        FuseAccountSubtype::Business => Business,
        FuseAccountSubtype::Commercial => Commercial,
        FuseAccountSubtype::Construction => Construction,
        FuseAccountSubtype::Consumer => Consumer,
        FuseAccountSubtype::HomeEquity => HomeEquity,
        FuseAccountSubtype::Loan => Loan,
        FuseAccountSubtype::Mortgage => Mortgage,
        FuseAccountSubtype::Overdraft => Overdraft,
        FuseAccountSubtype::LineOfCredit => LineOfCredit,
        FuseAccountSubtype::Student => Student,
        FuseAccountSubtype::Plan529 => Plan529,
        FuseAccountSubtype::Plan401a => Plan401a,
        FuseAccountSubtype::Plan401k => Plan401k,
        FuseAccountSubtype::Plan403b => Plan403b,
        FuseAccountSubtype::Plan457b => Plan457b,
        FuseAccountSubtype::Brokerage => Brokerage,
        FuseAccountSubtype::CashIsa => CashIsa,
        FuseAccountSubtype::CryptoExchange => CryptoExchange,
        FuseAccountSubtype::EducationSavingAccount => EducationSavingsAccount,
        FuseAccountSubtype::FixedAnnuity => FixedAnnuity,
        FuseAccountSubtype::Gic => Gic,
        FuseAccountSubtype::HealthReimbursementArrangement => HealthReimbursementArrangement,
        FuseAccountSubtype::Ira => Ira,
        FuseAccountSubtype::Isa => Isa,
        FuseAccountSubtype::Keogh => Keogh,
        FuseAccountSubtype::Lif => Lif,
        FuseAccountSubtype::LifeInsurance => LifeInsurance,
        FuseAccountSubtype::Lira => Lira,
        FuseAccountSubtype::Lrif => Lrif,
        FuseAccountSubtype::Lrsp => Lrsp,
        FuseAccountSubtype::MutualFund => MutualFund,
        FuseAccountSubtype::NonCustodialWallet => NonCustodialWallet,
        FuseAccountSubtype::NonTaxableBrokerageAccount => NonTaxableBrokerageAccount,
        FuseAccountSubtype::OtherAnnuity => OtherAnnuity,
        FuseAccountSubtype::OtherInsurance => OtherInsurance,
        FuseAccountSubtype::Pension => Pension,
        FuseAccountSubtype::Prif => Prif,
        FuseAccountSubtype::ProfitSharingPlan => ProfitSharingPlan,
        // The one subtype that only exists in the investment vocabulary.
        FuseAccountSubtype::Qshr => {
            return Subtype::Investment(InvestmentAccountSubtype::Qshr);
        }
        FuseAccountSubtype::Rdsp => Rdsp,
        FuseAccountSubtype::Resp => Resp,
        FuseAccountSubtype::Retirement => Retirement,
        FuseAccountSubtype::Rlif => Rlif,
        FuseAccountSubtype::RothIra => Roth,
        FuseAccountSubtype::Roth401k => Roth401k,
        FuseAccountSubtype::Rrif => Rrif,
        FuseAccountSubtype::Rrsp => Rrsp,
        FuseAccountSubtype::Sarsep => Sarsep,
        FuseAccountSubtype::SepIra => SepIra,
        FuseAccountSubtype::SimpleIra => SimpleIra,
        FuseAccountSubtype::Sipp => Sipp,
        FuseAccountSubtype::StockPlan => StockPlan,
        FuseAccountSubtype::Tfsa => Tfsa,
        FuseAccountSubtype::Trust => Trust,
        FuseAccountSubtype::Ugma => Ugma,
        FuseAccountSubtype::Utma => Utma,
        FuseAccountSubtype::VariableAnnuity => VariableAnnuity,
        FuseAccountSubtype::Other => Other,
    };

    Subtype::Standard(subtype)
}

/// Shapes one backend account into the upstream record. `limit` and
/// `unofficial_currency_code` have no backend source and stay absent.
pub fn account_to_plaid(account: FuseAccount) -> AccountBase {
    AccountBase {
        account_id: account.remote_id,
        balances: AccountBalance {
            available: account.balance.available,
            current: account.balance.current,
            limit: None,
            iso_currency_code: account.balance.iso_currency_code,
            unofficial_currency_code: None,
            last_updated_datetime: account.balance.last_updated_date,
        },
        mask: account.mask,
        name: account.name,
        official_name: None,
        account_type: account_type_to_plaid(account.account_type),
        subtype: account.subtype.map(account_subtype_to_plaid),
        fingerprint: account.fingerprint,
    }
}
