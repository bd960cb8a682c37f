use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::LedgerError;

/// The nature of an account; decides its normal balance side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "asset",
            AccountType::Liability => "liability",
            AccountType::Equity => "equity",
            AccountType::Income => "income",
            AccountType::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(AccountType::Asset),
            "liability" => Ok(AccountType::Liability),
            "equity" | "owners equity" => Ok(AccountType::Equity),
            "income" | "revenue" => Ok(AccountType::Income),
            "expense" => Ok(AccountType::Expense),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown account type: {other}"
            ))),
        }
    }
}

/// Stable identifier of an account in the embedding application.
///
/// Applications key accounts by integers or by opaque strings, so both
/// convert into the same string-backed id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self::new(value.to_string())
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Implemented by the application's account model.
///
/// Transactions only rely on `id` (uniqueness) and `name` (display).
pub trait Account: fmt::Debug {
    fn id(&self) -> AccountId;
    fn name(&self) -> &str;
    fn description(&self) -> String;
    fn account_type(&self) -> AccountType;
}

/// Plain in-memory account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAccount {
    pub id: AccountId,
    pub name: String,
    pub account_type: AccountType,
}

impl BasicAccount {
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
        }
    }
}

impl Account for BasicAccount {
    fn id(&self) -> AccountId {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Account recording all {}", self.name)
    }

    fn account_type(&self) -> AccountType {
        self.account_type
    }
}
