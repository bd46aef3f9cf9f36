use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Every official is paid the same.
pub const OFFICIAL_SALARY: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Current,
}

impl AccountType {
    /// Maps the one-letter answer of the account-type prompt (`s` or `c`).
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim().to_lowercase().as_str() {
            "s" => Some(AccountType::Savings),
            "c" => Some(AccountType::Current),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Savings => write!(f, "savings"),
            AccountType::Current => write!(f, "current"),
        }
    }
}

/// Role-specific part of a member. Stored flat next to the common fields,
/// tagged by the `role` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Role {
    Customer {
        #[serde(rename = "account type")]
        account_type: AccountType,
        #[serde(rename = "account number")]
        account_number: String,
        balance: i64,
    },
    Official {
        salary: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub role: Role,
}

impl Member {
    pub fn customer(
        id: u64,
        name: &str,
        email: &str,
        password: &str,
        account_type: AccountType,
        opened_at: &NaiveDateTime,
    ) -> Self {
        Member {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Customer {
                account_type,
                account_number: account_number(opened_at, id),
                balance: 0,
            },
        }
    }

    pub fn official(id: u64, name: &str, email: &str, password: &str) -> Self {
        Member {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: Role::Official {
                salary: OFFICIAL_SALARY,
            },
        }
    }

    pub fn is_official(&self) -> bool {
        matches!(self.role, Role::Official { .. })
    }

    pub fn balance(&self) -> Option<i64> {
        match self.role {
            Role::Customer { balance, .. } => Some(balance),
            Role::Official { .. } => None,
        }
    }

    pub fn account_number(&self) -> Option<&str> {
        match &self.role {
            Role::Customer { account_number, .. } => Some(account_number),
            Role::Official { .. } => None,
        }
    }

    /// Mutable handle on the balance, `None` for officials.
    pub fn balance_mut(&mut self) -> Option<&mut i64> {
        match &mut self.role {
            Role::Customer { balance, .. } => Some(balance),
            Role::Official { .. } => None,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "email: {}", self.email)?;
        match &self.role {
            Role::Customer {
                account_type,
                account_number,
                balance,
            } => {
                writeln!(f, "role: customer")?;
                writeln!(f, "account type: {account_type}")?;
                writeln!(f, "account number: {account_number}")?;
                write!(f, "balance: {balance}")
            }
            Role::Official { salary } => {
                writeln!(f, "role: official")?;
                write!(f, "salary: {salary}")
            }
        }
    }
}

/// Account numbers are the opening timestamp's fields run together, then
/// the member id. Two accounts opened in the same microsecond collide.
pub fn account_number(opened_at: &NaiveDateTime, id: u64) -> String {
    format!(
        "{}{}{}{}{}{}{}{}",
        opened_at.nanosecond() / 1_000,
        opened_at.second(),
        opened_at.hour(),
        opened_at.weekday().num_days_from_monday(),
        opened_at.day(),
        opened_at.month(),
        opened_at.year(),
        id
    )
}

/// Default email handed to a new official.
pub fn official_email(name: &str) -> String {
    let local: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!("{local}@bank.com")
}

pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
