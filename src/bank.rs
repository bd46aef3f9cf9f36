use chrono::{Local, NaiveDateTime, Timelike};
use log::{info, warn};

use crate::error::Bank as BankError;
use crate::member::{self, AccountType, Member, Role, OFFICIAL_SALARY};
use crate::record::{Kind, Record};
use crate::store::{Members, Store};

/// Largest amount a single deposit may carry.
pub const DEPOSIT_LIMIT: i64 = 999_999;

/// Answers given when a customer opens an account, unvalidated.
#[derive(Debug, Clone, Copy)]
pub struct Application<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub account_type: &'a str,
    pub password: &'a str,
    pub confirm: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Customer,
    Official,
}

/// A single change an official can make to a member record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    AccountNumber(String),
    AccountType(AccountType),
    Role(RoleKind),
    Balance(i64),
    Name(String),
    Email(String),
}

pub struct Bank {
    store: Store,
}

impl Bank {
    pub fn new(store: Store) -> Self {
        Bank { store }
    }

    pub fn open_account(&self, application: Application) -> Result<Member, BankError> {
        let name = member::title_case(application.name);
        let email = application.email.trim().to_lowercase();
        if name.is_empty()
            || email.is_empty()
            || application.password.is_empty()
            || application.confirm.is_empty()
        {
            return Err(BankError::InvalidInput);
        }
        let Some(account_type) = AccountType::from_choice(application.account_type) else {
            return Err(BankError::InvalidInput);
        };
        if application.password != application.confirm {
            return Err(BankError::PasswordMismatch);
        }

        let mut members = self.store.load_or_default()?;
        if members.contains_key(&email) {
            warn!("refused to open a second account for {email}");
            return Err(BankError::EmailTaken(email));
        }

        let id = self.store.next_id()?;
        let customer = Member::customer(
            id,
            &name,
            &email,
            application.password,
            account_type,
            &now(),
        );
        self.insert(&mut members, customer)
    }

    pub fn open_official(
        &self,
        name: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Member, BankError> {
        let name = member::title_case(name);
        if name.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(BankError::InvalidInput);
        }
        if password != confirm {
            return Err(BankError::PasswordMismatch);
        }

        let mut members = self.store.load_or_default()?;
        let mut email = member::official_email(&name);
        if members.contains_key(&email) {
            let local = email.trim_end_matches("@bank.com");
            email = format!("{local}{}@bank.com", now().second());
        }
        if members.contains_key(&email) {
            return Err(BankError::EmailTaken(email));
        }

        let id = self.store.next_id()?;
        let official = Member::official(id, &name, &email, password);
        self.insert(&mut members, official)
    }

    /// Emails are matched case-insensitively, as they are stored lowercased.
    pub fn login(&self, email: &str, password: &str) -> Result<Member, BankError> {
        if email.is_empty() || password.is_empty() {
            return Err(BankError::InvalidInput);
        }
        let member = self.member(&email.to_lowercase())?;
        if member.password != password {
            warn!("wrong password for {email}");
            return Err(BankError::IncorrectPassword);
        }
        info!("{email} logged in");
        Ok(member)
    }

    /// Credits a customer and returns the new balance.
    pub fn deposit(&self, email: &str, amount: i64) -> Result<i64, BankError> {
        if amount > DEPOSIT_LIMIT {
            return Err(BankError::OverLimit {
                limit: DEPOSIT_LIMIT,
            });
        }

        let mut members = self.members()?;
        let balance = balance_mut(&mut members, email)?;
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| BankError::BalanceOverflow(email.to_string()))?;
        let new_balance = *balance;

        self.store.save(&members)?;
        self.store
            .append(&Record::new(email, Kind::Deposit, amount, None, &now()))?;
        info!("{email} deposited {amount}");
        Ok(new_balance)
    }

    /// Debits a customer and returns the new balance.
    pub fn withdraw(&self, email: &str, amount: i64) -> Result<i64, BankError> {
        let mut members = self.members()?;
        let balance = balance_mut(&mut members, email)?;
        if *balance < amount {
            warn!("{email} tried to withdraw {amount} with {balance} available");
            return Err(BankError::InsufficientFunds(*balance));
        }
        *balance -= amount;
        let new_balance = *balance;

        self.store.save(&members)?;
        self.store
            .append(&Record::new(email, Kind::Withdrawal, amount, None, &now()))?;
        info!("{email} withdrew {amount}");
        Ok(new_balance)
    }

    /// Moves money to whichever customer holds `account_number` and returns
    /// the recipient's name.
    pub fn transfer(
        &self,
        email: &str,
        amount: i64,
        account_number: &str,
    ) -> Result<String, BankError> {
        let mut members = self.members()?;

        let balance = *balance_mut(&mut members, email)?;
        if amount > balance {
            warn!("{email} tried to transfer {amount} with {balance} available");
            return Err(BankError::InsufficientFunds(balance));
        }

        let (recipient, recipient_name) = members
            .iter()
            .find(|(_, m)| m.account_number() == Some(account_number))
            .map(|(key, m)| (key.clone(), m.name.clone()))
            .ok_or_else(|| BankError::AccountNotFound(account_number.to_string()))?;

        let credited = balance_mut(&mut members, &recipient)?;
        *credited = credited
            .checked_add(amount)
            .ok_or_else(|| BankError::BalanceOverflow(recipient.clone()))?;
        *balance_mut(&mut members, email)? -= amount;

        self.store.save(&members)?;
        self.store.append(&Record::new(
            email,
            Kind::Transfer,
            amount,
            Some(&recipient_name),
            &now(),
        ))?;
        info!("{email} sent {amount} to {recipient}");
        Ok(recipient_name)
    }

    pub fn balance(&self, email: &str) -> Result<i64, BankError> {
        let mut members = self.members()?;
        Ok(*balance_mut(&mut members, email)?)
    }

    pub fn statement(&self, email: &str) -> Result<Vec<Record>, BankError> {
        Ok(self.store.records_for(email)?)
    }

    pub fn change_password(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), BankError> {
        if password.is_empty() {
            return Err(BankError::InvalidInput);
        }
        if password != confirm {
            return Err(BankError::PasswordMismatch);
        }

        let mut members = self.members()?;
        let member = member_mut(&mut members, email)?;
        member.password = password.to_string();
        self.store.save(&members)?;
        info!("{email} changed password");
        Ok(())
    }

    /// Applies an official's edit to the member stored under `email` and
    /// returns the updated record.
    pub fn edit_member(&self, email: &str, edit: Edit) -> Result<Member, BankError> {
        let mut members = self.members()?;
        let target = member_mut(&mut members, email)?;

        match edit {
            Edit::AccountNumber(number) => match &mut target.role {
                Role::Customer { account_number, .. } => *account_number = number,
                Role::Official { .. } => return Err(BankError::NotACustomer(email.to_string())),
            },
            Edit::AccountType(kind) => match &mut target.role {
                Role::Customer { account_type, .. } => *account_type = kind,
                Role::Official { .. } => return Err(BankError::NotACustomer(email.to_string())),
            },
            Edit::Balance(amount) => {
                *target
                    .balance_mut()
                    .ok_or_else(|| BankError::NotACustomer(email.to_string()))? = amount;
            }
            Edit::Role(RoleKind::Official) => {
                if !target.is_official() {
                    target.role = Role::Official {
                        salary: OFFICIAL_SALARY,
                    };
                }
            }
            Edit::Role(RoleKind::Customer) => {
                if target.is_official() {
                    target.role = Role::Customer {
                        account_type: AccountType::Savings,
                        account_number: member::account_number(&now(), target.id),
                        balance: 0,
                    };
                }
            }
            Edit::Name(name) => target.name = name,
            Edit::Email(new_email) => {
                let new_email = new_email.to_lowercase();
                if new_email != email {
                    if members.contains_key(&new_email) {
                        return Err(BankError::EmailTaken(new_email));
                    }
                    if let Some(mut moved) = members.remove(email) {
                        moved.email.clone_from(&new_email);
                        members.insert(new_email.clone(), moved);
                    }
                }
                self.store.save(&members)?;
                info!("{email} is now {new_email}");
                return self.member(&new_email);
            }
        }

        let updated = target.clone();
        self.store.save(&members)?;
        info!("edited {email}");
        Ok(updated)
    }

    /// Looks a member up in the member store only.
    pub fn member(&self, email: &str) -> Result<Member, BankError> {
        self.members()?
            .remove(email)
            .ok_or_else(|| BankError::EmailNotFound(email.to_string()))
    }

    /// A member with their transaction history, for the admin portal.
    pub fn member_details(&self, email: &str) -> Result<(Member, Vec<Record>), BankError> {
        let member = self.member(email)?;
        let records = self.store.records_for(email)?;
        Ok((member, records))
    }

    fn members(&self) -> Result<Members, BankError> {
        self.store.load()?.ok_or(BankError::NoDatabase)
    }

    fn insert(&self, members: &mut Members, member: Member) -> Result<Member, BankError> {
        members.insert(member.email.clone(), member.clone());
        self.store.save(members)?;
        self.store.advance_id()?;
        info!("opened account {} for {}", member.id, member.email);
        Ok(member)
    }
}

/// Parses an amount typed at a prompt. `_` separators are allowed; the
/// amount must be positive.
pub fn parse_amount(input: &str) -> Result<i64, BankError> {
    let digits: String = input.trim().chars().filter(|c| *c != '_').collect();
    match digits.parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(BankError::InvalidInput),
    }
}

fn member_mut<'m>(members: &'m mut Members, email: &str) -> Result<&'m mut Member, BankError> {
    members
        .get_mut(email)
        .ok_or_else(|| BankError::EmailNotFound(email.to_string()))
}

fn balance_mut<'m>(members: &'m mut Members, email: &str) -> Result<&'m mut i64, BankError> {
    member_mut(members, email)?
        .balance_mut()
        .ok_or_else(|| BankError::NotACustomer(email.to_string()))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
