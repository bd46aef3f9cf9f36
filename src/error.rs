use thiserror::Error;

/// Failures reading or writing the files under the data directory.
#[derive(Error, Debug)]
pub enum Store {
    #[error("could not access the data files: {0}")]
    Io(#[from] std::io::Error),

    #[error("member database is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transaction log is corrupt: {0}")]
    Csv(#[from] csv::Error),

    #[error("member counter holds {0:?}, expected a number")]
    Counter(String),
}

#[derive(Error, Debug)]
pub enum Bank {
    #[error("invalid input")]
    InvalidInput,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("email {0} already exists in our database, please use another email")]
    EmailTaken(String),

    #[error("email {0} not found")]
    EmailNotFound(String),

    #[error("password incorrect")]
    IncorrectPassword,

    #[error("email and password not found, there is no database")]
    NoDatabase,

    #[error("insufficient funds, current balance is N{0}")]
    InsufficientFunds(i64),

    #[error("account number {0} not found")]
    AccountNotFound(String),

    #[error("you can't deposit more than N{limit} at a time")]
    OverLimit { limit: i64 },

    #[error("the balance of {0} cannot hold that amount")]
    BalanceOverflow(String),

    #[error("{0} does not hold a customer account")]
    NotACustomer(String),

    #[error("you don't have access to this portal")]
    AccessDenied,

    #[error(transparent)]
    Store(#[from] Store),
}

/// Failures of the interactive dialogue itself.
#[derive(Error, Debug)]
pub enum Session {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not print statement: {0}")]
    Csv(#[from] csv::Error),

    #[error("input ended")]
    EndOfInput,
}
