use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Deposit,
    Withdrawal,
    Transfer,
}

/// One line of the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub user: String,
    pub time: String,
    pub date: String,
    pub transaction: Kind,
    pub amount: i64,
    // Recipient name, transfers only
    pub account: Option<String>,
}

impl Record {
    pub fn new(
        user: &str,
        transaction: Kind,
        amount: i64,
        account: Option<&str>,
        at: &NaiveDateTime,
    ) -> Self {
        Record {
            user: user.to_string(),
            time: at.format("%H:%M").to_string(),
            date: at.format("%Y-%m-%d").to_string(),
            transaction,
            amount,
            account: account.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_formats_timestamp() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let record = Record::new("ada@mail.com", Kind::Transfer, 250, Some("Bola Ade"), &at);

        assert_eq!(record.time, "09:05");
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.account.as_deref(), Some("Bola Ade"));
    }

    #[test]
    fn test_csv_row_layout() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(17, 30, 0)
            .unwrap();
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(Record::new("ada@mail.com", Kind::Deposit, 1000, None, &at))
            .unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(
            out,
            "user,time,date,transaction,amount,account\nada@mail.com,17:30,2024-01-02,deposit,1000,\n"
        );
    }
}
