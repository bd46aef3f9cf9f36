use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use log::debug;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Store as StoreError;
use crate::member::Member;
use crate::record::Record;

pub const DATABASE_FILE: &str = "database.json";
pub const MEMBER_COUNT_FILE: &str = "member_count.txt";
pub const RECORDS_FILE: &str = "records.csv";

/// Members keyed by email.
pub type Members = BTreeMap<String, Member>;

/// The three files backing the bank. Every call goes to disk; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct Store {
    database: PathBuf,
    member_count: PathBuf,
    records: PathBuf,
}

impl Store {
    pub fn open(dir: &Path) -> Self {
        Store {
            database: dir.join(DATABASE_FILE),
            member_count: dir.join(MEMBER_COUNT_FILE),
            records: dir.join(RECORDS_FILE),
        }
    }

    /// Reads the member database, `None` when there is none yet.
    pub fn load(&self) -> Result<Option<Members>, StoreError> {
        let raw = match fs::read_to_string(&self.database) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let members: Members = serde_json::from_str(&raw)?;
        debug!("loaded {} members from {}", members.len(), self.database.display());
        Ok(Some(members))
    }

    /// Like [`Store::load`], treating a missing database as an empty one.
    pub fn load_or_default(&self) -> Result<Members, StoreError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Overwrites the whole database.
    pub fn save(&self, members: &Members) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        members.serialize(&mut ser)?;
        fs::write(&self.database, buf)?;
        debug!("saved {} members to {}", members.len(), self.database.display());
        Ok(())
    }

    /// Id the next member will get. Starts at 1 without a counter file.
    pub fn next_id(&self) -> Result<u64, StoreError> {
        match fs::read_to_string(&self.member_count) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| StoreError::Counter(raw.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(1),
            Err(e) => Err(e.into()),
        }
    }

    pub fn advance_id(&self) -> Result<(), StoreError> {
        let next = self.next_id()? + 1;
        fs::write(&self.member_count, next.to_string())?;
        Ok(())
    }

    /// Appends to the transaction log, writing the header when the log is new.
    pub fn append(&self, record: &Record) -> Result<(), StoreError> {
        let is_new = !self.records.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.records)?;
        let mut wtr = WriterBuilder::new().has_headers(is_new).from_writer(file);
        wtr.serialize(record)?;
        wtr.flush()?;
        debug!("logged {:?} of {} for {}", record.transaction, record.amount, record.user);
        Ok(())
    }

    /// Log entries of one member, oldest first.
    pub fn records_for(&self, email: &str) -> Result<Vec<Record>, StoreError> {
        if !self.records.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::Reader::from_path(&self.records)?;
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: Record = result?;
            if record.user == email {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Fresh, empty directory under the system temp dir for one test.
#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bank-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::AccountType;
    use crate::record::Kind;
    use chrono::NaiveDate;

    fn at() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_load_without_database() {
        let store = Store::open(&scratch_dir("store-no-db"));
        assert!(store.load().unwrap().is_none());
        assert!(store.load_or_default().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("store-save-load");
        let store = Store::open(&dir);
        let mut members = Members::new();
        let ada = Member::customer(1, "Ada", "ada@mail.com", "pw", AccountType::Current, &at());
        members.insert(ada.email.clone(), ada.clone());
        store.save(&members).unwrap();

        let raw = fs::read_to_string(dir.join(DATABASE_FILE)).unwrap();
        assert!(raw.contains("\n    \"ada@mail.com\": {"));

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.get("ada@mail.com"), Some(&ada));
    }

    #[test]
    fn test_member_counter() {
        let dir = scratch_dir("store-counter");
        let store = Store::open(&dir);
        assert_eq!(store.next_id().unwrap(), 1);
        store.advance_id().unwrap();
        store.advance_id().unwrap();
        assert_eq!(store.next_id().unwrap(), 3);

        fs::write(dir.join(MEMBER_COUNT_FILE), "three").unwrap();
        assert!(matches!(store.next_id(), Err(StoreError::Counter(_))));
    }

    #[test]
    fn test_log_header_written_once() {
        let dir = scratch_dir("store-log");
        let store = Store::open(&dir);
        store
            .append(&Record::new("ada@mail.com", Kind::Deposit, 10, None, &at()))
            .unwrap();
        store
            .append(&Record::new("bola@mail.com", Kind::Withdrawal, 5, None, &at()))
            .unwrap();
        store
            .append(&Record::new("ada@mail.com", Kind::Transfer, 3, Some("Bola"), &at()))
            .unwrap();

        let raw = fs::read_to_string(dir.join(RECORDS_FILE)).unwrap();
        assert_eq!(raw.matches("user,time").count(), 1);

        let ada = store.records_for("ada@mail.com").unwrap();
        assert_eq!(ada.len(), 2);
        assert_eq!(ada[1].transaction, Kind::Transfer);
        assert_eq!(ada[1].account.as_deref(), Some("Bola"));
        assert!(store.records_for("nobody@mail.com").unwrap().is_empty());
    }
}
