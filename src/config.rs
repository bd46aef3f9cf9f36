use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::Store;

#[derive(Parser, Debug)]
#[command(author, version, about = "File-backed banking simulation")]
pub struct Args {
    /// Directory holding `database.json`, `member_count.txt` and `records.csv`
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Registers a bank official without going through the admin portal
    AddOfficial {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
}

impl Args {
    pub fn store(&self) -> Store {
        Store::open(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_interactive_in_current_dir() {
        let args = Args::try_parse_from(["bank-cli"]).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_add_official() {
        let args = Args::try_parse_from([
            "bank-cli",
            "--data-dir",
            "/tmp/bank",
            "add-official",
            "--name",
            "Jane Roe",
            "--password",
            "qwerty",
        ])
        .unwrap();

        assert_eq!(args.data_dir, PathBuf::from("/tmp/bank"));
        assert_eq!(
            args.command,
            Some(Command::AddOfficial {
                name: "Jane Roe".into(),
                password: "qwerty".into(),
            })
        );
    }

    #[test]
    fn test_add_official_needs_password() {
        assert!(Args::try_parse_from(["bank-cli", "add-official", "--name", "Jane"]).is_err());
    }
}
