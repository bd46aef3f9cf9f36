use std::error::Error;
use std::io;

use bank_cli::bank::Bank;
use bank_cli::config::{Args, Command};
use bank_cli::session::Session;
use clap::Parser;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let bank = Bank::new(args.store());

    match args.command {
        Some(Command::AddOfficial { name, password }) => {
            let official = bank.open_official(&name, &password, &password)?;
            println!("{}", official.email);
        }
        None => {
            let stdin = io::stdin();
            Session::new(bank, stdin.lock(), io::stdout()).run()?;
        }
    }

    Ok(())
}
