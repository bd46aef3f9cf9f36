use std::io::{BufRead, Write};

use log::{debug, error};

use crate::bank::{self, Application, Bank, Edit, RoleKind};
use crate::error::{Bank as BankError, Session as SessionError};
use crate::member::{AccountType, Member};
use crate::record::Record;

const MAIN_MENU: &str = "\nWhat would you like to do?\n\n\
    1. Open an account.\n\
    2. Transfer money.\n\
    3. Deposit money.\n\
    4. Withdraw money.\n\
    5. Check balance.\n\
    6. Account statement.\n\
    7. Change password.\n\
    8. Admin transactions.\n\n\
    Reply with a number to begin transaction: ";

const ADMIN_MENU: &str = "What would you like to do?\n\n\
    1. Open an account.\n\
    2. Edit customer details.\n\
    3. Get customer details.\n\
    4. Change password.\n\n\
    Reply with a number to begin transaction: ";

const EDIT_MENU: &str = "\nWhat detail would you like to change?\n\n\
    1. Account number.\n\
    2. Account type.\n\
    3. Role.\n\
    4. Account balance.\n\
    5. Account name.\n\
    6. Account email.\n\n\
    Reply with a number to proceed: ";

/// The terminal dialogue: a menu, one transaction, then "another one?".
pub struct Session<R, W> {
    bank: Bank,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(bank: Bank, input: R, output: W) -> Self {
        Session {
            bank,
            input,
            output,
        }
    }

    /// Runs transactions until the user declines another one or input ends.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            let result = self.start().and_then(|()| self.again());
            match result {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(SessionError::EndOfInput) => {
                    debug!("input ended, closing session");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn start(&mut self) -> Result<(), SessionError> {
        let choice = self.prompt(MAIN_MENU)?;
        match choice.trim() {
            "1" => self.open_account(),
            "2" => self.transfer(),
            "3" => self.deposit(),
            "4" => self.withdraw(),
            "5" => self.check_balance(),
            "6" => self.account_statement(),
            "7" => self.change_password(),
            "8" => self.admin_start(),
            _ => self.say("\n\nSorry, invalid input!!"),
        }
    }

    fn again(&mut self) -> Result<bool, SessionError> {
        loop {
            let answer = self.prompt(
                "\nWould you like to perform another transaction? \
                 Type 'y' for yes or 'n' for no. ",
            )?;
            match answer.trim().to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => {
                    self.say("\nThank you and have a nice day.")?;
                    return Ok(false);
                }
                _ => self.say("\nSorry, invalid input!")?,
            }
        }
    }

    fn login(&mut self) -> Result<Option<Member>, SessionError> {
        self.say("\nPlease login to authorize transaction.")?;
        let email = self.prompt("\nYour email: ")?;
        let password = self.prompt("Your password: ")?;

        match self.bank.login(email.trim(), &password) {
            Ok(member) => {
                self.say("\nLogin Successful!")?;
                Ok(Some(member))
            }
            Err(e) => {
                self.refuse(&e)?;
                Ok(None)
            }
        }
    }

    fn open_account(&mut self) -> Result<(), SessionError> {
        self.say("Opening account...")?;
        let name = self.prompt("What is the name for the account? ")?;
        let email = self.prompt("What is the email for the account? ")?;
        let account_type = self.prompt(
            "What type of account would you like to create?\n\
             Type 'S' for a savings account or 'C' for a current account: ",
        )?;
        let password = self.prompt("Type a password to secure your account: ")?;
        let confirm = self.prompt("Please confirm password: ")?;

        let application = Application {
            name: &name,
            email: &email,
            account_type: &account_type,
            password: &password,
            confirm: &confirm,
        };
        match self.bank.open_account(application) {
            Ok(customer) => self.say(&format!(
                "\nSuccess!! Account has been created. The account number is: {}.",
                customer.account_number().unwrap_or_default()
            )),
            Err(e) => self.refuse(&e),
        }
    }

    fn transfer(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount("\nHow much would you like to transfer? ")? else {
            return Ok(());
        };
        let account_number = self.prompt("\nWhich account number would you like to transfer to? ")?;
        let account_number = account_number.trim();
        if account_number.is_empty() || !account_number.chars().all(|c| c.is_ascii_digit()) {
            return self.refuse(&BankError::InvalidInput);
        }

        match self.bank.transfer(&user.email, amount, account_number) {
            Ok(recipient) => self.say(&format!(
                "Success!! N{amount} has been sent to {recipient}!"
            )),
            Err(e) => self.refuse(&e),
        }
    }

    fn deposit(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount("\nHow much would you like to deposit? ")? else {
            return Ok(());
        };

        match self.bank.deposit(&user.email, amount) {
            Ok(_) => self.say(&format!(
                "Success!! N{amount} has been deposited to {}!",
                user.name
            )),
            Err(e) => self.refuse(&e),
        }
    }

    fn withdraw(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount("\nHow much would you like to withdraw? ")? else {
            return Ok(());
        };

        match self.bank.withdraw(&user.email, amount) {
            Ok(_) => self.say(&format!("Success!! here is your N{amount}! Enjoy!")),
            Err(e) => self.refuse(&e),
        }
    }

    fn check_balance(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        match self.bank.balance(&user.email) {
            Ok(balance) => self.say(&format!(
                "\nYour current account balance is N{balance}."
            )),
            Err(e) => self.refuse(&e),
        }
    }

    fn account_statement(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        match self.bank.statement(&user.email) {
            Ok(records) if records.is_empty() => {
                self.say("\nSorry, you have not made any transactions.")
            }
            Ok(records) => self.print_records(&records),
            Err(e) => self.refuse(&e),
        }
    }

    fn change_password(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        self.new_password(&user)
    }

    fn new_password(&mut self, user: &Member) -> Result<(), SessionError> {
        let password = self.prompt("Type new password: ")?;
        let confirm = self.prompt("Confirm new password: ")?;
        match self.bank.change_password(&user.email, &password, &confirm) {
            Ok(()) => self.say("\nPassword changed successfully."),
            Err(e) => self.refuse(&e),
        }
    }

    fn admin_start(&mut self) -> Result<(), SessionError> {
        let Some(user) = self.login()? else {
            return Ok(());
        };
        if !user.is_official() {
            return self.refuse(&BankError::AccessDenied);
        }

        let choice = self.prompt(&format!("\nGood day {}.\n{ADMIN_MENU}", user.name))?;
        match choice.trim() {
            "1" => self.admin_open_account(),
            "2" => self.edit_member_details(),
            "3" => self.member_details(),
            "4" => self.new_password(&user),
            _ => self.say("\n\nSorry, invalid input!!"),
        }
    }

    fn admin_open_account(&mut self) -> Result<(), SessionError> {
        loop {
            let role = self.prompt(
                "\nWhat type of account would you like to create?\
                 \nType 'A' for an official account and 'B' for a customer account. ",
            )?;
            match role.trim().to_lowercase().as_str() {
                "a" => {
                    self.say("Opening account...")?;
                    let name = self.prompt("What is the name for the account? ")?;
                    let password = self.prompt("Type a password to secure your account: ")?;
                    let confirm = self.prompt("Please confirm password: ")?;

                    match self.bank.open_official(&name, &password, &confirm) {
                        Ok(official) => {
                            return self.say(&format!(
                                "\nSuccess!! Account has been created. Email is {}.",
                                official.email
                            ));
                        }
                        Err(e @ (BankError::InvalidInput | BankError::PasswordMismatch)) => {
                            self.refuse(&e)?;
                        }
                        Err(e) => return self.refuse(&e),
                    }
                }
                "b" => return self.open_account(),
                _ => self.say("\n\nSorry, invalid input!!")?,
            }
        }
    }

    fn edit_member_details(&mut self) -> Result<(), SessionError> {
        loop {
            let Some(email) = self.ask_member("\nEmail of user account you wish to edit: ")? else {
                continue;
            };

            let detail = self.prompt(EDIT_MENU)?;
            let Some(edit) = self.ask_edit(detail.trim())? else {
                continue;
            };

            return match self.bank.edit_member(&email, edit) {
                Ok(_) => self.say("\nDetail changed successfully!"),
                Err(e) => self.refuse(&e),
            };
        }
    }

    fn member_details(&mut self) -> Result<(), SessionError> {
        loop {
            let Some(email) = self.ask_member("\nEmail of customer you wish to see: ")? else {
                continue;
            };
            let (member, records) = match self.bank.member_details(&email) {
                Ok(details) => details,
                Err(e) => return self.refuse(&e),
            };

            self.say("\n-------------Account Details------------------\n")?;
            self.say(&member.to_string())?;
            if records.is_empty() {
                return self.say("\nSorry, customer has not made any transactions.");
            }
            self.say("\n-------------Account Statement------------------\n")?;
            return self.print_records(&records);
        }
    }

    /// Asks for a member's email, `None` (after saying so) when it is unknown.
    fn ask_member(&mut self, question: &str) -> Result<Option<String>, SessionError> {
        let email = self.prompt(question)?.trim().to_lowercase();
        match self.bank.member(&email) {
            Ok(_) => Ok(Some(email)),
            Err(BankError::EmailNotFound(_) | BankError::NoDatabase) => {
                self.say("\nSorry, email not found!!")?;
                Ok(None)
            }
            Err(e) => {
                self.refuse(&e)?;
                Ok(None)
            }
        }
    }

    fn ask_edit(&mut self, detail: &str) -> Result<Option<Edit>, SessionError> {
        let edit = match detail {
            "1" => {
                let number = self.prompt("\nInput new account number: ")?;
                let number = number.trim();
                (!number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
                    .then(|| Edit::AccountNumber(number.to_string()))
            }
            "2" => {
                let choice = self.prompt(
                    "\nInput new account type. Type 's' for savings and 'c' for current. ",
                )?;
                AccountType::from_choice(&choice).map(Edit::AccountType)
            }
            "3" => {
                let choice = self.prompt(
                    "\nInput new user role. Type 'a' for official and 'b' for customer. ",
                )?;
                match choice.trim().to_lowercase().as_str() {
                    "a" => Some(Edit::Role(RoleKind::Official)),
                    "b" => Some(Edit::Role(RoleKind::Customer)),
                    _ => None,
                }
            }
            "4" => {
                let balance = self.prompt("\nInput new account balance: ")?;
                balance.trim().parse().ok().map(Edit::Balance)
            }
            "5" => {
                let name = self.prompt("\nInput new account name: ")?;
                let name = name.trim();
                (!name.is_empty()).then(|| Edit::Name(name.to_string()))
            }
            "6" => {
                let email = self.prompt("\nInput new account email: ")?;
                let email = email.trim();
                (!email.is_empty()).then(|| Edit::Email(email.to_string()))
            }
            _ => None,
        };

        if edit.is_none() {
            self.refuse(&BankError::InvalidInput)?;
        }
        Ok(edit)
    }

    fn ask_amount(&mut self, question: &str) -> Result<Option<i64>, SessionError> {
        let answer = self.prompt(question)?;
        match bank::parse_amount(&answer) {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                self.refuse(&e)?;
                Ok(None)
            }
        }
    }

    fn print_records(&mut self, records: &[Record]) -> Result<(), SessionError> {
        let mut wtr = csv::Writer::from_writer(&mut self.output);
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn refuse(&mut self, err: &BankError) -> Result<(), SessionError> {
        if let BankError::Store(cause) = err {
            error!("{cause}");
        } else {
            debug!("refused: {err}");
        }
        self.say(&format!("\nSorry, {err}!"))
    }

    fn say(&mut self, message: &str) -> Result<(), SessionError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Prints `question` and reads one line, without its line ending.
    fn prompt(&mut self, question: &str) -> Result<String, SessionError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::EndOfInput);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
