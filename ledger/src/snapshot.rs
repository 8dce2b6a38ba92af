//! Snapshot codec: accounts to and from delimited text.
//!
//! A snapshot is a CSV document with the header
//! `account_id,name,balance,transactions` and one row per account. The
//! balance carries exactly two fractional digits and the history entries
//! are joined with `;`.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{info, warn};

use bankledger_common::{format_balance, AccountId, LedgerError, Result};

use crate::account::{validate_name, Account};
use crate::history::{join_history, split_history};

/// Column names, in order.
pub const HEADER: [&str; 4] = ["account_id", "name", "balance", "transactions"];

/// One exported account.
#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    account_id: AccountId,
    name: &'a str,
    #[serde(serialize_with = "two_places")]
    balance: f64,
    transactions: String,
}

fn two_places<S>(balance: &f64, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&format_balance(*balance))
}

/// One imported row, before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    account_id: String,
    name: String,
    balance: String,
    transactions: String,
}

impl RawRow {
    fn into_account(self, row: usize) -> Result<Account> {
        let id = AccountId::parse(self.account_id.trim()).map_err(|e| malformed(row, e))?;

        validate_name(&self.name).map_err(|e| malformed(row, e))?;

        let balance: f64 = self
            .balance
            .trim()
            .parse()
            .map_err(|e| malformed(row, format!("balance {:?}: {e}", self.balance)))?;
        if !balance.is_finite() {
            return Err(malformed(row, format!("balance {:?} is not finite", self.balance)));
        }

        Ok(Account::with_id(
            id,
            self.name,
            balance,
            split_history(&self.transactions),
        ))
    }
}

fn malformed(row: usize, reason: impl ToString) -> LedgerError {
    LedgerError::MalformedRecord {
        row,
        reason: reason.to_string(),
    }
}

fn csv_error(row: usize, err: csv::Error) -> LedgerError {
    if err.is_io_error() {
        LedgerError::Io(err.to_string())
    } else {
        malformed(row, err)
    }
}

/// Write `accounts` as a snapshot to `writer`.
pub fn export_snapshot<'a, W>(accounts: impl IntoIterator<Item = &'a Account>, writer: W) -> Result<()>
where
    W: Write,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER).map_err(|e| csv_error(0, e))?;
    for (i, account) in accounts.into_iter().enumerate() {
        let row = SnapshotRow {
            account_id: account.id,
            name: &account.name,
            balance: account.balance,
            transactions: join_history(&account.transactions),
        };
        wtr.serialize(row).map_err(|e| csv_error(i + 1, e))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a snapshot from `reader`, keyed by account name in row order.
///
/// Rows are numbered from 1, not counting the header.
pub fn import_snapshot<R>(reader: R) -> Result<IndexMap<String, Account>>
where
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut accounts = IndexMap::new();
    for (i, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = i + 1;
        let account = result.map_err(|e| csv_error(row, e))?.into_account(row)?;
        if accounts.contains_key(&account.name) {
            return Err(malformed(row, format!("duplicate account name {:?}", account.name)));
        }
        accounts.insert(account.name.clone(), account);
    }
    Ok(accounts)
}

/// Write a snapshot file, creating parent directories as needed.
///
/// Each save stages into its own temporary file in the target directory
/// and renames it into place, so overlapping saves never share a file.
pub fn save_to_path(path: &Path, accounts: &[Account]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut staging = NamedTempFile::new_in(dir)?;
    export_snapshot(accounts, io::BufWriter::new(&mut staging))?;
    staging.persist(path).map_err(|e| LedgerError::from(e.error))?;

    info!(path = %path.display(), accounts = accounts.len(), "Snapshot saved");
    Ok(())
}

/// Read a snapshot file.
pub fn load_from_path(path: &Path) -> Result<IndexMap<String, Account>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Snapshot not found");
            return Err(LedgerError::SnapshotNotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let accounts = import_snapshot(io::BufReader::new(file))?;
    info!(path = %path.display(), accounts = accounts.len(), "Snapshot loaded");
    Ok(accounts)
}
