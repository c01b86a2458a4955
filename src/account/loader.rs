//! Load investor capital accounts from CSV ledger exports
//!
//! Expected columns (headers must match the field names):
//! `investor_id,investor_name,capital_contributed,capital_returned,
//! preferred_return_accrued,preferred_return_paid,distributions_received`
//!
//! The trailing balance columns may be omitted and default to zero.

use super::InvestorCapitalAccount;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load capital accounts from a CSV file.
pub fn load_accounts<P: AsRef<Path>>(path: P) -> Result<Vec<InvestorCapitalAccount>, Box<dyn Error>> {
    let file = File::open(path.as_ref())?;
    let accounts = load_accounts_from_reader(file)?;
    log::info!(
        "loaded {} capital accounts from {}",
        accounts.len(),
        path.as_ref().display()
    );
    Ok(accounts)
}

/// Load capital accounts from any reader producing CSV with headers.
pub fn load_accounts_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<InvestorCapitalAccount>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut accounts = Vec::new();
    for record in rdr.deserialize() {
        let account: InvestorCapitalAccount = record?;
        accounts.push(account);
    }
    Ok(accounts)
}
