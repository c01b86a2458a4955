//! Investor capital account data structures and ledger loading

mod data;
pub mod loader;

pub use data::InvestorCapitalAccount;
pub use loader::{load_accounts, load_accounts_from_reader};
