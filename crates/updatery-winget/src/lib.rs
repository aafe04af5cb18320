mod backend;
mod detection;
mod exit_codes;
mod table;

pub use backend::{DEFAULT_SCAN_TIMEOUT, WINGET_SOURCE, WingetBackend, updatable_packages};
pub use table::{Column, TableError, TableRow, parse_table, try_parse_table};
