//! Custom validators for API request validation

use once_cell::sync::Lazy;
use regex::Regex;

/// Phone number: optional leading `+`, then 8 to 15 digits
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("Invalid phone regex"));

/// Bank account number: 4 to 30 digits
pub static ACCOUNT_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4,30}$").expect("Invalid account number regex"));
