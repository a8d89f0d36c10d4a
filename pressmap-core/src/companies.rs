//! Company list loading from the indicator export file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub symbol: String,
    pub name: String,
    pub sector: String,
}

/// Reads a semicolon-delimited company export. The first row is a header
/// and is skipped; rows with too few columns are ignored. Columns used are
/// 0 (symbol), 2 (name) and 3 (sector).
pub fn load_companies(path: &Path) -> Result<Vec<Company>> {
    let content = fs::read_to_string(path)?;
    let mut companies = Vec::new();

    for line in content.lines().skip(1) {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 4 {
            continue;
        }
        companies.push(Company {
            symbol: fields[0].trim().to_string(),
            name: fields[2].trim().to_string(),
            sector: fields[3].trim().to_string(),
        });
    }

    Ok(companies)
}
