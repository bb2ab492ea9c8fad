use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two tracked utility companies. Company codes form a closed set;
/// anything else in a data file is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyCode {
    #[serde(rename = "TEPCO")]
    Tepco,
    #[serde(rename = "CHUBU")]
    Chubu,
}

impl CompanyCode {
    pub const ALL: [CompanyCode; 2] = [CompanyCode::Tepco, CompanyCode::Chubu];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyCode::Tepco => "TEPCO",
            CompanyCode::Chubu => "CHUBU",
        }
    }

    /// Human-readable company name for display surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            CompanyCode::Tepco => "Tokyo Electric Power",
            CompanyCode::Chubu => "Chubu Electric Power",
        }
    }

    pub fn is_valid_code(code: &str) -> bool {
        code.parse::<CompanyCode>().is_ok()
    }
}

impl FromStr for CompanyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEPCO" => Ok(CompanyCode::Tepco),
            "CHUBU" => Ok(CompanyCode::Chubu),
            other => Err(format!("unknown company code: {}", other)),
        }
    }
}

impl fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement type determines which numeric columns a loaded record set
/// populates and which CSV resource is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementType {
    #[serde(rename = "pl")]
    ProfitLoss,
    #[serde(rename = "bs")]
    BalanceSheet,
    #[serde(rename = "cf")]
    CashFlow,
}

impl StatementType {
    pub const ALL: [StatementType; 3] = [
        StatementType::ProfitLoss,
        StatementType::BalanceSheet,
        StatementType::CashFlow,
    ];

    /// Short code used in resource filenames and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::ProfitLoss => "pl",
            StatementType::BalanceSheet => "bs",
            StatementType::CashFlow => "cf",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StatementType::ProfitLoss => "Profit & Loss",
            StatementType::BalanceSheet => "Balance Sheet",
            StatementType::CashFlow => "Cash Flow",
        }
    }
}

impl FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pl" => Ok(StatementType::ProfitLoss),
            "bs" => Ok(StatementType::BalanceSheet),
            "cf" => Ok(StatementType::CashFlow),
            other => Err(format!("unknown statement type: {} (expected pl, bs or cf)", other)),
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
