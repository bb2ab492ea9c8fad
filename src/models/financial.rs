use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::StatementType;

/// One quarterly record for a single company. Only the columns belonging to
/// the requested statement type are populated; absent columns stay `None`
/// ("no value"), never zero. Records are immutable once parsed.
///
/// `company` is kept as a plain string so that schema validation, not typed
/// deserialization, decides whether the code is recognized - a malformed
/// file must report every violation, not fail on the first bad cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub company: String,
    /// Fiscal quarter key, `YYYYQ[1-4]`. Fixed-width and zero-padded by
    /// construction, so lexicographic order is chronological order.
    pub period: String,
    /// ISO-8601 date the quarter closed on. Informational only.
    pub period_end: String,

    // Profit & loss columns (100M JPY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinary_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<f64>,

    // Balance sheet columns (100M JPY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_assets: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_liabilities: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_assets: Option<f64>,

    // Cash flow columns (100M JPY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_cf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investing_cf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing_cf: Option<f64>,
}

impl FinancialRecord {
    /// Parsed quarter-close date, when `period_end` is well-formed.
    pub fn period_end_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.period_end, "%Y-%m-%d").ok()
    }

    /// Empty record for a (company, period) pair; numeric columns are
    /// filled in by the loader's coercion pass.
    pub fn new(company: String, period: String, period_end: String) -> Self {
        Self {
            company,
            period,
            period_end,
            revenue: None,
            operating_income: None,
            ordinary_income: None,
            net_income: None,
            total_assets: None,
            current_assets: None,
            fixed_assets: None,
            total_liabilities: None,
            total_equity: None,
            net_assets: None,
            operating_cf: None,
            investing_cf: None,
            financing_cf: None,
        }
    }
}

/// Result of comparing one metric against the same quarter a year earlier.
/// Derived on demand, never persisted. Values are unrounded; formatting is
/// a separate display step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoYComparison {
    pub current: f64,
    pub previous: f64,
    /// current - previous
    pub change: f64,
    /// (change / previous) * 100, or 0 when previous is 0.
    pub change_percent: f64,
    pub label: String,
}

/// Balance-sheet composition snapshot, display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetComposition {
    pub current_assets_ratio: f64,
    pub fixed_assets_ratio: f64,
    pub total_assets: f64,
}

pub type MetricAccessor = fn(&FinancialRecord) -> Option<f64>;

/// A named numeric column: CSV header name, display label and accessor.
pub struct MetricDef {
    pub name: &'static str,
    pub label: &'static str,
    pub get: MetricAccessor,
}

pub const PL_METRICS: &[MetricDef] = &[
    MetricDef { name: "revenue", label: "Revenue", get: |r| r.revenue },
    MetricDef { name: "operating_income", label: "Operating income", get: |r| r.operating_income },
    MetricDef { name: "ordinary_income", label: "Ordinary income", get: |r| r.ordinary_income },
    MetricDef { name: "net_income", label: "Net income", get: |r| r.net_income },
];

pub const BS_METRICS: &[MetricDef] = &[
    MetricDef { name: "total_assets", label: "Total assets", get: |r| r.total_assets },
    MetricDef { name: "current_assets", label: "Current assets", get: |r| r.current_assets },
    MetricDef { name: "fixed_assets", label: "Fixed assets", get: |r| r.fixed_assets },
    MetricDef { name: "total_liabilities", label: "Total liabilities", get: |r| r.total_liabilities },
    MetricDef { name: "total_equity", label: "Total equity", get: |r| r.total_equity },
    MetricDef { name: "net_assets", label: "Net assets", get: |r| r.net_assets },
];

pub const CF_METRICS: &[MetricDef] = &[
    MetricDef { name: "operating_cf", label: "Operating CF", get: |r| r.operating_cf },
    MetricDef { name: "investing_cf", label: "Investing CF", get: |r| r.investing_cf },
    MetricDef { name: "financing_cf", label: "Financing CF", get: |r| r.financing_cf },
];

impl StatementType {
    /// The numeric columns a statement file of this type carries.
    pub fn metrics(&self) -> &'static [MetricDef] {
        match self {
            StatementType::ProfitLoss => PL_METRICS,
            StatementType::BalanceSheet => BS_METRICS,
            StatementType::CashFlow => CF_METRICS,
        }
    }
}

/// Every numeric column across all statement types, in header order.
/// The loader coerces exactly these columns; everything else stays text.
pub const ALL_NUMERIC_FIELDS: &[MetricDef] = &[
    MetricDef { name: "revenue", label: "Revenue", get: |r| r.revenue },
    MetricDef { name: "operating_income", label: "Operating income", get: |r| r.operating_income },
    MetricDef { name: "ordinary_income", label: "Ordinary income", get: |r| r.ordinary_income },
    MetricDef { name: "net_income", label: "Net income", get: |r| r.net_income },
    MetricDef { name: "total_assets", label: "Total assets", get: |r| r.total_assets },
    MetricDef { name: "current_assets", label: "Current assets", get: |r| r.current_assets },
    MetricDef { name: "fixed_assets", label: "Fixed assets", get: |r| r.fixed_assets },
    MetricDef { name: "total_liabilities", label: "Total liabilities", get: |r| r.total_liabilities },
    MetricDef { name: "total_equity", label: "Total equity", get: |r| r.total_equity },
    MetricDef { name: "net_assets", label: "Net assets", get: |r| r.net_assets },
    MetricDef { name: "operating_cf", label: "Operating CF", get: |r| r.operating_cf },
    MetricDef { name: "investing_cf", label: "Investing CF", get: |r| r.investing_cf },
    MetricDef { name: "financing_cf", label: "Financing CF", get: |r| r.financing_cf },
];

/// Parse a `YYYYQ[1-4]` period key into (year, quarter).
/// Returns `None` on anything that does not match the fixed pattern.
pub fn parse_period(period: &str) -> Option<(i32, u8)> {
    let pattern = Regex::new(r"^(\d{4})Q([1-4])$").unwrap();
    let caps = pattern.captures(period)?;
    let year = caps[1].parse().ok()?;
    let quarter = caps[2].parse().ok()?;
    Some((year, quarter))
}

pub fn is_valid_period(period: &str) -> bool {
    parse_period(period).is_some()
}

/// Same quarter one year earlier, e.g. "2025Q2" -> "2024Q2".
/// `None` for malformed input.
pub fn previous_year_period(period: &str) -> Option<String> {
    let (year, quarter) = parse_period(period)?;
    Some(format!("{}Q{}", year - 1, quarter))
}
