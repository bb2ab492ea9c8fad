use crate::{
    config::LoaderConfig,
    error::FindashError,
    models::{is_valid_period, CompanyCode, FinancialRecord, StatementType},
    utils::{Logger, Timer},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-call loading flags. Both default to on.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Read and write the in-memory memoization cache.
    pub cache: bool,
    /// Run schema validation before returning; any violation fails the
    /// whole load.
    pub validate_schema: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            cache: true,
            validate_schema: true,
        }
    }
}

/// Cache diagnostics snapshot. Read-only, no side effect.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Fetches, parses, validates and memoizes quarterly statement CSVs.
///
/// Each instance owns its cache; construct one per application (or per
/// test) and pass it around rather than reaching for a global. A cached
/// entry is shared by `Arc`, so repeat loads hand out the same allocation.
///
/// Concurrent loads of distinct (company, statement) pairs interleave
/// freely. Two concurrent loads racing on the same uncached key will both
/// fetch; the second writer overwrites the first with an identical value
/// (last write wins, accepted). The cache lock is never held across an
/// await point.
pub struct StatementLoader {
    client: reqwest::Client,
    base_url: String,
    cache: Mutex<HashMap<String, Arc<Vec<FinancialRecord>>>>,
    logger: Logger,
}

impl StatementLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, FindashError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: Mutex::new(HashMap::new()),
            logger: Logger::new("LOADER"),
        })
    }

    /// Load the statement file for one (company, statement-type) pair.
    ///
    /// All-or-nothing: either every row parses (and validates, when
    /// enabled) and the full record sequence is returned in CSV row order,
    /// or the call fails with one [`FindashError`] and nothing is cached.
    pub async fn load(
        &self,
        company: CompanyCode,
        statement: StatementType,
        options: &LoadOptions,
    ) -> Result<Arc<Vec<FinancialRecord>>, FindashError> {
        let cache_key = format!("{}_{}", company.as_str(), statement.as_str());

        if options.cache {
            let cache = self.cache.lock().expect("cache mutex poisoned");
            if let Some(records) = cache.get(&cache_key) {
                self.logger.debug(&format!("Cache hit: {}", cache_key));
                return Ok(Arc::clone(records));
            }
        }

        let filename = format!("{}_{}_quarterly.csv", company.as_str(), statement.as_str());
        let url = format!("{}/{}", self.base_url, filename);

        self.logger.info(&format!("Downloading {}", filename));
        let timer = Timer::start(&format!("{} fetch", filename));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FindashError::DataLoad {
                status: status.as_u16(),
                url,
            });
        }
        let content = response.text().await?;

        let (records, coercion_issues) = parse_records(&content, &filename)?;

        if options.validate_schema {
            let mut violations = validate_records(&records);
            violations.extend(coercion_issues);
            if !violations.is_empty() {
                return Err(FindashError::parse("data validation failed", &filename, violations));
            }
        } else if !coercion_issues.is_empty() {
            self.logger.warn(&format!(
                "{}: {} non-numeric cell(s) dropped (validation disabled)",
                filename,
                coercion_issues.len()
            ));
        }

        let records = Arc::new(records);
        if options.cache {
            let mut cache = self.cache.lock().expect("cache mutex poisoned");
            cache.insert(cache_key, Arc::clone(&records));
        }

        timer.log_elapsed("LOADER");
        self.logger.info(&format!("Loaded {} records from {}", records.len(), filename));
        Ok(records)
    }

    /// Fetch every statement type for one company concurrently, in
    /// [`StatementType::ALL`] order. Each pair targets its own cache
    /// slot, so the fetches interleave freely; the first failure fails
    /// the whole fan-out (no partial result).
    pub async fn load_all(
        &self,
        company: CompanyCode,
        options: &LoadOptions,
    ) -> Result<Vec<Arc<Vec<FinancialRecord>>>, FindashError> {
        let loads = StatementType::ALL
            .iter()
            .map(|statement| self.load(company, *statement, options));
        futures::future::try_join_all(loads).await
    }

    /// Drop every cached entry. There is no partial eviction.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock().expect("cache mutex poisoned");
        let evicted = cache.len();
        cache.clear();
        self.logger.info(&format!("Cache cleared ({} entries)", evicted));
    }

    /// Number of cached entries and their keys, for diagnostics.
    pub fn cache_status(&self) -> CacheStatus {
        let cache = self.cache.lock().expect("cache mutex poisoned");
        let mut keys: Vec<String> = cache.keys().cloned().collect();
        keys.sort();
        CacheStatus {
            size: cache.len(),
            keys,
        }
    }
}

/// One CSV row before coercion. Every cell is read as text; the explicit
/// coercion pass below decides what counts as a number. Unknown columns
/// are ignored, missing columns stay `None`.
#[derive(Debug, Deserialize)]
struct RawStatementRow {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    period: Option<String>,
    #[serde(default)]
    period_end: Option<String>,
    #[serde(default)]
    revenue: Option<String>,
    #[serde(default)]
    operating_income: Option<String>,
    #[serde(default)]
    ordinary_income: Option<String>,
    #[serde(default)]
    net_income: Option<String>,
    #[serde(default)]
    total_assets: Option<String>,
    #[serde(default)]
    current_assets: Option<String>,
    #[serde(default)]
    fixed_assets: Option<String>,
    #[serde(default)]
    total_liabilities: Option<String>,
    #[serde(default)]
    total_equity: Option<String>,
    #[serde(default)]
    net_assets: Option<String>,
    #[serde(default)]
    operating_cf: Option<String>,
    #[serde(default)]
    investing_cf: Option<String>,
    #[serde(default)]
    financing_cf: Option<String>,
}

impl RawStatementRow {
    fn into_record(self, index: usize, issues: &mut Vec<String>) -> FinancialRecord {
        let mut record = FinancialRecord::new(
            self.company.unwrap_or_default(),
            self.period.unwrap_or_default(),
            self.period_end.unwrap_or_default(),
        );
        record.revenue = coerce_numeric(self.revenue, "revenue", index, issues);
        record.operating_income =
            coerce_numeric(self.operating_income, "operating_income", index, issues);
        record.ordinary_income =
            coerce_numeric(self.ordinary_income, "ordinary_income", index, issues);
        record.net_income = coerce_numeric(self.net_income, "net_income", index, issues);
        record.total_assets = coerce_numeric(self.total_assets, "total_assets", index, issues);
        record.current_assets =
            coerce_numeric(self.current_assets, "current_assets", index, issues);
        record.fixed_assets = coerce_numeric(self.fixed_assets, "fixed_assets", index, issues);
        record.total_liabilities =
            coerce_numeric(self.total_liabilities, "total_liabilities", index, issues);
        record.total_equity = coerce_numeric(self.total_equity, "total_equity", index, issues);
        record.net_assets = coerce_numeric(self.net_assets, "net_assets", index, issues);
        record.operating_cf = coerce_numeric(self.operating_cf, "operating_cf", index, issues);
        record.investing_cf = coerce_numeric(self.investing_cf, "investing_cf", index, issues);
        record.financing_cf = coerce_numeric(self.financing_cf, "financing_cf", index, issues);
        record
    }
}

/// Coercion rule for numeric cells: empty or whitespace-only means the
/// field is absent (`None`, not zero); a parseable value is taken as-is;
/// anything else is recorded as a violation and degrades to `None`.
fn coerce_numeric(
    raw: Option<String>,
    field: &'static str,
    index: usize,
    issues: &mut Vec<String>,
) -> Option<f64> {
    let value = raw?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) => {
            issues.push(format!(
                "Row {}: field \"{}\" is not a number: {}",
                index, field, value
            ));
            None
        }
    }
}

/// Parse CSV text into records plus any numeric-coercion violations.
/// The first row is the header; blank lines are skipped; a structural
/// error (ragged row etc.) fails the whole parse.
fn parse_records(
    content: &str,
    filename: &str,
) -> Result<(Vec<FinancialRecord>, Vec<String>), FindashError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (index, result) in reader.deserialize::<RawStatementRow>().enumerate() {
        let raw = result.map_err(|e| {
            FindashError::parse("CSV parsing failed", filename, vec![e.to_string()])
        })?;
        records.push(raw.into_record(index, &mut issues));
    }

    Ok((records, issues))
}

/// Schema rules, accumulated over every row: recognized company code,
/// `YYYYQ[1-4]` period, non-empty period_end. Row indices are 0-based
/// data-row indices (the header row is not counted).
fn validate_records(records: &[FinancialRecord]) -> Vec<String> {
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        if !CompanyCode::is_valid_code(&record.company) {
            errors.push(format!(
                "Row {}: Invalid company \"{}\"",
                index, record.company
            ));
        }
        if !is_valid_period(&record.period) {
            errors.push(format!(
                "Row {}: Invalid period format \"{}\" (expected YYYYQQ)",
                index, record.period
            ));
        }
        if record.period_end.is_empty() {
            errors.push(format!("Row {}: Missing period_end field", index));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PL_CSV: &str = "\
company,period,period_end,revenue,operating_income,ordinary_income,net_income
TEPCO,2024Q2,2024-09-30,14500.25,820.5,790.0,410.75
TEPCO,2025Q2,2025-09-30,15200.00,910.0,880.5,455.25
";

    #[test]
    fn parses_records_in_row_order() {
        let (records, issues) = parse_records(PL_CSV, "TEPCO_pl_quarterly.csv").unwrap();
        assert!(issues.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].period, "2024Q2");
        assert_eq!(records[0].revenue, Some(14500.25));
        assert_eq!(records[1].net_income, Some(455.25));
        // balance-sheet columns are not in a P/L file
        assert_eq!(records[0].total_assets, None);
    }

    #[test]
    fn empty_cell_is_absent_not_zero() {
        let csv = "\
company,period,period_end,revenue,net_income
TEPCO,2025Q1,2025-06-30,15000.0,
";
        let (records, issues) = parse_records(csv, "x.csv").unwrap();
        assert!(issues.is_empty());
        assert_eq!(records[0].revenue, Some(15000.0));
        assert_eq!(records[0].net_income, None);
    }

    #[test]
    fn non_numeric_cell_records_a_violation() {
        let csv = "\
company,period,period_end,revenue
TEPCO,2025Q1,2025-06-30,abc
";
        let (records, issues) = parse_records(csv, "x.csv").unwrap();
        assert_eq!(records[0].revenue, None);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Row 0"));
        assert!(issues[0].contains("\"revenue\""));
        assert!(issues[0].contains("abc"));
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let csv = "\
company,period,period_end,revenue
TEPCO,2025Q1,2025-06-30,100.0,extra-cell
";
        let err = parse_records(csv, "x.csv").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn validation_accumulates_every_violation() {
        let csv = "\
company,period,period_end,revenue
XYZ,2025Q1,2025-06-30,100.0
TEPCO,2025-1,,200.0
";
        let (records, _) = parse_records(csv, "x.csv").unwrap();
        let errors = validate_records(&records);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], "Row 0: Invalid company \"XYZ\"");
        assert_eq!(
            errors[1],
            "Row 1: Invalid period format \"2025-1\" (expected YYYYQQ)"
        );
        assert_eq!(errors[2], "Row 1: Missing period_end field");
    }

    #[test]
    fn loader_starts_with_an_empty_cache() {
        let loader = StatementLoader::new(&LoaderConfig::default()).unwrap();
        let status = loader.cache_status();
        assert_eq!(status.size, 0);
        assert!(status.keys.is_empty());
    }
}
