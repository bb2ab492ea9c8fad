use crate::models::{
    parse_period, previous_year_period, CompanyCode, FinancialRecord, YoYComparison,
};

/// Compare a metric against the same quarter a year earlier.
///
/// Total on all inputs: a zero previous value yields `change_percent = 0`
/// by policy instead of an infinite or NaN ratio. No rounding happens
/// here; [`format_percent`] owns display formatting so the raw values stay
/// usable for further arithmetic.
pub fn calculate_yoy(current: f64, previous: f64, label: impl Into<String>) -> YoYComparison {
    let change = current - previous;
    let change_percent = if previous != 0.0 {
        (change / previous) * 100.0
    } else {
        0.0
    };

    YoYComparison {
        current,
        previous,
        change,
        change_percent,
        label: label.into(),
    }
}

/// Find the record for the same company one year before `current_period`.
///
/// A malformed period string is a caller bug, not a data error, so it
/// degrades to `None` rather than failing. Linear scan, first match; no
/// sort order is assumed or required.
pub fn find_previous_year<'a>(
    records: &'a [FinancialRecord],
    current_period: &str,
    company: CompanyCode,
) -> Option<&'a FinancialRecord> {
    let target_period = previous_year_period(current_period)?;

    records
        .iter()
        .find(|record| record.company == company.as_str() && record.period == target_period)
}

/// The most recent record for a company: filter, sort by period key
/// descending, take the first. Loaded collections are in CSV row order,
/// so this is always an explicit operation, never an assumption.
pub fn latest_for_company<'a>(
    records: &'a [FinancialRecord],
    company: CompanyCode,
) -> Option<&'a FinancialRecord> {
    records
        .iter()
        .filter(|record| record.company == company.as_str())
        .filter(|record| parse_period(&record.period).is_some())
        .max_by(|a, b| a.period.cmp(&b.period))
}

/// Display classification for a YoY change: at least +5% is positive,
/// at most -5% negative, everything between neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    Positive,
    Negative,
    Neutral,
}

impl ChangeClass {
    pub fn from_percent(change_percent: f64) -> Self {
        if change_percent >= 5.0 {
            ChangeClass::Positive
        } else if change_percent <= -5.0 {
            ChangeClass::Negative
        } else {
            ChangeClass::Neutral
        }
    }

    /// Foreground class name consumed by the presentation layer.
    pub fn text_class(&self) -> &'static str {
        match self {
            ChangeClass::Positive => "text-accent-green",
            ChangeClass::Negative => "text-accent-red",
            ChangeClass::Neutral => "text-accent-yellow",
        }
    }

    /// Background class name consumed by the presentation layer.
    pub fn bg_class(&self) -> &'static str {
        match self {
            ChangeClass::Positive => "bg-accent-green",
            ChangeClass::Negative => "bg-accent-red",
            ChangeClass::Neutral => "bg-accent-yellow",
        }
    }
}

pub fn yoy_color(change_percent: f64) -> &'static str {
    ChangeClass::from_percent(change_percent).text_class()
}

pub fn yoy_bg_color(change_percent: f64) -> &'static str {
    ChangeClass::from_percent(change_percent).bg_class()
}

/// Render a change percentage with one decimal place and an explicit
/// sign: `"+12.3%"`, `"-5.7%"`, `"+0.0%"`. Non-negative values always get
/// a leading `+` so a flat quarter is distinguishable from missing data.
pub fn format_percent(change_percent: f64) -> String {
    let sign = if change_percent >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, change_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str, period: &str) -> FinancialRecord {
        FinancialRecord::new(company.to_string(), period.to_string(), "2025-09-30".to_string())
    }

    #[test]
    fn yoy_computes_change_and_percent() {
        let yoy = calculate_yoy(90.0, 100.0, "Revenue");
        assert_eq!(yoy.change, -10.0);
        assert_eq!(yoy.change_percent, -10.0);
        assert_eq!(yoy.label, "Revenue");
    }

    #[test]
    fn yoy_zero_previous_yields_zero_percent() {
        let yoy = calculate_yoy(100.0, 0.0, "x");
        assert_eq!(yoy.change, 100.0);
        assert_eq!(yoy.change_percent, 0.0);
        assert!(yoy.change_percent.is_finite());
    }

    #[test]
    fn find_previous_year_matches_company_and_quarter() {
        let records = vec![
            record("TEPCO", "2024Q2"),
            record("TEPCO", "2025Q2"),
            record("CHUBU", "2024Q2"),
        ];

        let hit = find_previous_year(&records, "2025Q2", CompanyCode::Tepco).unwrap();
        assert_eq!(hit.period, "2024Q2");
        assert_eq!(hit.company, "TEPCO");
    }

    #[test]
    fn find_previous_year_misses_gracefully() {
        let records = vec![record("TEPCO", "2024Q2"), record("TEPCO", "2025Q2")];

        // no CHUBU data at all
        assert!(find_previous_year(&records, "2025Q2", CompanyCode::Chubu).is_none());
        // malformed period degrades to not-found, no panic
        assert!(find_previous_year(&records, "not-a-period", CompanyCode::Tepco).is_none());
        // no record a year before the earliest
        assert!(find_previous_year(&records, "2024Q2", CompanyCode::Tepco).is_none());
    }

    #[test]
    fn latest_for_company_takes_greatest_period() {
        let records = vec![
            record("TEPCO", "2025Q1"),
            record("TEPCO", "2024Q4"),
            record("CHUBU", "2025Q2"),
            record("TEPCO", "2023Q3"),
        ];

        let latest = latest_for_company(&records, CompanyCode::Tepco).unwrap();
        assert_eq!(latest.period, "2025Q1");
        assert!(latest_for_company(&[], CompanyCode::Tepco).is_none());
    }

    #[test]
    fn change_class_thresholds() {
        assert_eq!(ChangeClass::from_percent(5.0), ChangeClass::Positive);
        assert_eq!(ChangeClass::from_percent(4.9), ChangeClass::Neutral);
        assert_eq!(ChangeClass::from_percent(-5.0), ChangeClass::Negative);
        assert_eq!(ChangeClass::from_percent(-4.9), ChangeClass::Neutral);
        assert_eq!(ChangeClass::from_percent(0.0), ChangeClass::Neutral);
    }

    #[test]
    fn color_helpers_map_to_class_strings() {
        assert_eq!(yoy_color(12.0), "text-accent-green");
        assert_eq!(yoy_color(-8.5), "text-accent-red");
        assert_eq!(yoy_color(1.0), "text-accent-yellow");
        assert_eq!(yoy_bg_color(12.0), "bg-accent-green");
        assert_eq!(yoy_bg_color(-8.5), "bg-accent-red");
        assert_eq!(yoy_bg_color(1.0), "bg-accent-yellow");
    }

    #[test]
    fn format_percent_always_carries_a_sign() {
        assert_eq!(format_percent(12.34), "+12.3%");
        assert_eq!(format_percent(-3.14), "-3.1%");
        assert_eq!(format_percent(0.0), "+0.0%");
    }
}
