use crate::models::{AssetComposition, FinancialRecord};

/// Free cash flow: operating CF plus investing CF (investing is normally
/// negative). Display-only derived metric; absent fields count as zero.
pub fn free_cash_flow(record: &FinancialRecord) -> f64 {
    record.operating_cf.unwrap_or(0.0) + record.investing_cf.unwrap_or(0.0)
}

/// Equity ratio in percent: total equity over total assets.
/// `None` when either side is missing or assets are zero - a missing
/// denominator must not masquerade as a real ratio.
pub fn equity_ratio(record: &FinancialRecord) -> Option<f64> {
    let equity = record.total_equity?;
    let assets = record.total_assets?;
    if assets == 0.0 {
        return None;
    }
    Some(equity / assets * 100.0)
}

/// Operating margin in percent: operating income over revenue.
pub fn operating_margin(record: &FinancialRecord) -> Option<f64> {
    let income = record.operating_income?;
    let revenue = record.revenue?;
    if revenue == 0.0 {
        return None;
    }
    Some(income / revenue * 100.0)
}

/// Current/fixed asset ratios over total assets.
pub fn asset_composition(record: &FinancialRecord) -> Option<AssetComposition> {
    let total = record.total_assets?;
    if total == 0.0 {
        return None;
    }
    let current = record.current_assets.unwrap_or(0.0);
    let fixed = record.fixed_assets.unwrap_or(0.0);

    Some(AssetComposition {
        current_assets_ratio: current / total * 100.0,
        fixed_assets_ratio: fixed / total * 100.0,
        total_assets: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FinancialRecord {
        FinancialRecord::new(
            "TEPCO".to_string(),
            "2025Q2".to_string(),
            "2025-09-30".to_string(),
        )
    }

    #[test]
    fn free_cash_flow_defaults_absent_fields_to_zero() {
        let mut r = record();
        r.operating_cf = Some(2000.0);
        r.investing_cf = Some(-1250.0);
        assert_eq!(free_cash_flow(&r), 750.0);

        r.investing_cf = None;
        assert_eq!(free_cash_flow(&r), 2000.0);
        assert_eq!(free_cash_flow(&record()), 0.0);
    }

    #[test]
    fn equity_ratio_requires_both_sides() {
        let mut r = record();
        r.total_equity = Some(40000.0);
        r.total_assets = Some(140000.0);
        let ratio = equity_ratio(&r).unwrap();
        assert!((ratio - 28.571428).abs() < 1e-4);

        r.total_assets = Some(0.0);
        assert_eq!(equity_ratio(&r), None);
        r.total_assets = None;
        assert_eq!(equity_ratio(&r), None);
    }

    #[test]
    fn operating_margin_handles_missing_revenue() {
        let mut r = record();
        r.operating_income = Some(910.0);
        assert_eq!(operating_margin(&r), None);

        r.revenue = Some(15200.0);
        let margin = operating_margin(&r).unwrap();
        assert!((margin - 5.9868).abs() < 1e-3);
    }

    #[test]
    fn asset_composition_ratios_sum_over_total() {
        let mut r = record();
        r.total_assets = Some(100000.0);
        r.current_assets = Some(25000.0);
        r.fixed_assets = Some(75000.0);

        let composition = asset_composition(&r).unwrap();
        assert_eq!(composition.current_assets_ratio, 25.0);
        assert_eq!(composition.fixed_assets_ratio, 75.0);
        assert_eq!(composition.total_assets, 100000.0);

        r.total_assets = None;
        assert_eq!(asset_composition(&r), None);
    }
}
