//! # findash - Financial Statement Data Engine
//!
//! The data core of a financial-statement dashboard for two Japanese
//! utilities (TEPCO and Chubu Electric Power):
//! - quarterly statement CSVs fetched over HTTP, parsed, schema-validated
//!   and memoized per (company, statement-type) pair
//! - pure Year-over-Year comparison math with prior-year quarter lookup
//! - display classification and formatting for YoY badges
//! - derived ratios (free cash flow, equity ratio, operating margin)
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use findash::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = StatementLoader::new(&LoaderConfig::from_env())?;
//!     let records = loader
//!         .load(CompanyCode::Tepco, StatementType::ProfitLoss, &LoadOptions::default())
//!         .await?;
//!
//!     if let Some(latest) = latest_for_company(&records, CompanyCode::Tepco) {
//!         if let Some(previous) = find_previous_year(&records, &latest.period, CompanyCode::Tepco) {
//!             let yoy = calculate_yoy(
//!                 latest.revenue.unwrap_or(0.0),
//!                 previous.revenue.unwrap_or(0.0),
//!                 "Revenue",
//!             );
//!             println!("{} {}", yoy.label, format_percent(yoy.change_percent));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Prelude for convenient imports
pub mod prelude {
    //! The most commonly used types and functions in one import.

    pub use crate::analysis::{
        calculate_yoy, find_previous_year, format_percent, free_cash_flow, latest_for_company,
        ChangeClass,
    };
    pub use crate::config::LoaderConfig;
    pub use crate::error::FindashError;
    pub use crate::models::{CompanyCode, FinancialRecord, StatementType, YoYComparison};
    pub use crate::services::{LoadOptions, StatementLoader};
}

// Re-export some commonly used utilities
pub use utils::{init_logger, Logger, Timer};
