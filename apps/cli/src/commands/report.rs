//! # Report Commands
//!
//! Per-product sales totals for a year or one month, shown on screen or
//! exported to `reports_dir`.

use std::path::PathBuf;
use stockroom_core::forms::ReportForm;
use stockroom_core::{SalesReport, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::export;
use crate::state::AppState;

/// Years that have sales, newest first (the report screen's year choices).
pub async fn years(state: &AppState, session: &Session) -> Result<Vec<i32>, ApiError> {
    debug!(user = %session.username, "list report years");
    Ok(state.db().reports().available_years().await?)
}

/// Builds the report. A period without sales yields an empty report.
pub async fn show(state: &AppState, session: &Session, form: &ReportForm) -> Result<SalesReport, ApiError> {
    let period = form.validate()?;
    debug!(user = %session.username, title = %period.title(), "show report");
    Ok(state.db().reports().sales_report(period).await?)
}

/// Builds the report and writes it to the configured reports directory.
///
/// ## Returns
/// * `Ok(path)` - The written file
/// * `Err(VALIDATION_ERROR)` - "No data to export" for an empty period
pub async fn export(state: &AppState, session: &Session, form: &ReportForm) -> Result<PathBuf, ApiError> {
    let report = show(state, session, form).await?;
    export::write_report(&report, state.config(), &state.config().reports_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale;
    use crate::commands::test_support::{login_as, stocked_product};
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use stockroom_core::forms::SaleForm;

    fn month(year: &str, month: &str) -> ReportForm {
        ReportForm {
            year: year.into(),
            month: month.into(),
        }
    }

    async fn exporting_state(dir: &std::path::Path) -> AppState {
        let config = AppConfig {
            reports_dir: dir.to_path_buf(),
            ..AppConfig::with_database_path(":memory:")
        };
        AppState::in_memory(config).await
    }

    #[tokio::test]
    async fn test_report_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let state = exporting_state(dir.path()).await;
        let session = login_as(&state, "ada").await;
        let tea = stocked_product(&state, &session, 20).await;

        for (date, qty) in [("2024-03-05", "1"), ("2024-03-20", "2"), ("2024-04-01", "4")] {
            let form = SaleForm {
                receipt_no: "R".into(),
                date: date.into(),
                product: tea.id.to_string(),
                qty: qty.into(),
                notes: String::new(),
                is_active: true,
            };
            sale::add(&state, &session, &form).await.unwrap();
        }

        assert_eq!(years(&state, &session).await.unwrap(), vec![2024]);

        let march = show(&state, &session, &month("2024", "03")).await.unwrap();
        assert_eq!(march.total_qty(), 3);
        assert_eq!(march.total_sales().cents(), 750);

        let whole_year = show(&state, &session, &month("2024", "All")).await.unwrap();
        assert_eq!(whole_year.total_qty(), 7);

        let path = export(&state, &session, &month("2024", "03")).await.unwrap();
        assert_eq!(path, dir.path().join("sales_report_2024_03.txt"));
        assert!(std::fs::read_to_string(path).unwrap().contains("Green Tea"));
    }

    #[tokio::test]
    async fn test_empty_period() {
        let dir = tempfile::tempdir().unwrap();
        let state = exporting_state(dir.path()).await;
        let session = login_as(&state, "ada").await;

        let report = show(&state, &session, &month("2019", "")).await.unwrap();
        assert!(report.is_empty());

        let err = export(&state, &session, &month("2019", "")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "No data to export");

        let err = show(&state, &session, &month("twenty", "")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
