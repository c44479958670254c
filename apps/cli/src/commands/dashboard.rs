//! # Dashboard Command

use stockroom_core::{DashboardSummary, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Headline figures and chart series, using the configured low-stock
/// threshold.
pub async fn show(state: &AppState, session: &Session) -> Result<DashboardSummary, ApiError> {
    let threshold = state.config().low_stock_threshold;
    debug!(user = %session.username, threshold, "show dashboard");
    Ok(state.db().dashboard().summary(threshold).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{login_as, stocked_product};
    use crate::config::AppConfig;

    #[tokio::test]
    async fn test_threshold_comes_from_config() {
        let config = AppConfig {
            low_stock_threshold: 25,
            ..AppConfig::with_database_path(":memory:")
        };
        let state = AppState::in_memory(config).await;
        let session = login_as(&state, "ada").await;
        stocked_product(&state, &session, 20).await;

        let summary = show(&state, &session).await.unwrap();
        assert_eq!(summary.low_stock_threshold, 25);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.total_products, 1);
        assert_eq!(summary.total_categories, 1);
    }
}
