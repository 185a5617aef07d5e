// handlers/elevated/admin/stats.rs - GET /api/dashboard-stats handler

use axum::extract::State;

use crate::app::AppState;
use crate::database::DashboardStats;
use crate::middleware::{ApiResponse, ApiResult};

/// { totalGalleries, totalClients, totalSelections, unassignedGalleries }
pub async fn dashboard_stats_get(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    Ok(ApiResponse::success(state.store.dashboard_stats().await?))
}
