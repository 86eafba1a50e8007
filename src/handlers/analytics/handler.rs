//! Analytics handler implementations

use axum::{Json, extract::State};

use crate::{
    error::AppResult, middleware::AuthenticatedAdmin, services::AnalyticsService, state::AppState,
};

use super::response::AnalyticsOverview;

/// Dashboard overview
pub async fn get_overview(
    State(state): State<AppState>,
    _auth_admin: AuthenticatedAdmin,
) -> AppResult<Json<AnalyticsOverview>> {
    let overview = AnalyticsService::overview(state.store()).await?;
    Ok(Json(overview))
}
