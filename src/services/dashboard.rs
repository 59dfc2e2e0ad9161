// Dashboard service: funnel, revenue rollup, task load, activity feed.

use crate::db::Scope;
use crate::state::AppState;
use crate::types::DashboardData;

/// Result type for dashboard data loading
#[derive(Debug, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResult {
    Success { data: DashboardData },
    Empty { message: String },
    Error { message: String },
}

/// How many activity rows the dashboard feed shows.
const ACTIVITY_FEED_LIMIT: i64 = 20;

/// Assemble the dashboard payload from the store in one pass.
pub fn get_dashboard_data(state: &AppState, scope: &Scope) -> DashboardResult {
    let db_guard = match state.db.lock() {
        Ok(guard) => guard,
        Err(_) => {
            return DashboardResult::Error {
                message: "Internal error: db lock poisoned".to_string(),
            }
        }
    };
    let db = match db_guard.as_ref() {
        Some(db) => db,
        None => {
            return DashboardResult::Error {
                message: "Database not initialized".to_string(),
            }
        }
    };

    let funnel = match db.stage_funnel(scope) {
        Ok(funnel) => funnel,
        Err(e) => {
            return DashboardResult::Error {
                message: e.to_string(),
            }
        }
    };

    if funnel.iter().all(|slice| slice.count == 0) {
        return DashboardResult::Empty {
            message: "No pipeline activity yet. The dashboard fills in after your first lead."
                .to_string(),
        };
    }

    let revenue = match db.revenue_summary(scope) {
        Ok(revenue) => revenue,
        Err(e) => {
            return DashboardResult::Error {
                message: e.to_string(),
            }
        }
    };
    let open_tasks = db.count_open_tasks(scope).unwrap_or(0);
    let overdue_tasks = db.count_overdue_tasks(scope).unwrap_or(0);
    let recent_activities = db
        .recent_activities(scope, ACTIVITY_FEED_LIMIT)
        .unwrap_or_default();

    DashboardResult::Success {
        data: DashboardData {
            funnel,
            revenue,
            open_tasks,
            overdue_tasks,
            recent_activities,
        },
    }
}
