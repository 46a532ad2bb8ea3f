use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use doorlist_core::{checkin, dashboard};

use crate::state::AppState;

/// Query shape of the single scanner endpoint. The scanning page sends
/// everything through `action`; GET and POST are treated identically.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionQuery {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub member_id: String,
}

pub async fn dispatch(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
) -> Json<Value> {
    Json(run_action(&state, &query).await)
}

pub async fn run_action(state: &AppState, query: &ActionQuery) -> Value {
    match query.action.as_str() {
        "checkIn" => {
            let state = state.clone();
            let token = query.token.clone();
            run_blocking(move || {
                serde_json::to_value(checkin::check_in_by_token(&state.db, &token))
                    .unwrap_or_else(|e| failure(e.to_string()))
            })
            .await
        }
        "manualCheckIn" => {
            let state = state.clone();
            let member_id = query.member_id.clone();
            run_blocking(move || {
                serde_json::to_value(checkin::check_in_by_id(&state.db, &member_id))
                    .unwrap_or_else(|e| failure(e.to_string()))
            })
            .await
        }
        "dashboard" => {
            let state = state.clone();
            run_blocking(move || match state.db.list_attendees() {
                Ok(rows) => serde_json::to_value(dashboard::aggregate(&rows))
                    .unwrap_or_else(|e| failure(e.to_string())),
                Err(e) => failure(e.to_string()),
            })
            .await
        }
        _ => failure("Invalid action"),
    }
}

/// Run store access off the async runtime; the connection mutex blocks.
async fn run_blocking(f: impl FnOnce() -> Value + Send + 'static) -> Value {
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => value,
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            failure(e.to_string())
        }
    }
}

fn failure(message: impl Into<String>) -> Value {
    json!({ "success": false, "message": message.into() })
}
