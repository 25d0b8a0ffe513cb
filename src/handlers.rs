use crate::aggregate::aggregate;
use crate::errors::{AppError, RecordError};
use crate::models::{PlayerSnapshot, RunType, RunTypeQuery, SnapshotSummary, StatsResponse};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>, Query(query): Query<RunTypeQuery>) -> Html<String> {
    let response = stats_for(&state, &query).await;
    Html(render_index(&response))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<RunTypeQuery>,
) -> Json<StatsResponse> {
    Json(stats_for(&state, &query).await)
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<RunTypeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let run_type = run_type(&state, &query);
    let snapshot = state.snapshot.read().await;
    let records = snapshot.records_for(run_type);
    let stats = aggregate(run_type, &records.finishes, &records.unfinishes);
    let value = serde_json::to_value(&stats).map_err(AppError::internal)?;
    Ok(Json(value))
}

pub async fn get_snapshot(State(state): State<AppState>) -> Json<PlayerSnapshot> {
    Json(state.snapshot.read().await.clone())
}

pub async fn put_snapshot(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<SnapshotSummary>, AppError> {
    let snapshot: PlayerSnapshot = serde_json::from_str(&body)
        .map_err(|err| RecordError::InvalidSnapshot(err.to_string()))?;

    let mut current = state.snapshot.write().await;
    persist_data(&state.config.data_path, &snapshot).await?;
    let summary = summarize(&snapshot);
    info!(
        player = %summary.player.name,
        maps = summary.maps,
        finishes = summary.finishes,
        "snapshot replaced"
    );
    *current = snapshot;

    Ok(Json(summary))
}

async fn stats_for(state: &AppState, query: &RunTypeQuery) -> StatsResponse {
    let run_type = run_type(state, query);
    let snapshot = state.snapshot.read().await;
    debug!(%run_type, finishes = snapshot.finishes.len(), "building stats");
    build_stats(&snapshot, run_type, state.config.top_n)
}

fn run_type(state: &AppState, query: &RunTypeQuery) -> RunType {
    query.run_type.unwrap_or(state.config.default_run_type)
}

fn summarize(snapshot: &PlayerSnapshot) -> SnapshotSummary {
    let pro_finishes = snapshot
        .finishes
        .iter()
        .filter(|record| record.run_type() == RunType::Pro)
        .count();
    SnapshotSummary {
        player: snapshot.player.clone(),
        maps: snapshot.maps.len(),
        finishes: snapshot.finishes.len(),
        pro_finishes,
        tp_finishes: snapshot.finishes.len() - pro_finishes,
    }
}
