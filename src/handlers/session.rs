use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::session::SessionId,
    models::{
        AddToWatchlistRequest, CreateWatchlistRequest, SessionCreated, StockRecord, WatchlistEntry,
    },
    scanner::ScanCriteria,
    session::{BookView, NamedListView, RefreshTarget, RenderedTable, TableId, WatchlistView},
    state::AppState,
    table::{ColumnKey, SortConfig},
    watchlist::{WatchlistFilter, WatchlistSort},
};

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    let quotes = state.source.snapshot().await?;
    let session_id = state.sessions.create(quotes);
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

pub async fn delete_session(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_table(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(table): Path<TableId>,
) -> Result<Json<RenderedTable>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.render(table))?))
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub key: ColumnKey,
}

pub async fn sort_table(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(table): Path<TableId>,
    Json(req): Json<SortRequest>,
) -> Result<Json<SortConfig>, AppError> {
    let config = state.sessions.update(id, |s| s.sort(table, req.key))?;
    Ok(Json(config))
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

pub async fn set_page(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(table): Path<TableId>,
    Json(req): Json<PageRequest>,
) -> Result<Json<RenderedTable>, AppError> {
    let rendered = state.sessions.update(id, |s| {
        s.set_page(table, req.page);
        Ok(s.render(table))
    })?;
    Ok(Json(rendered))
}

pub async fn refresh_table(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(table): Path<TableId>,
) -> Result<Json<RenderedTable>, AppError> {
    state
        .sessions
        .refresh(id, RefreshTarget::Table(table), state.source.as_ref())
        .await?;
    Ok(Json(state.sessions.read(id, |s| s.render(table))?))
}

pub async fn set_criteria(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Json(criteria): Json<ScanCriteria>,
) -> Result<Json<RenderedTable>, AppError> {
    let rendered = state.sessions.update(id, |s| {
        s.set_criteria(criteria);
        Ok(s.render(TableId::Scanner))
    })?;
    Ok(Json(rendered))
}

pub async fn get_criteria(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<ScanCriteria>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.criteria().clone())?))
}

pub async fn get_watchlist(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<WatchlistView>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.watchlist_view())?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AvailableQuery {
    pub search: String,
}

pub async fn available_stocks(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Query(query): Query<AvailableQuery>,
) -> Result<Json<Vec<StockRecord>>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.available(&query.search))?))
}

pub async fn add_to_watchlist(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Json(req): Json<AddToWatchlistRequest>,
) -> Result<(StatusCode, Json<WatchlistEntry>), AppError> {
    let entry = state
        .sessions
        .update(id, |s| s.watch(&req.symbol))
        .inspect_err(|err| {
            tracing::warn!(session = %id, symbol = %req.symbol, %err, "watch rejected")
        })?;
    tracing::debug!(session = %id, symbol = %entry.stock.symbol, "added to watchlist");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(symbol): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(id, |s| s.unwatch(&symbol))
        .inspect_err(|err| tracing::warn!(session = %id, %symbol, %err, "unwatch rejected"))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_book(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<BookView>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.book_view())?))
}

pub async fn create_watchlist(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Json(req): Json<CreateWatchlistRequest>,
) -> Result<(StatusCode, Json<BookView>), AppError> {
    let view = state.sessions.update(id, |s| {
        s.create_list(&req.name)?;
        Ok(s.book_view())
    })?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn refresh_book(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<BookView>, AppError> {
    state
        .sessions
        .refresh(id, RefreshTarget::Book, state.source.as_ref())
        .await?;
    Ok(Json(state.sessions.read(id, |s| s.book_view())?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NamedListQuery {
    pub filter: WatchlistFilter,
    pub sort: WatchlistSort,
    pub page: Option<usize>,
}

pub async fn get_named_list(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(name): Path<String>,
    Query(query): Query<NamedListQuery>,
) -> Result<Json<NamedListView>, AppError> {
    let view = state.sessions.read(id, |s| {
        s.named_list(&name, query.filter, query.sort, query.page.unwrap_or(1))
    })??;
    Ok(Json(view))
}

pub async fn add_to_named_list(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path(name): Path<String>,
    Json(req): Json<AddToWatchlistRequest>,
) -> Result<(StatusCode, Json<WatchlistEntry>), AppError> {
    let entry = state
        .sessions
        .update(id, |s| s.watch_in(&name, &req.symbol))
        .inspect_err(|err| {
            tracing::warn!(
                session = %id,
                list = %name,
                symbol = %req.symbol,
                %err,
                "watch rejected"
            )
        })?;
    tracing::debug!(session = %id, list = %name, symbol = %entry.stock.symbol, "added to list");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn remove_from_named_list(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    Path((name, symbol)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .update(id, |s| s.unwatch_in(&name, &symbol))
        .inspect_err(|err| {
            tracing::warn!(session = %id, list = %name, %symbol, %err, "unwatch rejected")
        })?;
    Ok(StatusCode::NO_CONTENT)
}
