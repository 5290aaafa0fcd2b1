use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    market,
    mock_data,
    models::{MarketAlert, MarketOverview, NewsArticle, StockDetail, StockRecord},
    scanner::{self, PriceRange, ScanCriteria, VolumeBand},
    state::AppState,
    table::{
        quote_columns, scan_columns, ColumnKey, SortConfig, SortDirection, TablePage, TableSpec,
        TableState,
    },
};

const STOCKS_PAGE_SIZE: usize = 10;

/// Sort and page parameters shared by the stateless tables.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    pub sort: Option<ColumnKey>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl TableQuery {
    fn state<R>(
        &self,
        spec: &TableSpec<R>,
        default_page_size: usize,
    ) -> Result<TableState, AppError> {
        let page_size = self.per_page.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err(AppError::InvalidQuery("perPage must be at least 1".into()));
        }
        let sort = match self.sort {
            Some(key) if !spec.is_sortable(key) => {
                return Err(AppError::InvalidQuery(format!("column {key:?} is not sortable")));
            }
            Some(key) => Some(SortConfig {
                key,
                direction: self.direction.unwrap_or_default(),
            }),
            None => None,
        };
        Ok(TableState::new(page_size)
            .with_sort(sort)
            .with_page(self.page.unwrap_or(1)))
    }
}

fn stocks_spec() -> TableSpec<StockRecord> {
    TableSpec::new("Stock Data", quote_columns())
}

pub async fn get_stocks(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TablePage<StockRecord>>, AppError> {
    let spec = stocks_spec();
    let table = query.state(&spec, STOCKS_PAGE_SIZE)?;
    let rows = state.source.snapshot().await?;
    Ok(Json(table.render(&spec, &rows)))
}

/// Fresh rows from the data source, rendered from page one.
pub async fn refresh_stocks(
    State(state): State<AppState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TablePage<StockRecord>>, AppError> {
    let spec = stocks_spec();
    let table = query.state(&spec, STOCKS_PAGE_SIZE)?.with_page(1);
    let rows = state.source.refresh().await?;
    tracing::info!(rows = rows.len(), source = state.source.id(), "stock data refreshed");
    Ok(Json(table.render(&spec, &rows)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerQuery {
    pub search: String,
    pub sector: Option<String>,
    pub price: PriceRange,
    pub volume: VolumeBand,
    pub sort: Option<ColumnKey>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
}

pub async fn scan(
    State(state): State<AppState>,
    Query(query): Query<ScannerQuery>,
) -> Result<Json<TablePage<StockRecord>>, AppError> {
    let criteria = ScanCriteria {
        search: query.search,
        sector: query.sector.unwrap_or_else(|| scanner::ALL_SECTORS.to_string()),
        price: query.price,
        volume: query.volume,
    };
    let spec = TableSpec::new("Filtered Results", scan_columns());
    let table = TableQuery {
        sort: query.sort,
        direction: query.direction,
        page: query.page,
        per_page: None,
    }
    .state(&spec, crate::session::SCANNER_PAGE_SIZE)?;

    let stocks = state.source.snapshot().await?;
    let matches = scanner::scan(&stocks, &criteria);
    tracing::debug!(?criteria, matches = matches.len(), "scan");
    Ok(Json(table.render(&spec, &matches)))
}

pub async fn get_sectors(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let stocks = state.source.snapshot().await?;
    Ok(Json(scanner::sectors(&stocks)))
}

pub async fn get_overview(State(state): State<AppState>) -> Result<Json<MarketOverview>, AppError> {
    let stocks = state.source.snapshot().await?;
    let indices = state.source.indices().await?;
    let sectors = state.source.sectors().await?;
    Ok(Json(market::overview(&stocks, indices, sectors)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<StockRecord>>, AppError> {
    let stocks = state.source.snapshot().await?;
    Ok(Json(market::search(&stocks, &query.q).into_iter().cloned().collect()))
}

pub async fn lookup_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockDetail>, AppError> {
    let stocks = state.source.snapshot().await?;
    let stock = market::find(&stocks, &symbol)?;
    Ok(Json(market::detail(stock, &mut rand::thread_rng())))
}

pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let articles = state.source.news().await?;
    Ok(Json(market::search_news(articles, &query.q)))
}

pub async fn get_alerts() -> Json<Vec<MarketAlert>> {
    Json(mock_data::market_alerts())
}
