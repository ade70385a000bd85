use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::reference::{GlossaryTermRow, LegalContentRow, ResourceRow, RightDutyRow};
use crate::reference::filters::{
    filter_glossary, filter_legal, filter_resources, filter_rights, LibraryQuery,
};
use crate::reference::store;
use crate::state::AppState;

/// A filtered list plus the size of the unfiltered one ("Showing 3 of 40").
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub total: usize,
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    fn new(total: usize, items: Vec<T>) -> Self {
        Self {
            total,
            count: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub id: Uuid,
    pub count: i32,
}

/// GET /api/v1/glossary
pub async fn handle_list_glossary(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Listing<GlossaryTermRow>>, AppError> {
    let query = query.reseed();
    let rows = store::list_glossary(&state.db).await?;
    let total = rows.len();
    Ok(Json(Listing::new(total, filter_glossary(rows, &query)?)))
}

/// GET /api/v1/legal
pub async fn handle_list_legal(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Listing<LegalContentRow>>, AppError> {
    let query = query.reseed();
    let rows = store::list_legal(&state.db).await?;
    let total = rows.len();
    Ok(Json(Listing::new(total, filter_legal(rows, &query)?)))
}

/// GET /api/v1/rights
pub async fn handle_list_rights(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Listing<RightDutyRow>>, AppError> {
    let rows = store::list_rights(&state.db).await?;
    let total = rows.len();
    Ok(Json(Listing::new(total, filter_rights(rows, &query)?)))
}

/// GET /api/v1/resources
pub async fn handle_list_resources(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LibraryQuery>,
) -> Result<Json<Listing<ResourceRow>>, AppError> {
    let query = query.reseed();
    let rows = store::list_resources(&state.db).await?;
    let total = rows.len();
    Ok(Json(Listing::new(total, filter_resources(rows, &query))))
}

/// POST /api/v1/resources/:id/click
pub async fn handle_resource_click(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CounterResponse>, AppError> {
    let count = store::record_resource_click(&state.db, id).await?;
    Ok(Json(CounterResponse { id, count }))
}

/// POST /api/v1/legal/:id/view
pub async fn handle_legal_view(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CounterResponse>, AppError> {
    let count = store::record_legal_view(&state.db, id).await?;
    Ok(Json(CounterResponse { id, count }))
}
