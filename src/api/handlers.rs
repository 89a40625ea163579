use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{CatalogOptions, Choice, Criteria, SearchOutcome, SelectionStage, Session};
use crate::services::{evaluate, Catalog};

use super::AppState;

const RESET_ACTION: &str = "button_click";
const RESET_VALUE: &str = "reset_selection";

// Response types

/// A session together with what its current selection resolves to
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub criteria: Criteria,
    pub stage: SelectionStage,
    pub outcome: SearchOutcome,
}

impl SessionView {
    fn build(session: &Session, catalog: &Catalog, limit: usize) -> Self {
        Self {
            session_id: session.id,
            criteria: session.criteria.clone(),
            stage: session.criteria.stage(),
            outcome: evaluate(catalog, &session.criteria, limit),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Distinct values for each criterion, used to draw the selection buttons
pub async fn get_options(State(state): State<AppState>) -> AppResult<Json<CatalogOptions>> {
    let catalog = state.catalog().await?;
    Ok(Json(catalog.options()))
}

/// Query parameters of `/search`; blank values count as unset
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub decade: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
}

impl From<SearchQuery> for Criteria {
    fn from(query: SearchQuery) -> Self {
        Criteria {
            decade: query.decade,
            country: query.country,
            genre: query.genre,
        }
        .normalized()
    }
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Stateless evaluation of a selection given as query parameters
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchOutcome>> {
    let catalog = state.catalog().await?;
    let criteria = Criteria::from(query);
    Ok(Json(evaluate(&catalog, &criteria, state.example_limit())))
}

/// Starts a new session with nothing selected
pub async fn create_session(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let catalog = state.catalog().await?;
    let session = Session::new();

    tracing::info!(session_id = %session.id, "Session created");

    let view = SessionView::build(&session, &catalog, state.example_limit());
    state.insert_session(session).await;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Current selection and result of a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let catalog = state.catalog().await?;
    let session = state.session(id).await?;
    Ok(Json(SessionView::build(&session, &catalog, state.example_limit())))
}

/// Toggles one criterion value; picking the selected value again clears it
pub async fn select(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(choice): Json<Choice>,
) -> AppResult<Json<SessionView>> {
    let catalog = state.catalog().await?;

    let choice = choice.normalized();
    validate_choice(&catalog.options(), &choice)?;

    let action = format!("select_{}", choice.criterion());
    let value = choice.value_string();
    let session = state
        .update_session(id, |session| session.select(choice))
        .await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        action = %action,
        value = %value,
        "Selection toggled"
    );

    state.action_log().record_or_warn(id, &action, &value).await;

    Ok(Json(SessionView::build(&session, &catalog, state.example_limit())))
}

/// Clears every criterion of a session
pub async fn reset(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let catalog = state.catalog().await?;
    let session = state.update_session(id, Session::reset).await?;

    tracing::info!(request_id = %request_id, session_id = %id, "Selection reset");

    state
        .action_log()
        .record_or_warn(id, RESET_ACTION, RESET_VALUE)
        .await;

    Ok(Json(SessionView::build(&session, &catalog, state.example_limit())))
}

/// Only values present in the catalog can be selected
fn validate_choice(options: &CatalogOptions, choice: &Choice) -> AppResult<()> {
    let known = match choice {
        Choice::Decade(decade) => options.decades.contains(decade),
        Choice::Country(country) => options.countries.contains(country),
        Choice::Genre(genre) => options.genres.contains(genre),
    };

    if known {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "unknown {} '{}'",
            choice.criterion(),
            choice.value_string()
        )))
    }
}
