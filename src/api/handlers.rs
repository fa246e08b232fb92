//! Route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{CLASS_SLUGS, Expansion, ItemSet, Quality};
use crate::query::{SetQuery, run_query};

use super::AppState;

/// Shown when neither the scrape fallback nor any item icon yields an image.
const PLACEHOLDER_IMAGE: &str =
    "https://render-eu.worldofwarcraft.com/icons/56/inv_misc_questionmark.jpg";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: u32,
    pub name: String,
    pub icon_url: Option<String>,
}

/// An item set as rendered to clients: cached fields plus derived ones.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetView {
    pub id: u32,
    pub name: String,
    pub classes: Vec<String>,
    pub expansion: Expansion,
    pub quality: Quality,
    pub items: Vec<ItemView>,
    pub wowhead_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub transmogs: Vec<SetView>,
    pub pagination: Pagination,
}

/// Resolve item icons and derived links for one set.
async fn enrich(state: &AppState, set: ItemSet) -> SetView {
    let mut items = Vec::with_capacity(set.items.len());
    for item in &set.items {
        let icon_url = state.icons.resolve(&state.blizzard, item.id).await;
        items.push(ItemView {
            id: item.id,
            name: item.name.clone(),
            icon_url,
        });
    }

    SetView {
        wowhead_link: set.wowhead_link(),
        id: set.id,
        name: set.name,
        classes: set.classes,
        expansion: set.expansion,
        quality: set.quality,
        items,
        image_url: None,
    }
}

/// `GET /api/transmogs`
pub async fn list_sets(
    State(state): State<AppState>,
    Query(query): Query<SetQuery>,
) -> Json<ListResponse> {
    let snapshot = state.store.snapshot().await;
    let page = run_query(&snapshot, &query);

    let mut transmogs = Vec::with_capacity(page.items.len());
    for set in page.items {
        transmogs.push(enrich(&state, set).await);
    }

    Json(ListResponse {
        transmogs,
        pagination: Pagination {
            current_page: page.current_page,
            total_items: page.total_items,
            total_pages: page.total_pages,
        },
    })
}

/// `GET /api/transmogs/filters`
///
/// Distinct values present in the cache, in canonical order: classes by the
/// class table, expansions chronologically, qualities by rarity rank.
pub async fn filter_options(State(state): State<AppState>) -> Json<Value> {
    let sets = state.store.snapshot().await;

    let classes: Vec<&str> = CLASS_SLUGS
        .iter()
        .filter(|slug| sets.iter().any(|s| s.classes.iter().any(|c| c == *slug)))
        .copied()
        .collect();

    let expansions: Vec<&str> = Expansion::ALL
        .iter()
        .filter(|e| sets.iter().any(|s| s.expansion == **e))
        .map(|e| e.label())
        .collect();

    let qualities: Vec<&str> = Quality::ALL
        .iter()
        .filter(|q| sets.iter().any(|s| s.quality == **q))
        .map(|q| q.label())
        .collect();

    Json(json!({
        "classes": classes,
        "expansions": expansions,
        "qualities": qualities,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BatchParams {
    #[serde(default)]
    pub ids: String,
}

/// `GET /api/transmogs/batch?ids=1,2,3`
///
/// Unknown ids and unparseable tokens are silently dropped.
pub async fn batch_sets(
    State(state): State<AppState>,
    Query(params): Query<BatchParams>,
) -> Json<Vec<SetView>> {
    let ids: Vec<u32> = params
        .ids
        .split(',')
        .filter_map(|token| token.trim().parse().ok())
        .collect();

    let mut views = Vec::new();
    for set in state.store.get_many(&ids).await {
        views.push(enrich(&state, set).await);
    }
    Json(views)
}

/// `GET /api/transmogs/{id}`
pub async fn set_detail(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<SetView>> {
    let set = state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found("Set not found"))?;

    let mut view = enrich(&state, set).await;

    // Preview image chain: any member icon, then the Wowhead render, then
    // the question-mark placeholder. Scrape failures just fall through.
    let mut image_url = view.items.iter().find_map(|i| i.icon_url.clone());
    if image_url.is_none() {
        image_url = match state.wowhead.fetch_set_image(id).await {
            Ok(image) => image,
            Err(e) => {
                log::debug!("Image scrape failed for set {}: {}", id, e);
                None
            }
        };
    }
    view.image_url = Some(image_url.unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()));

    Ok(Json(view))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let last_run = state.hydrator.last_report().await.map(|report| {
        json!({
            "startedAt": report.started_at,
            "finishedAt": report.finished_at,
            "examined": report.examined,
            "succeeded": report.succeeded,
            "failed": report.failed.len(),
        })
    });

    Json(json!({
        "status": "ok",
        "sets": state.store.len().await,
        "hydration": state.hydrator.state(),
        "lastRun": last_run,
    }))
}

/// `POST /api/cache/clear`
///
/// Drops the per-process icon cache, never the hydration cache.
pub async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.icons.clear().await;
    log::info!("Icon cache cleared ({} entries)", cleared);
    Json(json!({ "status": "ok", "cleared": cleared }))
}
