//! Menu API Handlers
//!
//! Create and update arrive as multipart forms (text fields plus an
//! `image` file part), matching what the admin dashboard submits.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate, SpecialBadge};

use crate::api::image::storage;
use crate::core::ServerState;
use crate::db::repository::{MenuFilter, MenuItemRepository};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub available: Option<bool>,
    pub is_special: Option<bool>,
}

/// GET /api/menu - list the catalog
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let category = match &query.category {
        Some(raw) => Some(MenuCategory::parse(raw)?),
        None => None,
    };
    let filter = MenuFilter {
        category,
        available: query.available,
        special_only: query.is_special.unwrap_or(false),
        search: query.search.clone().filter(|s| !s.trim().is_empty()),
    };

    let repo = MenuItemRepository::new(state.get_db());
    let items = repo
        .find_all(&filter)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;
    Ok(Json(items))
}

/// GET /api/menu/specials - active special offers
pub async fn specials(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let now = chrono::Utc::now().timestamp_millis();
    let items = repo
        .find_active_specials(now)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;
    Ok(Json(items))
}

/// GET /api/menu/:id - single item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .find_by_id(&id)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
        })?;
    Ok(Json(item))
}

/// POST /api/menu - create an item (admin, multipart)
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<MenuItem>> {
    let form = parse_form(multipart).await?;
    let (image_data, image_ext) = form
        .image
        .as_ref()
        .ok_or_else(|| AppError::validation("An 'image' file is required"))?;

    let data = MenuItemCreate {
        name: form
            .text("name")
            .ok_or_else(|| AppError::validation("'name' is required"))?,
        description: form.text("description").unwrap_or_default(),
        category: match form.text("category") {
            Some(raw) => MenuCategory::parse(&raw)?,
            None => MenuCategory::default(),
        },
        price: form.f64("price")?,
        available: form.bool("available")?,
        is_special: form.bool("isSpecial")?.unwrap_or(false),
        original_price: form.f64("originalPrice")?,
        discount_percentage: form.f64("discountPercentage")?,
        special_badge: match form.text("specialBadge") {
            Some(raw) => Some(SpecialBadge::parse(&raw)?),
            None => None,
        },
        special_description: form.text("specialDescription"),
        valid_until: form.i64("validUntil")?,
    };

    let filename = storage::save_image(&state.images_dir(), image_data, image_ext)?;

    let repo = MenuItemRepository::new(state.get_db());
    match repo.create(data, filename.clone()).await {
        Ok(item) => Ok(Json(item)),
        Err(e) => {
            // Creation failed after the image hit disk; remove it again
            storage::delete_image(&state.images_dir(), &filename);
            Err(e.into_app(ErrorCode::MenuItemNotFound))
        }
    }
}

/// PUT /api/menu/:id - update an item (admin, multipart)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<MenuItem>> {
    let form = parse_form(multipart).await?;

    let repo = MenuItemRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
        })?;

    let new_image = match &form.image {
        Some((data, ext)) => Some(storage::save_image(&state.images_dir(), data, ext)?),
        None => None,
    };

    let data = MenuItemUpdate {
        name: form.text("name"),
        description: form.text("description"),
        category: match form.text("category") {
            Some(raw) => Some(MenuCategory::parse(&raw)?),
            None => None,
        },
        price: form.f64("price")?,
        image: new_image.clone(),
        available: form.bool("available")?,
        is_special: form.bool("isSpecial")?,
        original_price: form.f64("originalPrice")?,
        discount_percentage: form.f64("discountPercentage")?,
        special_badge: match form.text("specialBadge") {
            Some(raw) => Some(SpecialBadge::parse(&raw)?),
            None => None,
        },
        special_description: form.text("specialDescription"),
        valid_until: form.i64("validUntil")?,
    };

    match repo.update(&id, data).await {
        Ok(item) => {
            // The replaced image is orphaned once the update commits
            if new_image.is_some() && existing.image != item.image {
                storage::delete_image(&state.images_dir(), &existing.image);
            }
            Ok(Json(item))
        }
        Err(e) => {
            if let Some(filename) = &new_image {
                storage::delete_image(&state.images_dir(), filename);
            }
            Err(e.into_app(ErrorCode::MenuItemNotFound))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityPayload {
    pub available: bool,
}

/// PATCH /api/menu/:id/availability - toggle availability (admin)
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityPayload>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .set_availability(&id, payload.available)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;
    Ok(Json(item))
}

/// DELETE /api/menu/:id - remove an item and its image (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .delete(&id)
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;

    storage::delete_image(&state.images_dir(), &item.image);
    Ok(Json(item))
}

// =============================================================================
// Multipart parsing
// =============================================================================

struct ParsedForm {
    fields: HashMap<String, String>,
    /// Raw bytes and extension of the `image` file part, when present
    image: Option<(Vec<u8>, String)>,
}

impl ParsedForm {
    fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn f64(&self, name: &str) -> AppResult<Option<f64>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|_| AppError::validation(format!("'{}' must be a number", name)))
            })
            .transpose()
    }

    fn i64(&self, name: &str) -> AppResult<Option<i64>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::validation(format!("'{}' must be an integer", name)))
            })
            .transpose()
    }

    fn bool(&self, name: &str) -> AppResult<Option<bool>> {
        self.text(name)
            .map(|raw| match raw.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(AppError::validation(format!(
                    "'{}' must be true or false",
                    name
                ))),
            })
            .transpose()
    }
}

async fn parse_form(mut multipart: Multipart) -> AppResult<ParsedForm> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if name == "image" {
            let ext = field
                .file_name()
                .and_then(|f| {
                    std::path::Path::new(f)
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_string())
                })
                .ok_or_else(|| AppError::validation("Image file has no extension"))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                .to_vec();
            image = Some((data, ext));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok(ParsedForm { fields, image })
}
