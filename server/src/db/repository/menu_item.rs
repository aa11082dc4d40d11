//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, new_record_key, now_millis, strip_table_prefix};
use shared::models::menu_item::{validate_special_offer, MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::models::MenuCategory;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MENU_TABLE: &str = "menu_item";

/// Listing filter; all fields are optional and combine with AND
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    pub category: Option<MenuCategory>,
    pub available: Option<bool>,
    pub special_only: bool,
    /// Case-insensitive substring match on name or description
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List menu items: specials first, then newest first
    pub async fn find_all(&self, filter: &MenuFilter) -> RepoResult<Vec<MenuItem>> {
        let mut where_parts: Vec<&str> = Vec::new();
        if filter.category.is_some() {
            where_parts.push("category = $category");
        }
        if filter.available.is_some() {
            where_parts.push("available = $available");
        }
        if filter.special_only {
            where_parts.push("isSpecial = true");
        }
        if filter.search.is_some() {
            where_parts.push(
                "(string::contains(string::lowercase(name), $search) \
                 OR string::contains(string::lowercase(description), $search))",
            );
        }

        let where_clause = if where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_parts.join(" AND "))
        };
        let query_str = format!(
            "SELECT *, record::id(id) AS id FROM menu_item{} ORDER BY isSpecial DESC, createdAt DESC",
            where_clause
        );

        let mut query = self.base.db().query(query_str);
        if let Some(category) = filter.category {
            query = query.bind(("category", category.as_str()));
        }
        if let Some(available) = filter.available {
            query = query.bind(("available", available));
        }
        if let Some(search) = &filter.search {
            query = query.bind(("search", search.to_lowercase()));
        }

        let items: Vec<MenuItem> = query.await?.take(0)?;
        Ok(items)
    }

    /// Specials whose validity window has not passed
    pub async fn find_active_specials(&self, now: i64) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM menu_item \
                 WHERE isSpecial = true AND (validUntil IS NONE OR validUntil >= $now) \
                 ORDER BY createdAt DESC",
            )
            .bind(("now", now))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let key = strip_table_prefix(MENU_TABLE, id).to_string();
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('menu_item', $key)")
            .bind(("key", key))
            .await?
            .take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create a new menu item; price is derived when the item is special
    pub async fn create(&self, data: MenuItemCreate, image: String) -> RepoResult<MenuItem> {
        let price = if data.is_special {
            validate_special_offer(data.original_price, data.discount_percentage)?
        } else {
            let price = data
                .price
                .ok_or_else(|| RepoError::Validation("price is required".into()))?;
            if price <= 0.0 {
                return Err(RepoError::Validation("price must be greater than 0".into()));
            }
            price
        };

        let now = now_millis();
        let item = MenuItem {
            id: None,
            name: data.name,
            description: data.description,
            category: data.category,
            price,
            image,
            available: data.available.unwrap_or(true),
            is_special: data.is_special,
            original_price: data.is_special.then_some(data.original_price).flatten(),
            discount_percentage: data.is_special.then_some(data.discount_percentage).flatten(),
            special_badge: data.is_special.then_some(data.special_badge).flatten(),
            special_description: data.is_special.then_some(data.special_description).flatten(),
            valid_until: data.is_special.then_some(data.valid_until).flatten(),
            created_at: now,
            updated_at: now,
        };

        let key = new_record_key();
        self.base
            .db()
            .query("CREATE type::thing('menu_item', $key) CONTENT $data RETURN NONE")
            .bind(("key", key.clone()))
            .bind(("data", item))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("failed to create menu item".into()))
    }

    /// Partial update.
    ///
    /// Clearing `isSpecial` drops every special field; keeping it set
    /// recomputes the price whenever either pricing input changes.
    /// Read-modify-write on a single record: last write wins, which is
    /// the store's documented concurrency behavior.
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let key = strip_table_prefix(MENU_TABLE, id).to_string();
        let mut item = self
            .find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if let Some(name) = data.name {
            item.name = name;
        }
        if let Some(description) = data.description {
            item.description = description;
        }
        if let Some(category) = data.category {
            item.category = category;
        }
        if let Some(image) = data.image {
            item.image = image;
        }
        if let Some(available) = data.available {
            item.available = available;
        }

        let was_special = item.is_special;
        if let Some(is_special) = data.is_special {
            item.is_special = is_special;
        }

        if item.is_special {
            if let Some(original) = data.original_price {
                item.original_price = Some(original);
            }
            if let Some(pct) = data.discount_percentage {
                item.discount_percentage = Some(pct);
            }
            if let Some(badge) = data.special_badge {
                item.special_badge = Some(badge);
            }
            if let Some(text) = data.special_description {
                item.special_description = Some(text);
            }
            if let Some(until) = data.valid_until {
                item.valid_until = Some(until);
            }

            // Recompute whenever the item is (or becomes) special and a
            // pricing input changed
            if !was_special
                || data.original_price.is_some()
                || data.discount_percentage.is_some()
            {
                item.price =
                    validate_special_offer(item.original_price, item.discount_percentage)?;
            }
        } else {
            item.original_price = None;
            item.discount_percentage = None;
            item.special_badge = None;
            item.special_description = None;
            item.valid_until = None;

            if let Some(price) = data.price {
                if price <= 0.0 {
                    return Err(RepoError::Validation("price must be greater than 0".into()));
                }
                item.price = price;
            }
        }

        item.updated_at = now_millis();
        item.id = None; // id lives in the record key, not the content

        self.base
            .db()
            .query("UPDATE type::thing('menu_item', $key) CONTENT $data RETURN NONE")
            .bind(("key", key.clone()))
            .bind(("data", item))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Single-field availability toggle
    pub async fn set_availability(&self, id: &str, available: bool) -> RepoResult<MenuItem> {
        let key = strip_table_prefix(MENU_TABLE, id).to_string();
        self.base
            .db()
            .query(
                "UPDATE type::thing('menu_item', $key) \
                 SET available = $available, updatedAt = $now RETURN NONE",
            )
            .bind(("key", key.clone()))
            .bind(("available", available))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete; returns the removed item so the caller can clean up
    /// its image file. Historical orders keep their snapshot.
    pub async fn delete(&self, id: &str) -> RepoResult<MenuItem> {
        let key = strip_table_prefix(MENU_TABLE, id).to_string();
        let item = self
            .find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        self.base
            .db()
            .query("DELETE type::thing('menu_item', $key)")
            .bind(("key", key))
            .await?
            .check()?;

        Ok(item)
    }

    /// Total number of menu items (for the dashboard stats)
    pub async fn count(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Count {
            count: i64,
        }
        let counts: Vec<Count> = self
            .base
            .db()
            .query("SELECT count() AS count FROM menu_item GROUP ALL")
            .await?
            .take(0)?;
        Ok(counts.into_iter().next().map(|c| c.count).unwrap_or(0))
    }
}
