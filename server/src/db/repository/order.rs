//! Order Repository
//!
//! Order creation re-prices every line from the live catalog so a
//! tampered client payload can never set its own prices. Status changes
//! go through the state machine in [`OrderStatus`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    MenuItem, Order, OrderCreate, OrderLine, OrderStatus, OrderUser, PaymentMethod, PaymentStatus,
};

use super::{BaseRepository, RepoError, RepoResult, new_record_key, now_millis, strip_table_prefix};

const ORDER_TABLE: &str = "order";

/// Tolerance when comparing the client-submitted total against the
/// server-computed one (prices are whole currency units)
const TOTAL_EPSILON: f64 = 0.01;

/// Listing filter; fields combine with AND
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Owning user key
    pub user: Option<String>,
    /// Inclusive `createdAt` range in Unix millis
    pub created_between: Option<(i64, i64)>,
}

/// Dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: i64,
    pub today_orders: i64,
    /// Orders still in the kitchen queue (pending/confirmed/preparing)
    pub pending_orders: i64,
    /// Revenue excludes cancelled orders
    pub total_revenue: f64,
    pub today_revenue: f64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order from client line references.
    ///
    /// Every line is re-fetched from the catalog: name and price are
    /// snapshotted server-side, unknown items and unavailable items are
    /// rejected, and a client-submitted total must match the computed
    /// one.
    pub async fn create(&self, user_key: &str, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyOrder).into());
        }

        // A long-lived token is not proof the account still exists or
        // is still enabled.
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UserGate {
            is_active: bool,
        }
        let user_key = strip_table_prefix("user", user_key).to_string();
        let owners: Vec<UserGate> = self
            .base
            .db()
            .query("SELECT isActive FROM type::thing('user', $key)")
            .bind(("key", user_key.clone()))
            .await?
            .take(0)?;
        let Some(owner) = owners.into_iter().next() else {
            return Err(AppError::with_message(
                ErrorCode::UserNotFound,
                format!("User {} not found", user_key),
            )
            .into());
        };
        if !owner.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled).into());
        }

        let mut lines = Vec::with_capacity(data.items.len());
        for input in &data.items {
            if input.quantity == 0 {
                return Err(AppError::with_message(
                    ErrorCode::InvalidQuantity,
                    format!("quantity for {} must be at least 1", input.menu_item_id),
                )
                .into());
            }

            let key = strip_table_prefix("menu_item", &input.menu_item_id).to_string();
            let items: Vec<MenuItem> = self
                .base
                .db()
                .query("SELECT *, record::id(id) AS id FROM type::thing('menu_item', $key)")
                .bind(("key", key.clone()))
                .await?
                .take(0)?;
            let Some(item) = items.into_iter().next() else {
                return Err(AppError::with_message(
                    ErrorCode::MenuItemNotFound,
                    format!("Menu item {} not found", input.menu_item_id),
                )
                .into());
            };
            if !item.available {
                return Err(AppError::with_message(
                    ErrorCode::MenuItemUnavailable,
                    format!("'{}' is currently unavailable", item.name),
                )
                .into());
            }

            lines.push(OrderLine {
                menu_item: key,
                name: item.name,
                price: item.price,
                quantity: input.quantity,
                image: None,
            });
        }

        let total: f64 = lines.iter().map(OrderLine::line_total).sum();
        if let Some(claimed) = data.total_amount {
            if (claimed - total).abs() > TOTAL_EPSILON {
                return Err(AppError::with_message(
                    ErrorCode::OrderTotalMismatch,
                    format!(
                        "submitted total {} does not match computed total {}",
                        claimed, total
                    ),
                )
                .into());
            }
        }

        let now = now_millis();
        let order = Order {
            id: None,
            user: user_key,
            items: lines,
            total_amount: total,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: data.payment_method.unwrap_or(PaymentMethod::Cash),
            room_number: data.room_number,
            special_instructions: data.special_instructions,
            created_at: now,
            updated_at: now,
            user_info: None,
        };

        let key = new_record_key();
        self.base
            .db()
            .query("CREATE type::thing('order', $key) CONTENT $data RETURN NONE")
            .bind(("key", key.clone()))
            .bind(("data", order))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::Database("failed to create order".into()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let key = strip_table_prefix(ORDER_TABLE, id).to_string();
        let mut orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT *, record::id(id) AS id FROM type::thing('order', $key)")
            .bind(("key", key))
            .await?
            .take(0)?;
        self.annotate(&mut orders).await?;
        Ok(orders.into_iter().next())
    }

    /// List orders, newest first
    pub async fn find(&self, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
        let mut where_parts: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            where_parts.push("status = $status");
        }
        if filter.user.is_some() {
            where_parts.push("user = $user");
        }
        if filter.created_between.is_some() {
            where_parts.push("createdAt >= $from AND createdAt <= $to");
        }

        let where_clause = if where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_parts.join(" AND "))
        };
        let query_str = format!(
            "SELECT *, record::id(id) AS id FROM order{} ORDER BY createdAt DESC",
            where_clause
        );

        let mut query = self.base.db().query(query_str);
        if let Some(status) = filter.status {
            query = query.bind(("status", status.as_str()));
        }
        if let Some(user) = &filter.user {
            query = query.bind(("user", user.clone()));
        }
        if let Some((from, to)) = filter.created_between {
            query = query.bind(("from", from)).bind(("to", to));
        }

        let mut orders: Vec<Order> = query.await?.take(0)?;
        self.annotate(&mut orders).await?;
        Ok(orders)
    }

    /// Latest non-cancelled orders, scoped to one user's feed when a
    /// key is given
    pub async fn find_recent(&self, user: Option<&str>, limit: usize) -> RepoResult<Vec<Order>> {
        let user_clause = if user.is_some() { " AND user = $user" } else { "" };
        let mut query = self.base.db().query(format!(
            "SELECT *, record::id(id) AS id FROM order \
             WHERE status != 'cancelled'{} \
             ORDER BY createdAt DESC LIMIT $limit",
            user_clause
        ));
        if let Some(user) = user {
            query = query.bind(("user", user.to_string()));
        }
        let mut orders: Vec<Order> = query.bind(("limit", limit)).await?.take(0)?;
        self.annotate(&mut orders).await?;
        Ok(orders)
    }

    /// Apply a status transition.
    ///
    /// Rejected when the state machine forbids the move. Delivery
    /// settles the cash-on-delivery payment.
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> RepoResult<Order> {
        let key = strip_table_prefix(ORDER_TABLE, id).to_string();
        let current = self
            .find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!(
                    "cannot move order from '{}' to '{}'",
                    current.status.as_str(),
                    next.as_str()
                ),
            )
            .into());
        }

        let payment_status = if next == OrderStatus::Delivered {
            PaymentStatus::Paid
        } else {
            current.payment_status
        };

        self.base
            .db()
            .query(
                "UPDATE type::thing('order', $key) \
                 SET status = $status, paymentStatus = $payment, updatedAt = $now RETURN NONE",
            )
            .bind(("key", key.clone()))
            .bind(("status", next.as_str()))
            .bind(("payment", payment_status))
            .bind(("now", now_millis()))
            .await?
            .check()?;

        self.find_by_id(&key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Number of orders created inside the given range (all statuses)
    pub async fn count_between(&self, from: i64, to: i64) -> RepoResult<i64> {
        let counts: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM order \
                 WHERE createdAt >= $from AND createdAt <= $to GROUP ALL",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(first_count(counts))
    }

    /// Dashboard counters; `today` is the business-day range in millis
    pub async fn stats(&self, today: (i64, i64)) -> RepoResult<OrderStats> {
        let (from, to) = today;

        let total: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM order GROUP ALL")
            .await?
            .take(0)?;

        let pending: Vec<CountRow> = self
            .base
            .db()
            .query(
                "SELECT count() AS count FROM order \
                 WHERE status IN ['pending', 'confirmed', 'preparing'] GROUP ALL",
            )
            .await?
            .take(0)?;

        let total_revenue: Vec<SumRow> = self
            .base
            .db()
            .query(
                "SELECT math::sum(totalAmount) AS total FROM order \
                 WHERE status != 'cancelled' GROUP ALL",
            )
            .await?
            .take(0)?;

        let today_revenue: Vec<SumRow> = self
            .base
            .db()
            .query(
                "SELECT math::sum(totalAmount) AS total FROM order \
                 WHERE status != 'cancelled' \
                 AND createdAt >= $from AND createdAt <= $to GROUP ALL",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;

        Ok(OrderStats {
            total_orders: first_count(total),
            today_orders: self.count_between(from, to).await?,
            pending_orders: first_count(pending),
            total_revenue: first_sum(total_revenue),
            today_revenue: first_sum(today_revenue),
        })
    }

    /// Non-cancelled orders since a cutoff, oldest first. Bucketing for
    /// the analytics endpoint happens caller-side over this set.
    pub async fn find_non_cancelled_since(&self, since: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT *, record::id(id) AS id FROM order \
                 WHERE status != 'cancelled' AND createdAt >= $since \
                 ORDER BY createdAt ASC",
            )
            .bind(("since", since))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Attach read-time projections: the owning user's details and each
    /// line's current catalog image
    async fn annotate(&self, orders: &mut [Order]) -> RepoResult<()> {
        if orders.is_empty() {
            return Ok(());
        }

        let user_keys: Vec<String> = {
            let mut keys: Vec<String> = orders.iter().map(|o| o.user.clone()).collect();
            keys.sort();
            keys.dedup();
            keys
        };
        let users: Vec<OrderUser> = self
            .base
            .db()
            .query(
                "SELECT record::id(id) AS id, name, email, phone FROM user \
                 WHERE record::id(id) IN $keys",
            )
            .bind(("keys", user_keys))
            .await?
            .take(0)?;
        let user_map: HashMap<String, OrderUser> =
            users.into_iter().map(|u| (u.id.clone(), u)).collect();

        let item_keys: Vec<String> = {
            let mut keys: Vec<String> = orders
                .iter()
                .flat_map(|o| o.items.iter().map(|l| l.menu_item.clone()))
                .collect();
            keys.sort();
            keys.dedup();
            keys
        };
        #[derive(Deserialize)]
        struct ImageRow {
            id: String,
            image: String,
        }
        let images: Vec<ImageRow> = self
            .base
            .db()
            .query(
                "SELECT record::id(id) AS id, image FROM menu_item \
                 WHERE record::id(id) IN $keys",
            )
            .bind(("keys", item_keys))
            .await?
            .take(0)?;
        let image_map: HashMap<String, String> =
            images.into_iter().map(|r| (r.id, r.image)).collect();

        for order in orders.iter_mut() {
            order.user_info = user_map.get(&order.user).cloned();
            for line in order.items.iter_mut() {
                line.image = image_map.get(&line.menu_item).cloned();
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Deserialize)]
struct SumRow {
    total: f64,
}

fn first_count(rows: Vec<CountRow>) -> i64 {
    rows.into_iter().next().map(|r| r.count).unwrap_or(0)
}

fn first_sum(rows: Vec<SumRow>) -> f64 {
    rows.into_iter().next().map(|r| r.total).unwrap_or(0.0)
}
