//! Order API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MenuCategory, Order, OrderCreate, OrderStatus};

use super::analytics::{self, AnalyticsResponse, REVENUE_MONTHS, TOP_ITEM_COUNT};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{MenuFilter, MenuItemRepository, OrderFilter, OrderRepository};
use crate::utils::time;

/// POST /api/orders - place an order (any authenticated user)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .create(&user.id, payload)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;

    tracing::info!(
        order_id = order.id.as_deref().unwrap_or(""),
        user_id = %user.id,
        total = order.total_amount,
        "Order placed"
    );
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    /// Only `today` is recognized
    pub date: Option<String>,
}

/// GET /api/orders - list all orders (admin)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let status = match &query.status {
        Some(raw) => Some(OrderStatus::parse(raw)?),
        None => None,
    };
    let created_between = match query.date.as_deref() {
        Some("today") => Some(time::today_range(state.config.timezone)),
        Some(other) => {
            return Err(AppError::validation(format!(
                "Unsupported date filter '{}'",
                other
            )));
        }
        None => None,
    };

    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find(&OrderFilter {
            status,
            user: None,
            created_between,
        })
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;
    Ok(Json(orders))
}

/// GET /api/orders/recent - the caller's latest 5 non-cancelled orders
///
/// Admins see the global feed; everyone else sees only their own, so
/// no caller can browse other users' names, phones or room numbers.
pub async fn recent(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let scope = (!user.is_admin()).then_some(user.id.as_str());
    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find_recent(scope, 5)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;
    Ok(Json(orders))
}

/// GET /api/orders/user/:user_id - a user's order history
///
/// Callers may only read their own history; admins may read anyone's.
pub async fn list_for_user(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    if !user.can_access(&user_id) {
        return Err(AppError::forbidden("You may only view your own orders"));
    }

    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find(&OrderFilter {
            status: None,
            user: Some(user_id),
            created_between: None,
        })
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - single order (owner or admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
        })?;

    if !user.can_access(&order.user) {
        return Err(AppError::forbidden("You may only view your own orders"));
    }
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: String,
}

/// PATCH /api/orders/:id/status - advance the order status (admin)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Order>> {
    let next = OrderStatus::parse(&payload.status)?;

    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .update_status(&id, next)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;

    tracing::info!(order_id = %id, status = next.as_str(), "Order status updated");
    Ok(Json(order))
}

#[derive(Debug, Serialize)]
pub struct TodayCountResponse {
    pub count: i64,
}

/// GET /api/orders/today-count - orders placed today (admin)
pub async fn today_count(State(state): State<ServerState>) -> AppResult<Json<TodayCountResponse>> {
    let (from, to) = time::today_range(state.config.timezone);
    let repo = OrderRepository::new(state.get_db());
    let count = repo
        .count_between(from, to)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;
    Ok(Json(TodayCountResponse { count }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_orders: i64,
    pub today_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub total_menu_items: i64,
}

/// GET /api/orders/stats - dashboard counters (admin)
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<StatsResponse>> {
    let order_repo = OrderRepository::new(state.get_db());
    let menu_repo = MenuItemRepository::new(state.get_db());

    let stats = order_repo
        .stats(time::today_range(state.config.timezone))
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;
    let total_menu_items = menu_repo
        .count()
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;

    Ok(Json(StatsResponse {
        total_orders: stats.total_orders,
        today_orders: stats.today_orders,
        pending_orders: stats.pending_orders,
        total_revenue: stats.total_revenue,
        today_revenue: stats.today_revenue,
        total_menu_items,
    }))
}

/// GET /api/orders/analytics - aggregated order analytics (admin)
///
/// One range query over the trailing six months, bucketed in memory.
pub async fn analytics(State(state): State<ServerState>) -> AppResult<Json<AnalyticsResponse>> {
    let tz = state.config.timezone;
    let order_repo = OrderRepository::new(state.get_db());
    let menu_repo = MenuItemRepository::new(state.get_db());

    let since = time::month_start_millis_back(REVENUE_MONTHS - 1, tz);
    let orders = order_repo
        .find_non_cancelled_since(since)
        .await
        .map_err(|e| e.into_app(ErrorCode::OrderNotFound))?;

    let catalog = menu_repo
        .find_all(&MenuFilter::default())
        .await
        .map_err(|e| e.into_app(ErrorCode::MenuItemNotFound))?;
    let categories: HashMap<String, MenuCategory> = catalog
        .into_iter()
        .filter_map(|item| item.id.map(|id| (id, item.category)))
        .collect();

    let week_start = time::day_start_millis(
        time::today(tz) - chrono::Duration::days(6),
        tz,
    );

    Ok(Json(AnalyticsResponse {
        monthly_revenue: analytics::monthly_revenue(&orders, tz),
        category_breakdown: analytics::category_breakdown(&orders, &categories),
        weekday_orders: analytics::weekday_orders(&orders, week_start, tz),
        top_items: analytics::top_items(&orders, TOP_ITEM_COUNT),
    }))
}
