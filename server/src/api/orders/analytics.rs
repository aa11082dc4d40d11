//! Order analytics bucketing
//!
//! Pure aggregation over a fetched order set. The store's aggregate
//! support stops at sums and counts, so the month/weekday/category
//! buckets are computed here after a single range query.

use std::collections::HashMap;

use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use shared::models::{MenuCategory, Order};

/// Number of trailing calendar months covered by the revenue series
pub const REVENUE_MONTHS: u32 = 6;

/// Number of items in the bestseller list
pub const TOP_ITEM_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// Calendar month, `YYYY-MM`
    pub month: String,
    pub revenue: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: MenuCategory,
    /// Number of orders containing at least one item of the category
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayCount {
    /// Weekday name, `Monday`..`Sunday`
    pub weekday: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub menu_item: String,
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub category_breakdown: Vec<CategoryCount>,
    pub weekday_orders: Vec<WeekdayCount>,
    pub top_items: Vec<TopItem>,
}

fn month_key(millis: i64, tz: Tz) -> String {
    match tz.timestamp_millis_opt(millis).earliest() {
        Some(dt) => format!("{:04}-{:02}", dt.year(), dt.month()),
        None => "unknown".to_string(),
    }
}

/// Revenue and order count per calendar month, oldest first
pub fn monthly_revenue(orders: &[Order], tz: Tz) -> Vec<MonthlyRevenue> {
    let mut buckets: HashMap<String, (f64, i64)> = HashMap::new();
    for order in orders {
        let entry = buckets.entry(month_key(order.created_at, tz)).or_default();
        entry.0 += order.total_amount;
        entry.1 += 1;
    }

    let mut months: Vec<MonthlyRevenue> = buckets
        .into_iter()
        .map(|(month, (revenue, orders))| MonthlyRevenue {
            month,
            revenue,
            orders,
        })
        .collect();
    months.sort_by(|a, b| a.month.cmp(&b.month));
    months
}

/// Order count per category, via the id-to-category map joined from
/// the current catalog. An order counts once per distinct category in
/// its lines; lines whose item has since been deleted are skipped.
pub fn category_breakdown(
    orders: &[Order],
    categories: &HashMap<String, MenuCategory>,
) -> Vec<CategoryCount> {
    let mut buckets: HashMap<MenuCategory, i64> = HashMap::new();
    for order in orders {
        let mut seen: Vec<MenuCategory> = Vec::new();
        for line in &order.items {
            if let Some(category) = categories.get(&line.menu_item) {
                if !seen.contains(category) {
                    seen.push(*category);
                    *buckets.entry(*category).or_default() += 1;
                }
            }
        }
    }

    let mut breakdown: Vec<CategoryCount> = buckets
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown
}

/// Order count per weekday for orders created at or after `since`
pub fn weekday_orders(orders: &[Order], since: i64, tz: Tz) -> Vec<WeekdayCount> {
    let mut buckets: HashMap<String, i64> = HashMap::new();
    for order in orders {
        if order.created_at < since {
            continue;
        }
        let weekday = tz
            .timestamp_millis_opt(order.created_at)
            .earliest()
            .map(|dt| dt.weekday().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        *buckets.entry(weekday_name(&weekday)).or_default() += 1;
    }

    // Stable Monday-to-Sunday order, zero-count days included
    [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
    .iter()
    .map(|day| WeekdayCount {
        weekday: day.to_string(),
        count: buckets.get(*day).copied().unwrap_or(0),
    })
    .collect()
}

fn weekday_name(short: &str) -> String {
    match short {
        "Mon" => "Monday",
        "Tue" => "Tuesday",
        "Wed" => "Wednesday",
        "Thu" => "Thursday",
        "Fri" => "Friday",
        "Sat" => "Saturday",
        "Sun" => "Sunday",
        other => other,
    }
    .to_string()
}

/// Bestsellers by cumulative quantity, with their revenue
pub fn top_items(orders: &[Order], limit: usize) -> Vec<TopItem> {
    let mut buckets: HashMap<String, (String, u64, f64)> = HashMap::new();
    for order in orders {
        for line in &order.items {
            let entry = buckets
                .entry(line.menu_item.clone())
                .or_insert_with(|| (line.name.clone(), 0, 0.0));
            entry.1 += line.quantity as u64;
            entry.2 += line.line_total();
        }
    }

    let mut items: Vec<TopItem> = buckets
        .into_iter()
        .map(|(menu_item, (name, quantity, revenue))| TopItem {
            menu_item,
            name,
            quantity,
            revenue,
        })
        .collect();
    items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    items.truncate(limit);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderLine, OrderStatus, PaymentMethod, PaymentStatus};

    fn order(created_at: i64, total: f64, lines: Vec<(&str, &str, f64, u32)>) -> Order {
        Order {
            id: None,
            user: "u1".into(),
            items: lines
                .into_iter()
                .map(|(id, name, price, quantity)| OrderLine {
                    menu_item: id.into(),
                    name: name.into(),
                    price,
                    quantity,
                    image: None,
                })
                .collect(),
            total_amount: total,
            status: OrderStatus::Delivered,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Cash,
            room_number: None,
            special_instructions: None,
            created_at,
            updated_at: created_at,
            user_info: None,
        }
    }

    const TZ: Tz = chrono_tz::Asia::Kolkata;

    // 2025-03-14 12:00 IST
    const MARCH: i64 = 1_741_933_800_000;
    // 2025-04-02 12:00 IST
    const APRIL: i64 = 1_743_575_400_000;

    #[test]
    fn monthly_revenue_buckets_by_calendar_month() {
        let orders = vec![
            order(MARCH, 100.0, vec![]),
            order(MARCH + 3_600_000, 50.0, vec![]),
            order(APRIL, 30.0, vec![]),
        ];
        let months = monthly_revenue(&orders, TZ);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2025-03");
        assert_eq!(months[0].revenue, 150.0);
        assert_eq!(months[0].orders, 2);
        assert_eq!(months[1].month, "2025-04");
        assert_eq!(months[1].revenue, 30.0);
    }

    #[test]
    fn category_breakdown_counts_orders_and_skips_deleted() {
        let orders = vec![
            // Two snack lines in one order still count it once
            order(
                MARCH,
                0.0,
                vec![
                    ("a", "Samosa", 10.0, 3),
                    ("c", "Pakora", 8.0, 1),
                    ("b", "Tea", 5.0, 2),
                    ("gone", "?", 1.0, 9),
                ],
            ),
            order(APRIL, 0.0, vec![("a", "Samosa", 10.0, 1)]),
        ];
        let mut categories = HashMap::new();
        categories.insert("a".to_string(), MenuCategory::Snacks);
        categories.insert("c".to_string(), MenuCategory::Snacks);
        categories.insert("b".to_string(), MenuCategory::Beverages);

        let breakdown = category_breakdown(&orders, &categories);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, MenuCategory::Snacks);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[1].category, MenuCategory::Beverages);
        assert_eq!(breakdown[1].count, 1);
    }

    #[test]
    fn weekday_orders_respects_cutoff_and_lists_all_days() {
        let orders = vec![order(MARCH, 0.0, vec![]), order(APRIL, 0.0, vec![])];
        let counts = weekday_orders(&orders, APRIL - 1000, TZ);
        assert_eq!(counts.len(), 7);
        let total: i64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 1); // only the April order passes the cutoff
        // 2025-04-02 is a Wednesday
        let wednesday = counts.iter().find(|c| c.weekday == "Wednesday").unwrap();
        assert_eq!(wednesday.count, 1);
    }

    #[test]
    fn top_items_sorted_by_quantity() {
        let orders = vec![
            order(MARCH, 0.0, vec![("a", "Samosa", 10.0, 3), ("b", "Tea", 5.0, 5)]),
            order(APRIL, 0.0, vec![("a", "Samosa", 10.0, 4)]),
        ];
        let top = top_items(&orders, 5);
        assert_eq!(top[0].name, "Samosa");
        assert_eq!(top[0].quantity, 7);
        assert_eq!(top[0].revenue, 70.0);
        assert_eq!(top[1].name, "Tea");
        assert_eq!(top[1].quantity, 5);

        let capped = top_items(&orders, 1);
        assert_eq!(capped.len(), 1);
    }
}
