//! Menu Item Model
//!
//! Menu catalog entity with the special-offer pricing rules. The
//! discount computation lives here so both the create and update paths
//! derive the final price the same way.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    Beverages,
}

impl MenuCategory {
    /// Parse a category token, rejecting anything outside the enum
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snacks" => Ok(Self::Snacks),
            "beverages" => Ok(Self::Beverages),
            other => Err(AppError::with_message(
                ErrorCode::InvalidCategory,
                format!("'{}' is not a valid category", other),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snacks => "snacks",
            Self::Beverages => "beverages",
        }
    }
}

/// Badge shown on special items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialBadge {
    Hot,
    Limited,
    New,
    Bestseller,
    Combo,
}

impl SpecialBadge {
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "hot" => Ok(Self::Hot),
            "limited" => Ok(Self::Limited),
            "new" => Ok(Self::New),
            "bestseller" => Ok(Self::Bestseller),
            "combo" => Ok(Self::Combo),
            other => Err(AppError::with_message(
                ErrorCode::InvalidSpecialBadge,
                format!("'{}' is not a valid special badge", other),
            )),
        }
    }
}

/// Menu item entity
///
/// When `is_special` is set, `price` is always derived from
/// `original_price` and `discount_percentage`; when it is cleared, every
/// special-offer field is cleared with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub category: MenuCategory,
    pub price: f64,
    /// Stored image filename, e.g. `<uuid>.jpg`, served under
    /// `/api/image/`
    pub image: String,
    pub available: bool,

    // Special-offer fields
    #[serde(default)]
    pub is_special: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_badge: Option<SpecialBadge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_description: Option<String>,
    /// Offer validity end, Unix millis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<i64>,

    /// Unix millis
    pub created_at: i64,
    pub updated_at: i64,
}

impl MenuItem {
    /// Whether the item's special offer is currently active
    pub fn is_active_special(&self, now_millis: i64) -> bool {
        self.is_special && self.valid_until.is_none_or(|until| until >= now_millis)
    }
}

/// Create payload (fields arrive via multipart alongside the image file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub category: MenuCategory,
    /// Direct price for regular items; ignored when `is_special`
    pub price: Option<f64>,
    pub available: Option<bool>,
    #[serde(default)]
    pub is_special: bool,
    pub original_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub special_badge: Option<SpecialBadge>,
    pub special_description: Option<String>,
    pub valid_until: Option<i64>,
}

impl Default for MenuCategory {
    fn default() -> Self {
        Self::Snacks
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<MenuCategory>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub available: Option<bool>,
    pub is_special: Option<bool>,
    pub original_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub special_badge: Option<SpecialBadge>,
    pub special_description: Option<String>,
    pub valid_until: Option<i64>,
}

/// Compute the discounted price from the original price and percentage.
///
/// Rounds to the nearest whole unit: the currency has no subunits.
pub fn discounted_price(original_price: f64, discount_percentage: f64) -> f64 {
    (original_price - original_price * discount_percentage / 100.0).round()
}

/// Validate special-offer inputs and return the derived price.
///
/// `original_price` must be positive and `discount_percentage` within
/// the inclusive range [1, 100].
pub fn validate_special_offer(
    original_price: Option<f64>,
    discount_percentage: Option<f64>,
) -> AppResult<f64> {
    let (original, pct) = match (original_price, discount_percentage) {
        (Some(o), Some(p)) => (o, p),
        _ => {
            return Err(AppError::with_message(
                ErrorCode::InvalidSpecialOffer,
                "Special items require originalPrice and discountPercentage",
            ));
        }
    };

    if original <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidSpecialOffer,
            "originalPrice must be greater than 0",
        )
        .with_detail("originalPrice", original));
    }
    if !(1.0..=100.0).contains(&pct) {
        return Err(AppError::with_message(
            ErrorCode::InvalidSpecialOffer,
            "discountPercentage must be between 1 and 100",
        )
        .with_detail("discountPercentage", pct));
    }

    Ok(discounted_price(original, pct))
}
