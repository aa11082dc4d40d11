//! Unified error codes for the canteen ordering system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (phone/email or password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Admin registration limit reached
    AdminLimitReached = 2003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Unrecognized order status token
    InvalidOrderStatus = 4002,
    /// Status transition not permitted from current state
    InvalidStatusTransition = 4003,
    /// Order has no lines
    EmptyOrder = 4004,
    /// Line quantity below 1
    InvalidQuantity = 4005,
    /// Client-submitted total disagrees with server-computed total
    OrderTotalMismatch = 4006,
    /// Unrecognized payment method
    InvalidPaymentMethod = 4007,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is not available for ordering
    MenuItemUnavailable = 6002,
    /// Unrecognized menu category
    InvalidCategory = 6003,
    /// Special-offer fields incomplete or out of range
    InvalidSpecialOffer = 6004,
    /// Unrecognized special badge
    InvalidSpecialBadge = 6005,
    /// Image missing or not a supported format
    InvalidImage = 6006,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Phone number already registered
    PhoneExists = 8002,
    /// Email already registered
    EmailExists = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// File storage error
    StorageError = 9004,
}

impl ErrorCode {
    /// Get the default human-readable message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::AdminLimitReached => "Admin registration limit reached",

            Self::OrderNotFound => "Order not found",
            Self::InvalidOrderStatus => "Invalid status",
            Self::InvalidStatusTransition => "Status transition not permitted",
            Self::EmptyOrder => "Order must have at least one item",
            Self::InvalidQuantity => "Quantity must be at least 1",
            Self::OrderTotalMismatch => "Order total does not match item prices",
            Self::InvalidPaymentMethod => "Invalid payment method",

            Self::MenuItemNotFound => "Menu item not found",
            Self::MenuItemUnavailable => "Menu item is not available",
            Self::InvalidCategory => "Invalid category",
            Self::InvalidSpecialOffer => "Incomplete or invalid special offer",
            Self::InvalidSpecialBadge => "Invalid special badge",
            Self::InvalidImage => "Invalid or missing image",

            Self::UserNotFound => "User not found",
            Self::PhoneExists => "Phone number already registered",
            Self::EmailExists => "Email already registered",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::StorageError => "File storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when deserializing an unknown error code value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}
impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::AdminLimitReached),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidOrderStatus),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::EmptyOrder),
            4005 => Ok(ErrorCode::InvalidQuantity),
            4006 => Ok(ErrorCode::OrderTotalMismatch),
            4007 => Ok(ErrorCode::InvalidPaymentMethod),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),
            6003 => Ok(ErrorCode::InvalidCategory),
            6004 => Ok(ErrorCode::InvalidSpecialOffer),
            6005 => Ok(ErrorCode::InvalidSpecialBadge),
            6006 => Ok(ErrorCode::InvalidImage),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::PhoneExists),
            8003 => Ok(ErrorCode::EmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::AdminLimitReached,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::MenuItemUnavailable,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4099), Err(InvalidErrorCode(4099)));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(ErrorCode::ValidationFailed.to_string(), "E0002");
        assert_eq!(ErrorCode::OrderNotFound.to_string(), "E4001");
    }
}
