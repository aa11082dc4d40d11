//! Domain models
//!
//! Persisted entity shapes and the request/response payloads shared
//! between the server and its clients. All wire names are camelCase to
//! match the admin dashboard and storefront conventions.

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::{
    MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate, SpecialBadge, discounted_price,
    validate_special_offer,
};
pub use order::{
    Order, OrderCreate, OrderLine, OrderLineInput, OrderStatus, OrderUser, PaymentMethod,
    PaymentStatus,
};
pub use user::{
    AdminLoginRequest, AdminSignupRequest, CallerInfo, LoginResponse, SignupRequest,
    UserLoginRequest, UserPublic,
};
