//! Domain Model
//!
//! Persisted entities and the pure rules that operate on them. Monetary
//! amounts are whole Kenyan shillings carried as `i64`; wire names are
//! camelCase to match the storefront client.

pub mod address;
pub mod cart;
pub mod order;
pub mod product;
pub mod user;
pub mod zone;

pub use address::{Address, AddressSnapshot};
pub use cart::{Cart, CartItem};
pub use order::{LineItem, Order, OrderStatus, PaymentMethod, PaymentStatus};
pub use product::{Product, Variation};
pub use user::User;
pub use zone::{DeliveryZone, SubCounty, ZoneError, ZoneLocation};
