//! Order Aggregate
//!
//! An order is an immutable snapshot of what was bought, where it goes
//! and what it cost, plus a mutable lifecycle driven from the back
//! office. Historic wire spellings (`inProcess`, `inShipping`) are kept
//! so stored documents and older clients keep working.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::address::AddressSnapshot;
use crate::store::Document;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    PendingVerification,
    Confirmed,
    Processing,
    #[serde(rename = "inProcess")]
    InProcess,
    Shipped,
    #[serde(rename = "inShipping")]
    InShipping,
    Delivered,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PendingVerification => "pending_verification",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::InProcess => "inProcess",
            Self::Shipped => "shipped",
            Self::InShipping => "inShipping",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }

    /// Both spellings of the picking/packing stage.
    pub fn is_processing_stage(self) -> bool {
        matches!(self, Self::Processing | Self::InProcess)
    }

    /// Both spellings of the on-the-road stage.
    pub fn is_shipping_stage(self) -> bool {
        matches!(self, Self::Shipped | Self::InShipping)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// Checkout amounts overflowed the shilling representation.
#[derive(Debug, Error)]
#[error("Order amounts are too large")]
pub struct AmountOverflow;

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => Self::Pending,
            "pending_verification" => Self::PendingVerification,
            "confirmed" => Self::Confirmed,
            "processing" => Self::Processing,
            "inProcess" => Self::InProcess,
            "shipped" => Self::Shipped,
            "inShipping" => Self::InShipping,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "rejected" => Self::Rejected,
            other => return Err(UnknownStatus(other.to_owned())),
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    AwaitingVerification,
    Paid,
    Failed,
}

/// The shop takes payment on the doorstep only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
}

/// One purchased line, denormalized at checkout so later catalog edits
/// cannot rewrite history.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub price: i64,
    pub quantity: u32,
}

impl LineItem {
    /// `None` when the multiplication leaves `i64`.
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Originating cart; cleared once the cart has been consumed.
    #[serde(default)]
    pub cart_id: Option<Uuid>,
    pub cart_items: Vec<LineItem>,
    #[serde(default)]
    pub address_info: AddressSnapshot,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub subtotal_amount: i64,
    pub delivery_amount: i64,
    pub total_amount: i64,
    /// Set once the processing-stage stock decrement has run, so a
    /// repeated transition into that stage cannot decrement twice.
    #[serde(default)]
    pub stock_applied: bool,
    #[serde(default)]
    pub payment_verification_note: Option<String>,
    #[serde(default)]
    pub payment_verified_at: Option<DateTime<Utc>>,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
    #[serde(default)]
    pub actual_delivery_date: Option<DateTime<Utc>>,
}

impl Order {
    /// Materialize a checkout. Totals are derived from the line snapshot
    /// here, so `total == subtotal + delivery` holds from the first write;
    /// line values are client-supplied, so the sums are checked.
    pub fn place(
        user_id: Uuid,
        cart_id: Option<Uuid>,
        items: Vec<LineItem>,
        address: AddressSnapshot,
        delivery_fee: i64,
    ) -> Result<Self, AmountOverflow> {
        let now = Utc::now();
        let subtotal = items
            .iter()
            .try_fold(0i64, |acc, item| {
                item.line_total().and_then(|line| acc.checked_add(line))
            })
            .ok_or(AmountOverflow)?;
        let total = subtotal.checked_add(delivery_fee).ok_or(AmountOverflow)?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            cart_id,
            cart_items: items,
            address_info: address,
            order_status: OrderStatus::Confirmed,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_status: PaymentStatus::Pending,
            subtotal_amount: subtotal,
            delivery_amount: delivery_fee,
            total_amount: total,
            stock_applied: false,
            payment_verification_note: None,
            payment_verified_at: None,
            order_date: now,
            order_update_date: now,
            actual_delivery_date: None,
        })
    }

    /// Apply a lifecycle change. Delivery settles the cash payment and
    /// stamps the actual delivery time in the same mutation.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.order_status = status;
        if status == OrderStatus::Delivered {
            self.payment_status = PaymentStatus::Paid;
            self.actual_delivery_date = Some(Utc::now());
        }
        self.touch();
    }

    /// True when moving from `previous` into the processing stage still
    /// owes the stock/cart side effects.
    pub fn needs_stock_pick(&self, previous: OrderStatus, next: OrderStatus) -> bool {
        next.is_processing_stage() && !previous.is_processing_stage() && !self.stock_applied
    }

    /// Admin rejection of a cash order; the reason lands in the
    /// verification note for the customer-facing order history.
    pub fn reject_payment(&mut self, reason: Option<String>) {
        let note = reason
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "Order cancelled by admin".to_owned());
        self.payment_verification_note = Some(note);
        self.set_status(OrderStatus::Cancelled);
    }

    fn touch(&mut self) {
        self.order_update_date = Utc::now();
    }
}

impl Document for Order {
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn two_line_order() -> Order {
        let items = vec![
            LineItem {
                product_id: Uuid::new_v4(),
                title: "Building Blocks".into(),
                image: None,
                price: 500,
                quantity: 2,
            },
            LineItem {
                product_id: Uuid::new_v4(),
                title: "Plush Lion".into(),
                image: None,
                price: 1200,
                quantity: 1,
            },
        ];
        Order::place(Uuid::new_v4(), Some(Uuid::new_v4()), items, AddressSnapshot::default(), 150)
            .unwrap()
    }

    #[test]
    fn test_totals_derived_from_lines() {
        let order = two_line_order();
        assert_eq!(order.subtotal_amount, 2200);
        assert_eq!(order.delivery_amount, 150);
        assert_eq!(order.total_amount, 2350);
        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_place_refuses_overflowing_amounts() {
        let item = LineItem {
            product_id: Uuid::new_v4(),
            title: "Plush Lion".into(),
            image: None,
            price: i64::MAX,
            quantity: 2,
        };
        assert!(item.line_total().is_none());
        assert!(
            Order::place(Uuid::new_v4(), None, vec![item.clone()], AddressSnapshot::default(), 0)
                .is_err()
        );

        // a single line can fit while the delivery fee tips the total over
        let item = LineItem { quantity: 1, ..item };
        assert!(
            Order::place(Uuid::new_v4(), None, vec![item], AddressSnapshot::default(), 150)
                .is_err()
        );
    }

    #[test]
    fn test_delivered_settles_cash_payment() {
        let mut order = two_line_order();
        order.set_status(OrderStatus::Delivered);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert!(order.actual_delivery_date.is_some());
    }

    #[test]
    fn test_stock_pick_needed_once() {
        let mut order = two_line_order();
        assert!(order.needs_stock_pick(OrderStatus::Confirmed, OrderStatus::InProcess));
        assert!(order.needs_stock_pick(OrderStatus::Confirmed, OrderStatus::Processing));
        // already inside the stage
        assert!(!order.needs_stock_pick(OrderStatus::Processing, OrderStatus::InProcess));
        order.stock_applied = true;
        assert!(!order.needs_stock_pick(OrderStatus::Shipped, OrderStatus::Processing));
    }

    #[test]
    fn test_reject_defaults_the_note() {
        let mut order = two_line_order();
        order.reject_payment(Some("  ".into()));
        assert_eq!(
            order.payment_verification_note.as_deref(),
            Some("Order cancelled by admin")
        );
        assert_eq!(order.order_status, OrderStatus::Cancelled);

        let mut order = two_line_order();
        order.reject_payment(Some("Unreachable phone".into()));
        assert_eq!(
            order.payment_verification_note.as_deref(),
            Some("Unreachable phone")
        );
    }

    #[test]
    fn test_status_wire_spellings() {
        assert_eq!(serde_json::to_value(OrderStatus::InProcess).unwrap(), json!("inProcess"));
        assert_eq!(serde_json::to_value(OrderStatus::InShipping).unwrap(), json!("inShipping"));
        assert_eq!(
            serde_json::to_value(OrderStatus::PendingVerification).unwrap(),
            json!("pending_verification")
        );
        assert_eq!("inProcess".parse::<OrderStatus>().unwrap(), OrderStatus::InProcess);
        assert!("packed".parse::<OrderStatus>().is_err());
    }
}
