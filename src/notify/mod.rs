//! Transactional customer notifications.
//!
//! Notices are built from order state, rendered to HTML and handed to
//! the configured [`Notifier`]. Delivery is fire-and-forget with
//! at-most-once semantics: a failed send leaves a warning in the log and
//! is never retried, and the triggering request never waits on the
//! transport.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::config::ShopIdentity;
use crate::domain::{AddressSnapshot, LineItem, Order, User};

mod smtp;
mod template;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport: {0}")]
    Transport(String),
    #[error("invalid recipient address: {0}")]
    Recipient(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError>;
}

/// Everything the email templates interpolate, captured when the
/// triggering request ran so the spawned send cannot race later edits.
#[derive(Clone, Debug)]
pub struct OrderNotice {
    pub customer_name: String,
    pub order_id: Uuid,
    pub items: Vec<LineItem>,
    pub subtotal_amount: i64,
    pub delivery_amount: i64,
    pub total_amount: i64,
    pub address: AddressSnapshot,
}

impl OrderNotice {
    pub fn for_order(user: &User, order: &Order) -> Self {
        Self {
            customer_name: user.user_name.clone(),
            order_id: order.id,
            items: order.cart_items.clone(),
            subtotal_amount: order.subtotal_amount,
            delivery_amount: order.delivery_amount,
            total_amount: order.total_amount,
            address: order.address_info.clone(),
        }
    }

    /// Short human-facing order reference.
    pub fn reference(&self) -> String {
        self.order_id.simple().to_string()[..8].to_uppercase()
    }
}

#[derive(Clone, Debug)]
pub enum Notification {
    OrderConfirmed(OrderNotice),
    OrderDispatched {
        notice: OrderNotice,
        estimated_delivery: String,
    },
    OrderDelivered(OrderNotice),
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OrderConfirmed(_) => "order_confirmed",
            Self::OrderDispatched { .. } => "order_dispatched",
            Self::OrderDelivered(_) => "order_delivered",
        }
    }

    pub fn notice(&self) -> &OrderNotice {
        match self {
            Self::OrderConfirmed(notice) | Self::OrderDelivered(notice) => notice,
            Self::OrderDispatched { notice, .. } => notice,
        }
    }

    pub fn subject(&self, shop: &ShopIdentity) -> String {
        match self {
            Self::OrderConfirmed(notice) => {
                format!("Order Confirmed! #{} - {}", notice.reference(), shop.name)
            }
            Self::OrderDispatched { notice, .. } => {
                format!("🚚 Your Order is On the Way! #{}", notice.reference())
            }
            Self::OrderDelivered(notice) => {
                format!("✅ Order #{} Delivered - Thank You!", notice.reference())
            }
        }
    }

    pub fn html_body(&self, shop: &ShopIdentity) -> String {
        match self {
            Self::OrderConfirmed(notice) => template::confirmed(shop, notice),
            Self::OrderDispatched {
                notice,
                estimated_delivery,
            } => template::dispatched(shop, notice, estimated_delivery),
            Self::OrderDelivered(notice) => template::delivered(shop, notice),
        }
    }
}

/// Used when SMTP is not configured: logs the skip and reports success
/// so callers keep their best-effort contract.
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> Result<(), NotifyError> {
        warn!(
            recipient = %to,
            kind = notification.kind(),
            "email credentials not configured, skipping notification"
        );
        Ok(())
    }
}

/// Detach the send from the calling request. Failures are logged and
/// dropped; there is no retry and no outbox.
pub fn send_detached(notifier: Arc<dyn Notifier>, to: String, notification: Notification) {
    tokio::spawn(async move {
        if let Err(err) = notifier.send(&to, &notification).await {
            warn!(
                recipient = %to,
                kind = notification.kind(),
                error = %err,
                "notification send failed"
            );
        }
    });
}
