//! Order lifecycle: checkout materialization and the admin-driven status
//! transitions with their stock, cart and notification side effects.
//!
//! The order write is the primary effect and the only one that can fail
//! a request. Stock decrements, cart clearing and emails are best-effort:
//! they log their own failures and never surface to the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{AddressSnapshot, Cart, LineItem, Order, OrderStatus, Product, User};
use crate::error::{ApiError, ApiResult};
use crate::notify::{self, Notification, Notifier, OrderNotice};
use crate::store::{DocumentStore, DocumentStoreExt};

/// ETA line interpolated into dispatch notices. Deliveries are same-day
/// or next-day within the covered counties.
const DISPATCH_ETA: &str = "Today or Tomorrow";

/// Checkout payload after HTTP-level validation.
#[derive(Debug)]
pub struct PlaceOrder {
    pub user_id: Uuid,
    pub cart_id: Option<Uuid>,
    pub items: Vec<LineItem>,
    pub address: AddressSnapshot,
    pub delivery_fee: Option<i64>,
}

#[derive(Clone)]
pub struct OrderWorkflow {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Place a cash-on-delivery order. Amounts are recomputed from the
    /// line snapshot; client-supplied totals are ignored.
    pub async fn place(&self, request: PlaceOrder) -> ApiResult<Order> {
        if request.items.is_empty() {
            return Err(ApiError::invalid("Missing required order fields"));
        }
        if request
            .items
            .iter()
            .any(|item| item.price < 0 || item.quantity == 0)
        {
            return Err(ApiError::invalid("Order items need a valid price and quantity"));
        }
        let user: User = self
            .store
            .load(request.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let fee = request.delivery_fee.unwrap_or(request.address.delivery_fee);
        let order = Order::place(
            request.user_id,
            request.cart_id,
            request.items,
            request.address,
            fee,
        )
        .map_err(|err| ApiError::invalid(err.to_string()))?;
        self.store.save(&order).await?;
        info!(order_id = %order.id, total = order.total_amount, "cash order created");

        notify::send_detached(
            self.notifier.clone(),
            user.email.clone(),
            Notification::OrderConfirmed(OrderNotice::for_order(&user, &order)),
        );
        Ok(order)
    }

    /// Admin status transition. Entering the processing stage runs the
    /// one-time stock pick and cart clear; entering the shipping stage or
    /// delivered sends the matching customer email. The status write
    /// succeeds regardless of how the side effects fare.
    pub async fn update_status(&self, order_id: Uuid, target: &str) -> ApiResult<Order> {
        let target: OrderStatus = target
            .parse()
            .map_err(|err: crate::domain::order::UnknownStatus| ApiError::invalid(err.to_string()))?;

        let mut order: Order = self
            .store
            .load(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order not found"))?;

        let previous = order.order_status;
        order.set_status(target);

        if order.needs_stock_pick(previous, target) {
            self.apply_stock_pick(&mut order).await;
        }

        self.store.save(&order).await?;
        info!(order_id = %order.id, from = %previous, to = %target, "order status updated");

        if target.is_shipping_stage() || target == OrderStatus::Delivered {
            self.notify_customer(&order, target).await;
        }
        Ok(order)
    }

    /// Cancel a cash order from the back office, keeping the reason on
    /// the order for the customer-facing history.
    pub async fn reject(&self, order_id: Uuid, reason: Option<String>) -> ApiResult<Order> {
        let mut order: Order = self
            .store
            .load(order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order not found"))?;
        order.reject_payment(reason);
        self.store.save(&order).await?;
        info!(order_id = %order.id, "order cancelled by admin");
        Ok(order)
    }

    /// Walk the snapshot lines against the live catalog. Covered lines
    /// are decremented and saved one by one; short or vanished lines are
    /// skipped. The originating cart is deleted and unlinked so a later
    /// transition cannot consume it again.
    async fn apply_stock_pick(&self, order: &mut Order) {
        for item in &order.cart_items {
            match self.store.load::<Product>(item.product_id).await {
                Ok(Some(mut product)) => {
                    if product.pick(item.quantity) {
                        match self.store.save(&product).await {
                            Ok(()) => debug!(
                                product_id = %product.id,
                                by = item.quantity,
                                left = product.total_stock,
                                "stock decremented"
                            ),
                            Err(err) => warn!(
                                product_id = %product.id,
                                error = %err,
                                "stock decrement not persisted"
                            ),
                        }
                    } else {
                        info!(
                            product_id = %product.id,
                            requested = item.quantity,
                            in_stock = product.total_stock,
                            "insufficient stock, line skipped"
                        );
                    }
                }
                Ok(None) => info!(product_id = %item.product_id, "product gone, line skipped"),
                Err(err) => warn!(product_id = %item.product_id, error = %err, "product lookup failed, line skipped"),
            }
        }

        if let Some(cart_id) = order.cart_id.take() {
            if let Err(err) = self.store.remove::<Cart>(cart_id).await {
                warn!(cart_id = %cart_id, error = %err, "cart clear failed");
            }
        }
        order.stock_applied = true;
    }

    /// Customer email for a shipping-stage or delivered transition. A
    /// missing user only means nobody to mail.
    async fn notify_customer(&self, order: &Order, target: OrderStatus) {
        let user = match self.store.load::<User>(order.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(order_id = %order.id, "order user missing, skipping notification");
                return;
            }
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "user lookup failed, skipping notification");
                return;
            }
        };

        let notice = OrderNotice::for_order(&user, order);
        let notification = if target == OrderStatus::Delivered {
            Notification::OrderDelivered(notice)
        } else {
            Notification::OrderDispatched {
                notice,
                estimated_delivery: DISPATCH_ETA.to_owned(),
            }
        };
        notify::send_detached(self.notifier.clone(), user.email, notification);
    }
}
