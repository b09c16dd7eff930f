//! HTML bodies for the three order emails. Plain string assembly with
//! table layout; email clients get nothing fancier.

use crate::config::ShopIdentity;

use super::OrderNotice;

pub(super) fn confirmed(shop: &ShopIdentity, notice: &OrderNotice) -> String {
    let body = format!(
        "<p>Hi <strong>{name}</strong>,</p>\
         <p>Thank you for your order! We have received it and will call you shortly \
         to confirm the delivery details. You pay in cash when your order arrives.</p>\
         {items}{totals}{address}",
        name = notice.customer_name,
        items = items_table(notice),
        totals = totals_table(notice),
        address = address_block(notice),
    );
    layout(shop, "Order Confirmed", &format!("Order #{}", notice.reference()), &body)
}

pub(super) fn dispatched(shop: &ShopIdentity, notice: &OrderNotice, eta: &str) -> String {
    let body = format!(
        "<p>Hi <strong>{name}</strong>,</p>\
         <p>Great news! Your order has left our store and is on its way to you.</p>\
         <p><strong>Estimated delivery:</strong> {eta}</p>\
         <p>Please keep <strong>{total}</strong> ready in cash for the rider.</p>\
         {items}{address}",
        name = notice.customer_name,
        total = ksh(notice.total_amount),
        items = items_table(notice),
        address = address_block(notice),
    );
    layout(shop, "On the Way", &format!("Order #{}", notice.reference()), &body)
}

pub(super) fn delivered(shop: &ShopIdentity, notice: &OrderNotice) -> String {
    let body = format!(
        "<p>Hi <strong>{name}</strong>,</p>\
         <p>Your order has been delivered and your payment of \
         <strong>{total}</strong> is confirmed. Thank you for shopping with \
         {shop_name}!</p>\
         <p>We would love to hear what the little ones think. Karibu tena!</p>",
        name = notice.customer_name,
        total = ksh(notice.total_amount),
        shop_name = shop.name,
    );
    layout(shop, "Delivered", &format!("Order #{}", notice.reference()), &body)
}

fn layout(shop: &ShopIdentity, badge: &str, heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"margin:0;background:#f6f6f6;\
         font-family:Arial,Helvetica,sans-serif;color:#333;\">\
         <div style=\"max-width:600px;margin:0 auto;background:#ffffff;\">\
         <div style=\"background:#0f766e;color:#ffffff;padding:24px;text-align:center;\">\
         <div style=\"font-size:12px;letter-spacing:2px;text-transform:uppercase;\">{badge}</div>\
         <h1 style=\"margin:8px 0 0;font-size:22px;\">{heading}</h1></div>\
         <div style=\"padding:24px;\">{body}</div>\
         <div style=\"background:#f0f0f0;padding:16px 24px;font-size:12px;color:#666;\">\
         <p style=\"margin:0 0 4px;\"><strong>{shop_name}</strong> · {location}</p>\
         <p style=\"margin:0;\">Call {phone} · WhatsApp {whatsapp} · {email}</p>\
         </div></div></body></html>",
        badge = badge,
        heading = heading,
        body = body,
        shop_name = shop.name,
        location = shop.location,
        phone = shop.phone,
        whatsapp = shop.whatsapp,
        email = shop.email,
    )
}

fn items_table(notice: &OrderNotice) -> String {
    let rows: String = notice
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td style=\"padding:6px 0;border-bottom:1px solid #eee;\">{title} × {qty}</td>\
                 <td style=\"padding:6px 0;border-bottom:1px solid #eee;text-align:right;\">{total}</td></tr>",
                title = item.title,
                qty = item.quantity,
                total = ksh(item.line_total().unwrap_or_default()),
            )
        })
        .collect();
    format!(
        "<table style=\"width:100%;border-collapse:collapse;margin:16px 0;font-size:14px;\">{rows}</table>"
    )
}

fn totals_table(notice: &OrderNotice) -> String {
    let delivery = if notice.delivery_amount == 0 {
        "FREE".to_owned()
    } else {
        ksh(notice.delivery_amount)
    };
    format!(
        "<table style=\"width:100%;font-size:14px;\">\
         <tr><td>Subtotal</td><td style=\"text-align:right;\">{subtotal}</td></tr>\
         <tr><td>Delivery</td><td style=\"text-align:right;\">{delivery}</td></tr>\
         <tr><td style=\"font-weight:bold;padding-top:6px;\">Total (pay on delivery)</td>\
         <td style=\"font-weight:bold;text-align:right;padding-top:6px;\">{total}</td></tr>\
         </table>",
        subtotal = ksh(notice.subtotal_amount),
        delivery = delivery,
        total = ksh(notice.total_amount),
    )
}

fn address_block(notice: &OrderNotice) -> String {
    let line = notice.address.display_line();
    if line.is_empty() {
        return String::new();
    }
    format!(
        "<p style=\"font-size:14px;\"><strong>Delivering to:</strong><br>{line}<br>Phone: {phone}</p>",
        line = line,
        phone = notice.address.phone,
    )
}

fn ksh(amount: i64) -> String {
    format!("KSh {amount}")
}
