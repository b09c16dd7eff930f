//! Customer Address Book
//!
//! Saved delivery addresses follow the delivery-zone hierarchy
//! (county > sub-county > location) plus free-text directions. Orders
//! never reference an address by id; they carry an [`AddressSnapshot`]
//! copied at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub county: String,
    pub sub_county: String,
    pub location: String,
    #[serde(default)]
    pub specific_address: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    /// Zone fee captured when the address was saved, in whole shillings.
    #[serde(default)]
    pub delivery_fee: i64,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Freeze this address for embedding into an order.
    pub fn snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            address_id: Some(self.id),
            county: self.county.clone(),
            sub_county: self.sub_county.clone(),
            location: self.location.clone(),
            specific_address: self.specific_address.clone(),
            phone: self.phone.clone(),
            notes: self.notes.clone(),
            delivery_fee: self.delivery_fee,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Address {
    const COLLECTION: &'static str = "addresses";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Denormalized copy of an address as it stood at checkout. Every field
/// is tolerant of absence: storefront clients send whatever the customer
/// filled in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSnapshot {
    #[serde(default)]
    pub address_id: Option<Uuid>,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub sub_county: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub specific_address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub delivery_fee: i64,
}

impl AddressSnapshot {
    /// Single line for emails and logs, skipping empty parts.
    pub fn display_line(&self) -> String {
        [
            self.specific_address.as_str(),
            self.location.as_str(),
            self.sub_county.as_str(),
            self.county.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}
