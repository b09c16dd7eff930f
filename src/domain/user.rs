//! Customer Account
//!
//! Only the fields this service reads: checkout verifies the account
//! exists and notifications need a name and an email address.
//! Registration and authentication live in a separate service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}
