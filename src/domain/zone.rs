//! Delivery Zone Directory
//!
//! One document per county, embedding the whole sub-county > location
//! tree. Delivery fees hang off leaf locations. Sibling names are unique
//! within their parent; lookups inside the tree are by embedded id so
//! renames cannot orphan anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::Document;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZoneError {
    #[error("Sub-county already exists in this county")]
    DuplicateSubCounty,
    #[error("Location already exists in this sub-county")]
    DuplicateLocation,
    #[error("Sub-county not found")]
    SubCountyNotFound,
    #[error("Location not found")]
    LocationNotFound,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLocation {
    pub id: Uuid,
    pub name: String,
    pub delivery_fee: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCounty {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub locations: Vec<ZoneLocation>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: Uuid,
    pub county: String,
    /// Inactive counties stay editable in the back office but disappear
    /// from the storefront directory.
    pub is_active: bool,
    #[serde(default)]
    pub sub_counties: Vec<SubCounty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeliveryZone {
    pub fn new(county: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            county: county.into(),
            is_active: true,
            sub_counties: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, county: &str) {
        self.county = county.trim().to_owned();
        self.touch();
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.touch();
    }

    pub fn sub_county(&self, sub_county_id: Uuid) -> Option<&SubCounty> {
        self.sub_counties.iter().find(|sc| sc.id == sub_county_id)
    }

    pub fn add_sub_county(&mut self, name: &str) -> Result<Uuid, ZoneError> {
        let name = name.trim();
        if self.sub_counties.iter().any(|sc| sc.name == name) {
            return Err(ZoneError::DuplicateSubCounty);
        }
        let id = Uuid::new_v4();
        self.sub_counties.push(SubCounty {
            id,
            name: name.to_owned(),
            locations: Vec::new(),
        });
        self.touch();
        Ok(id)
    }

    pub fn rename_sub_county(&mut self, sub_county_id: Uuid, name: &str) -> Result<(), ZoneError> {
        let sc = self
            .sub_counties
            .iter_mut()
            .find(|sc| sc.id == sub_county_id)
            .ok_or(ZoneError::SubCountyNotFound)?;
        sc.name = name.trim().to_owned();
        self.touch();
        Ok(())
    }

    /// Removing a sub-county takes its locations with it. Unknown ids are
    /// a silent no-op.
    pub fn remove_sub_county(&mut self, sub_county_id: Uuid) {
        self.sub_counties.retain(|sc| sc.id != sub_county_id);
        self.touch();
    }

    pub fn add_location(
        &mut self,
        sub_county_id: Uuid,
        name: &str,
        delivery_fee: i64,
    ) -> Result<Uuid, ZoneError> {
        let name = name.trim();
        let sc = self
            .sub_counties
            .iter_mut()
            .find(|sc| sc.id == sub_county_id)
            .ok_or(ZoneError::SubCountyNotFound)?;
        if sc.locations.iter().any(|loc| loc.name == name) {
            return Err(ZoneError::DuplicateLocation);
        }
        let id = Uuid::new_v4();
        sc.locations.push(ZoneLocation {
            id,
            name: name.to_owned(),
            delivery_fee,
        });
        self.touch();
        Ok(id)
    }

    pub fn update_location(
        &mut self,
        sub_county_id: Uuid,
        location_id: Uuid,
        name: Option<&str>,
        delivery_fee: Option<i64>,
    ) -> Result<(), ZoneError> {
        let sc = self
            .sub_counties
            .iter_mut()
            .find(|sc| sc.id == sub_county_id)
            .ok_or(ZoneError::SubCountyNotFound)?;
        let loc = sc
            .locations
            .iter_mut()
            .find(|loc| loc.id == location_id)
            .ok_or(ZoneError::LocationNotFound)?;
        if let Some(name) = name {
            loc.name = name.trim().to_owned();
        }
        if let Some(fee) = delivery_fee {
            loc.delivery_fee = fee;
        }
        self.touch();
        Ok(())
    }

    /// The sub-county must exist; a missing location is a silent no-op.
    pub fn remove_location(&mut self, sub_county_id: Uuid, location_id: Uuid) -> Result<(), ZoneError> {
        let sc = self
            .sub_counties
            .iter_mut()
            .find(|sc| sc.id == sub_county_id)
            .ok_or(ZoneError::SubCountyNotFound)?;
        sc.locations.retain(|loc| loc.id != location_id);
        self.touch();
        Ok(())
    }

    /// Fee for a named sub-county/location pair, if the leaf exists.
    pub fn fee_for(&self, sub_county: &str, location: &str) -> Option<i64> {
        self.sub_counties
            .iter()
            .find(|sc| sc.name == sub_county)?
            .locations
            .iter()
            .find(|loc| loc.name == location)
            .map(|loc| loc.delivery_fee)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for DeliveryZone {
    const COLLECTION: &'static str = "delivery_zones";

    fn id(&self) -> Uuid {
        self.id
    }
}
