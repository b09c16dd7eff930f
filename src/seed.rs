//! Built-in delivery-zone dataset and the provisioning pass that loads
//! it. The data mirrors the storefront's hardcoded directory; seeding is
//! idempotent per county so the endpoint can be hit again after new
//! counties are added to the table.

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{DeliveryZone, SubCounty, ZoneLocation};
use crate::store::{DocumentStore, DocumentStoreExt, StoreResult};

pub struct SeedLocation {
    pub name: &'static str,
    pub fee: i64,
}

pub struct SeedSubCounty {
    pub name: &'static str,
    pub locations: &'static [SeedLocation],
}

pub struct SeedCounty {
    pub name: &'static str,
    pub sub_counties: &'static [SeedSubCounty],
}

const fn loc(name: &'static str, fee: i64) -> SeedLocation {
    SeedLocation { name, fee }
}

pub const KENYA_ZONES: &[SeedCounty] = &[
    SeedCounty {
        name: "Nairobi",
        sub_counties: &[
            SeedSubCounty {
                name: "Westlands",
                locations: &[
                    loc("Westlands", 150),
                    loc("Parklands", 150),
                    loc("Highridge", 180),
                    loc("Karura", 200),
                ],
            },
            SeedSubCounty {
                name: "Dagoretti North",
                locations: &[
                    loc("Kilimani", 120),
                    loc("Kawangware", 180),
                    loc("Gatina", 200),
                    loc("Kileleshwa", 150),
                ],
            },
            SeedSubCounty {
                name: "Langata",
                locations: &[
                    loc("Karen", 200),
                    loc("Nairobi West", 150),
                    loc("South C", 150),
                ],
            },
            SeedSubCounty {
                name: "Starehe",
                locations: &[
                    loc("Nairobi Central (CBD)", 0),
                    loc("Ngara", 120),
                    loc("Nairobi South", 110),
                ],
            },
            SeedSubCounty {
                name: "Roysambu",
                locations: &[
                    loc("Githurai", 200),
                    loc("Kahawa West", 220),
                    loc("Zimmerman", 180),
                    loc("Roysambu", 190),
                ],
            },
            SeedSubCounty {
                name: "Kasarani",
                locations: &[
                    loc("Kasarani", 170),
                    loc("Mwiki", 180),
                    loc("Njiru", 220),
                ],
            },
        ],
    },
    SeedCounty {
        name: "Kiambu",
        sub_counties: &[
            SeedSubCounty {
                name: "Thika Town",
                locations: &[loc("Township", 300), loc("Gatuanyaga", 350)],
            },
            SeedSubCounty {
                name: "Ruiru",
                locations: &[
                    loc("Biashara", 250),
                    loc("Kahawa Sukari", 230),
                    loc("Kahawa Wendani", 240),
                ],
            },
            SeedSubCounty {
                name: "Juja",
                locations: &[loc("Juja", 270), loc("Witeithie", 300)],
            },
        ],
    },
    SeedCounty {
        name: "Kajiado",
        sub_counties: &[
            SeedSubCounty {
                name: "Kajiado North",
                locations: &[loc("Rongai", 200), loc("Ngong", 220)],
            },
            SeedSubCounty {
                name: "Kajiado East",
                locations: &[loc("Kitengela", 250)],
            },
        ],
    },
    SeedCounty {
        name: "Machakos",
        sub_counties: &[SeedSubCounty {
            name: "Athi River",
            locations: &[loc("Athi River", 300), loc("Syokimau/Mulolongo", 280)],
        }],
    },
    SeedCounty {
        name: "Mombasa",
        sub_counties: &[SeedSubCounty {
            name: "Mvita",
            locations: &[loc("Mji Wa Kale/Makadara", 300), loc("Tudor", 320)],
        }],
    },
];

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

impl SeedReport {
    pub fn summary(&self) -> String {
        format!(
            "Seeded {} counties. {} already existed.",
            self.created, self.skipped
        )
    }
}

/// Insert every built-in county that is not already present. Existing
/// counties are left exactly as the back office has edited them.
pub async fn seed_delivery_zones(store: &dyn DocumentStore) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();
    for county in KENYA_ZONES {
        let existing: Vec<DeliveryZone> = store.find_by("county", county.name).await?;
        if !existing.is_empty() {
            report.skipped += 1;
            continue;
        }
        store.save(&build_zone(county)).await?;
        report.created += 1;
    }
    info!(created = report.created, skipped = report.skipped, "delivery zone seed finished");
    Ok(report)
}

fn build_zone(county: &SeedCounty) -> DeliveryZone {
    let now = Utc::now();
    DeliveryZone {
        id: Uuid::new_v4(),
        county: county.name.to_owned(),
        is_active: true,
        sub_counties: county
            .sub_counties
            .iter()
            .map(|sc| SubCounty {
                id: Uuid::new_v4(),
                name: sc.name.to_owned(),
                locations: sc
                    .locations
                    .iter()
                    .map(|l| ZoneLocation {
                        id: Uuid::new_v4(),
                        name: l.name.to_owned(),
                        delivery_fee: l.fee,
                    })
                    .collect(),
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use crate::store::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent_per_county() {
        let store = MemoryStore::new();

        let first = seed_delivery_zones(&store).await.unwrap();
        assert_eq!(first.created, KENYA_ZONES.len());
        assert_eq!(first.skipped, 0);

        let second = seed_delivery_zones(&store).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.skipped, KENYA_ZONES.len());

        let zones: Vec<DeliveryZone> = store.list_all().await.unwrap();
        assert_eq!(zones.len(), KENYA_ZONES.len());
    }

    #[tokio::test]
    async fn test_seed_keeps_edited_counties() {
        let store = MemoryStore::new();
        seed_delivery_zones(&store).await.unwrap();

        let mut nairobi: DeliveryZone = store
            .find_by::<DeliveryZone>("county", "Nairobi")
            .await
            .unwrap()
            .remove(0);
        let sc = nairobi.add_sub_county("Embakasi").unwrap();
        nairobi.add_location(sc, "Utawala", 260).unwrap();
        store.save(&nairobi).await.unwrap();

        seed_delivery_zones(&store).await.unwrap();
        let reread: DeliveryZone = store
            .find_by::<DeliveryZone>("county", "Nairobi")
            .await
            .unwrap()
            .remove(0);
        assert_eq!(reread.fee_for("Embakasi", "Utawala"), Some(260));
    }
}
