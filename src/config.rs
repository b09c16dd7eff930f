//! Environment-driven configuration.
//!
//! Everything is read once at startup, after `dotenvy` has loaded the
//! optional `.env` file. Optional subsystems (Postgres, SMTP) are simply
//! absent from the config when their variables are not set; the caller
//! picks the fallback.

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    /// TCP port the HTTP server binds on `0.0.0.0`.
    pub port: u16,
    /// Postgres connection string; in-memory store when unset.
    pub database_url: Option<String>,
    /// Allowed CORS origins; permissive when empty.
    pub cors_origins: Vec<String>,
    /// SMTP relay credentials; notifications are skipped when unset.
    pub smtp: Option<SmtpConfig>,
    /// Shop branding interpolated into notification emails.
    pub shop: ShopIdentity,
    /// Load the built-in delivery-zone dataset at startup.
    pub seed_zones_on_start: bool,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Sender identity and contact lines shown in customer emails.
#[derive(Clone, Debug)]
pub struct ShopIdentity {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub whatsapp: String,
    pub location: String,
}

impl Default for ShopIdentity {
    fn default() -> Self {
        Self {
            name: "Duka Toy Shop".to_owned(),
            phone: "0700 000 000".to_owned(),
            email: "info@duka.example".to_owned(),
            whatsapp: "254700000000".to_owned(),
            location: "Nairobi, Kenya".to_owned(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: None,
            cors_origins: Vec::new(),
            smtp: None,
            shop: ShopIdentity::default(),
            seed_zones_on_start: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = ShopIdentity::default();
        let smtp = Self::smtp_from_env();
        let shop = ShopIdentity {
            name: env_or("SHOP_NAME", &defaults.name),
            phone: env_or("SHOP_PHONE", &defaults.phone),
            email: env::var("SHOP_EMAIL")
                .ok()
                .or_else(|| smtp.as_ref().map(|s| s.username.clone()))
                .unwrap_or(defaults.email),
            whatsapp: env_or("SHOP_WHATSAPP", &defaults.whatsapp),
            location: env_or("SHOP_LOCATION", &defaults.location),
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            cors_origins: env::var("CORS_ORIGIN")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            smtp,
            shop,
            seed_zones_on_start: env::var("SEED_DELIVERY_ZONES")
                .map(|raw| raw.eq_ignore_ascii_case("true") || raw == "1")
                .unwrap_or(false),
        }
    }

    /// SMTP is configured only when host and both credentials are present.
    fn smtp_from_env() -> Option<SmtpConfig> {
        let host = env::var("EMAIL_HOST").ok().filter(|v| !v.is_empty())?;
        let username = env::var("EMAIL_USER").ok().filter(|v| !v.is_empty())?;
        let password = env::var("EMAIL_PASSWORD").ok().filter(|v| !v.is_empty())?;
        Some(SmtpConfig {
            host,
            port: env::var("EMAIL_PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(465),
            username,
            password,
        })
    }
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| fallback.to_owned())
}
