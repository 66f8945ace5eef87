use crate::configuration::Configuration;
use crate::types::SlotConfig;
use chrono::{NaiveTime, Weekday};
use clap::Parser;
use std::path::PathBuf;

/// Command-line and environment configuration. Every flag can also be set
/// through the environment (a `.env` file is loaded in `main`).
#[derive(Debug, Clone, Parser)]
#[command(name = "lab_attendance", about = "Electronics-lab attendance and registration service")]
pub struct ConfigurationHandler {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// PostgreSQL connection string. When absent the service runs with an
    /// impersistent in-memory store.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "ADMIN_USER", default_value = "admin")]
    admin_user: String,

    /// No default on purpose; the credential must come from the environment.
    #[arg(long, env = "ADMIN_PASSWORD")]
    admin_password: String,

    #[arg(long, env = "FRONTEND_PATH", default_value = "frontend/index.html")]
    frontend_path: PathBuf,

    /// Slot definitions as `NAME@HH:MM[xCAP]`, separated by `;`.
    /// Capacity 0 means unlimited.
    #[arg(
        long = "slot",
        env = "SLOTS",
        value_delimiter = ';',
        default_values_t = default_slots()
    )]
    slots: Vec<SlotConfig>,

    /// Weekdays on which the lab takes bookings.
    #[arg(
        long = "allowed-weekday",
        env = "ALLOWED_WEEKDAYS",
        value_delimiter = ',',
        value_parser = parse_weekday,
        default_values_t = [Weekday::Tue, Weekday::Wed, Weekday::Thu]
    )]
    allowed_weekdays: Vec<Weekday>,
}

fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.parse().map_err(|_| format!("invalid weekday: {s}"))
}

fn default_slots() -> Vec<SlotConfig> {
    // The lab's three two-hour shifts, one seat each.
    [(12, "12:00 to 14:00"), (14, "14:00 to 16:00"), (16, "16:00 to 18:00")]
        .into_iter()
        .map(|(hour, name)| SlotConfig {
            name: name.to_string(),
            start: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            capacity: 1,
        })
        .collect()
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> u16 {
        self.port
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn admin_user(&self) -> String {
        self.admin_user.clone()
    }

    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn frontend_path(&self) -> PathBuf {
        self.frontend_path.clone()
    }

    fn slots(&self) -> Vec<SlotConfig> {
        self.slots.clone()
    }

    fn allowed_weekdays(&self) -> Vec<Weekday> {
        self.allowed_weekdays.clone()
    }
}
