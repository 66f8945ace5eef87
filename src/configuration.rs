use crate::types::SlotConfig;
use chrono::Weekday;
use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    fn database_url(&self) -> Option<String>;
    fn admin_user(&self) -> String;
    fn admin_password(&self) -> String;
    fn frontend_path(&self) -> PathBuf;
    fn slots(&self) -> Vec<SlotConfig>;
    fn allowed_weekdays(&self) -> Vec<Weekday>;
}
