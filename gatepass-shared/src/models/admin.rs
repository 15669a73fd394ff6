use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Role;

/// Headline numbers for the admin analytics screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAnalytics {
    pub total_events: i64,
    pub total_users: i64,
    pub total_bookings: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub actor: String,
    pub action: String,
    pub target: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub platform_fee: f64,
    pub maintenance_mode: bool,
}
