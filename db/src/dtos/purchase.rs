use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Counter state written back after the quota meter ran.
pub struct PurchaseUsageUpdate {
    pub purchase_id: Uuid,
    pub calls_used: i32,
    pub last_reset: DateTime<Utc>,
}
