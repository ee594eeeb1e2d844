use bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LotStatus {
    Available,
    Reserved,
    Sold,
}

/// A subdivision of a project. `assigned_user_ids` holds the internal
/// identifiers of the contractors and customers working the lot; quote
/// submission is gated on membership in that set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub lot_identifier: Uuid,
    pub lot_number: String,
    pub civic_address: String,
    pub price: Option<Decimal>,
    pub lot_status: LotStatus,
    pub project_identifier: String,
    pub assigned_user_ids: Vec<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Lot {
    pub fn is_user_assigned(&self, user_identifier: &str) -> bool {
        self.assigned_user_ids.iter().any(|id| id == user_identifier)
    }
}
