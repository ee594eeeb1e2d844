use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    ContractorAssigned,
    ContractorRemoved,
    SalespersonAssigned,
    SalespersonRemoved,
    CustomerAssigned,
    CustomerRemoved,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::ContractorAssigned => "CONTRACTOR_ASSIGNED",
            ActivityType::ContractorRemoved => "CONTRACTOR_REMOVED",
            ActivityType::SalespersonAssigned => "SALESPERSON_ASSIGNED",
            ActivityType::SalespersonRemoved => "SALESPERSON_REMOVED",
            ActivityType::CustomerAssigned => "CUSTOMER_ASSIGNED",
            ActivityType::CustomerRemoved => "CUSTOMER_REMOVED",
        }
    }
}

/// Append-only audit record of a role change on a project. `user_name` and
/// `changed_by_name` are snapshots taken at write time, not live references;
/// entries are never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivityLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_identifier: String,
    pub activity_type: ActivityType,
    pub user_identifier: String,
    pub user_name: String,
    pub changed_by: String,
    pub changed_by_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub description: String,
}
