use bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quote approval lifecycle. New quotes start as `Submitted`; the owner moves
/// them to `OwnerApproved` or `Rejected`, and the customer confirms an
/// owner-approved quote as `CustomerApproved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Submitted,
    OwnerApproved,
    CustomerApproved,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Submitted => "SUBMITTED",
            QuoteStatus::OwnerApproved => "OWNER_APPROVED",
            QuoteStatus::CustomerApproved => "CUSTOMER_APPROVED",
            QuoteStatus::Rejected => "REJECTED",
        }
    }
}

/// One priced row within a quote. `line_total` is always derived as
/// `quantity * rate`; callers never supply it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    pub item_description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub line_total: Decimal,
    pub display_order: i32,
}

/// A contractor's priced proposal for work on a lot within a project.
///
/// `quote_number` is unique (`QT-` + 7 zero-padded digits) and immutable once
/// generated; `quote_sequence` is the numeric value backing it, which the
/// store scans to produce the next number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_number: String,
    pub quote_sequence: i32,
    pub project_identifier: String,
    pub lot_identifier: Uuid,
    pub contractor_id: String,
    pub category: Option<String>,
    pub line_items: Vec<QuoteLineItem>,
    pub total_amount: Decimal,
    pub status: QuoteStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub customer_approved_by: Option<String>,
    pub customer_approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub customer_acknowledged: bool,
    pub rejection_reason: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Quote {
    /// Line items in presentation order (`display_order` ascending).
    pub fn line_items_in_display_order(&self) -> Vec<&QuoteLineItem> {
        let mut items: Vec<&QuoteLineItem> = self.line_items.iter().collect();
        items.sort_by_key(|item| item.display_order);
        items
    }
}
