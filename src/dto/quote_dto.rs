use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::quote::Quote;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItemRequest {
    #[validate(length(min = 1, max = 500))]
    pub item_description: String,

    pub quantity: Decimal,

    pub rate: Decimal,

    pub display_order: i32,
}

/// Body of `POST /quotes`. The quote number is never supplied by the caller;
/// it is generated server-side at creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[validate(length(min = 1, max = 100))]
    pub project_identifier: String,

    pub lot_identifier: String,

    #[validate(length(max = 100))]
    pub category: Option<String>,

    #[validate(nested)]
    pub line_items: Vec<QuoteLineItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectQuoteRequest {
    #[validate(length(max = 1000))]
    pub rejection_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItemResponse {
    pub item_description: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub line_total: Decimal,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote_number: String,
    pub project_identifier: String,
    pub lot_identifier: String,
    pub contractor_id: String,
    pub category: Option<String>,
    pub line_items: Vec<QuoteLineItemResponse>,
    pub total_amount: Decimal,
    pub status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub customer_approved_by: Option<String>,
    pub customer_approved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub customer_acknowledged: bool,
    pub rejection_reason: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        // Response order follows display_order, not insertion order
        let line_items = quote
            .line_items_in_display_order()
            .into_iter()
            .map(|item| QuoteLineItemResponse {
                item_description: item.item_description.clone(),
                quantity: item.quantity,
                rate: item.rate,
                line_total: item.line_total,
                display_order: item.display_order,
            })
            .collect();

        QuoteResponse {
            quote_number: quote.quote_number.clone(),
            project_identifier: quote.project_identifier.clone(),
            lot_identifier: quote.lot_identifier.to_string(),
            contractor_id: quote.contractor_id.clone(),
            category: quote.category.clone(),
            line_items,
            total_amount: quote.total_amount,
            status: quote.status.as_str().to_string(),
            approved_by: quote.approved_by.clone(),
            approved_at: quote.approved_at,
            customer_approved_by: quote.customer_approved_by.clone(),
            customer_approved_at: quote.customer_approved_at,
            customer_acknowledged: quote.customer_acknowledged,
            rejection_reason: quote.rejection_reason,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}
