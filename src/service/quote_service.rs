use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::dto::quote_dto::{CreateQuoteRequest, QuoteLineItemRequest, QuoteResponse};
use crate::model::quote::{Quote, QuoteLineItem, QuoteStatus};
use crate::model::user::User;
use crate::repository::lot_repo::LotRepository;
use crate::repository::project_repo::ProjectRepository;
use crate::repository::quote_repo::QuoteRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::quote_number::QuoteNumberGenerator;
use crate::util::error::ServiceError;

/// Attempts at the generate-and-insert step before a duplicate quote number
/// is surfaced as a conflict. Two concurrent creators can read the same max
/// sequence; the unique index rejects the loser, who retries with a fresh
/// read.
const QUOTE_NUMBER_INSERT_ATTEMPTS: u32 = 3;

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn create_quote(
        &self,
        request: CreateQuoteRequest,
        contractor_actor_id: &str,
    ) -> Result<QuoteResponse, ServiceError>;

    async fn get_quote_by_number(&self, quote_number: &str) -> Result<QuoteResponse, ServiceError>;
    async fn get_quotes_by_project(&self, project_identifier: &str) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_quotes_by_lot(&self, lot_identifier: &str) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_quotes_by_contractor(&self, contractor_id: &str) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_all_quotes(&self) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_submitted_quotes(&self) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_submitted_quotes_by_project(
        &self,
        project_identifier: &str,
    ) -> Result<Vec<QuoteResponse>, ServiceError>;
    async fn get_customer_pending_quotes(
        &self,
        customer_auth0_id: &str,
    ) -> Result<Vec<QuoteResponse>, ServiceError>;

    async fn approve_quote(&self, quote_number: &str, owner_id: &str) -> Result<QuoteResponse, ServiceError>;
    async fn reject_quote(
        &self,
        quote_number: &str,
        rejection_reason: &str,
        owner_id: &str,
    ) -> Result<QuoteResponse, ServiceError>;
    async fn customer_approve_quote(
        &self,
        quote_number: &str,
        customer_auth0_id: &str,
    ) -> Result<QuoteResponse, ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub lot_repo: Arc<dyn LotRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    number_generator: QuoteNumberGenerator,
}

impl QuoteServiceImpl {
    pub fn new(
        quote_repo: Arc<dyn QuoteRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        lot_repo: Arc<dyn LotRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        let number_generator = QuoteNumberGenerator::new(quote_repo.clone());
        QuoteServiceImpl {
            quote_repo,
            project_repo,
            lot_repo,
            user_repo,
            number_generator,
        }
    }

    /// Resolve a contractor from the acting identity: external auth id first,
    /// internal identifier as fallback.
    async fn resolve_contractor(&self, contractor_actor_id: &str) -> Result<User, ServiceError> {
        if let Some(user) = self
            .user_repo
            .find_by_auth0_user_id(contractor_actor_id)
            .await
            .map_err(ServiceError::from)?
        {
            return Ok(user);
        }
        self.user_repo
            .find_by_user_identifier(contractor_actor_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::InvalidInput("Contractor user not found".to_string()))
    }

    /// Line item rules: at least one item, quantity > 0, rate >= 0,
    /// non-blank description, display order >= 0.
    fn validate_line_items(line_items: &[QuoteLineItemRequest]) -> Result<(), ServiceError> {
        if line_items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one line item is required".to_string(),
            ));
        }

        for item in line_items {
            if item.quantity <= Decimal::ZERO {
                return Err(ServiceError::InvalidInput(format!(
                    "Quantity must be greater than 0 for: {}",
                    item.item_description
                )));
            }
            if item.rate < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(format!(
                    "Rate cannot be negative for: {}",
                    item.item_description
                )));
            }
            if item.item_description.trim().is_empty() {
                return Err(ServiceError::InvalidInput(
                    "Item description cannot be empty".to_string(),
                ));
            }
            if item.display_order < 0 {
                return Err(ServiceError::InvalidInput(
                    "Display order must be >= 0".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn build_line_items(line_items: &[QuoteLineItemRequest]) -> (Vec<QuoteLineItem>, Decimal) {
        let items: Vec<QuoteLineItem> = line_items
            .iter()
            .map(|item| QuoteLineItem {
                item_description: item.item_description.clone(),
                quantity: item.quantity,
                rate: item.rate,
                line_total: item.quantity * item.rate,
                display_order: item.display_order,
            })
            .collect();
        let total_amount = items.iter().map(|item| item.line_total).sum();
        (items, total_amount)
    }

    /// True if this customer is allowed to see and approve an owner-approved
    /// quote: assigned to the quote's lot, or assigned as the project's
    /// customer.
    async fn customer_can_see_pending_quote(
        &self,
        quote: &Quote,
        customer: &User,
    ) -> Result<bool, ServiceError> {
        if let Some(lot) = self
            .lot_repo
            .find_by_identifier(quote.lot_identifier)
            .await
            .map_err(ServiceError::from)?
        {
            if lot.is_user_assigned(&customer.user_identifier) {
                return Ok(true);
            }
        }

        let project = self
            .project_repo
            .find_by_identifier(&quote.project_identifier)
            .await
            .map_err(ServiceError::from)?;
        Ok(project
            .and_then(|p| p.customer_id)
            .map(|customer_id| customer_id == customer.user_identifier)
            .unwrap_or(false))
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    /// Create a new quote for a project.
    ///
    /// Validation happens in a fixed order and entirely before persistence:
    /// project, lot identifier, lot, lot/project pairing, contractor, lot
    /// assignment, line items. The quote number is generated last and the
    /// insert retried on a duplicate-number conflict.
    #[instrument(skip(self, request), fields(project_identifier = %request.project_identifier, contractor = %contractor_actor_id))]
    async fn create_quote(
        &self,
        request: CreateQuoteRequest,
        contractor_actor_id: &str,
    ) -> Result<QuoteResponse, ServiceError> {
        info!("Creating quote for project: {}", request.project_identifier);

        let project = self
            .project_repo
            .find_by_identifier(&request.project_identifier)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Project not found with identifier: {}",
                    request.project_identifier
                ))
            })?;

        if request.lot_identifier.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Lot identifier is required to create a quote".to_string(),
            ));
        }

        let lot_id = Uuid::parse_str(request.lot_identifier.trim()).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "Invalid lot identifier format: {}",
                request.lot_identifier
            ))
        })?;

        let lot = self
            .lot_repo
            .find_by_identifier(lot_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot not found: {}", request.lot_identifier)))?;

        if lot.project_identifier != project.project_identifier {
            return Err(ServiceError::InvalidInput(
                "Lot does not belong to the specified project".to_string(),
            ));
        }

        let contractor = self.resolve_contractor(contractor_actor_id).await?;

        if !lot.is_user_assigned(&contractor.user_identifier) {
            return Err(ServiceError::InvalidInput(
                "Contractor is not assigned to this lot".to_string(),
            ));
        }

        Self::validate_line_items(&request.line_items)?;

        let (line_items, total_amount) = Self::build_line_items(&request.line_items);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let quote_number = self.number_generator.generate_next_quote_number().await?;

            let quote = Quote {
                id: None,
                quote_number: quote_number.value.clone(),
                quote_sequence: quote_number.sequence,
                project_identifier: project.project_identifier.clone(),
                lot_identifier: lot_id,
                contractor_id: contractor_actor_id.to_string(),
                category: request.category.clone(),
                line_items: line_items.clone(),
                total_amount,
                status: QuoteStatus::Submitted,
                approved_by: None,
                approved_at: None,
                customer_approved_by: None,
                customer_approved_at: None,
                customer_acknowledged: false,
                rejection_reason: None,
                created_at: None,
                updated_at: None,
            };

            match self.quote_repo.create(quote).await {
                Ok(saved) => {
                    info!("Quote created with number: {}", saved.quote_number);
                    return Ok(QuoteResponse::from(saved));
                }
                Err(e) if e.is_duplicate_key() && attempt < QUOTE_NUMBER_INSERT_ATTEMPTS => {
                    warn!(
                        "Quote number {} already taken, retrying (attempt {})",
                        quote_number.value, attempt
                    );
                    continue;
                }
                Err(e) if e.is_duplicate_key() => {
                    error!("Failed to allocate a unique quote number after {} attempts", attempt);
                    return Err(ServiceError::Conflict(
                        "Failed to allocate a unique quote number, please retry".to_string(),
                    ));
                }
                Err(e) => return Err(ServiceError::from(e)),
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_quote_by_number(&self, quote_number: &str) -> Result<QuoteResponse, ServiceError> {
        let quote = self
            .quote_repo
            .find_by_quote_number(quote_number)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote not found: {}", quote_number)))?;
        Ok(QuoteResponse::from(quote))
    }

    /// Project existence is validated before the quote query so a missing
    /// project reports NotFound rather than an empty list.
    #[instrument(skip(self))]
    async fn get_quotes_by_project(&self, project_identifier: &str) -> Result<Vec<QuoteResponse>, ServiceError> {
        self.project_repo
            .find_by_identifier(project_identifier)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Project not found with identifier: {}",
                    project_identifier
                ))
            })?;

        let quotes = self
            .quote_repo
            .find_by_project_identifier(project_identifier)
            .await
            .map_err(ServiceError::from)?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_quotes_by_lot(&self, lot_identifier: &str) -> Result<Vec<QuoteResponse>, ServiceError> {
        let lot_id = Uuid::parse_str(lot_identifier).map_err(|_| {
            ServiceError::InvalidInput(format!("Invalid lot identifier format: {}", lot_identifier))
        })?;
        let quotes = self
            .quote_repo
            .find_by_lot_identifier(lot_id)
            .await
            .map_err(ServiceError::from)?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_quotes_by_contractor(&self, contractor_id: &str) -> Result<Vec<QuoteResponse>, ServiceError> {
        let quotes = self
            .quote_repo
            .find_by_contractor_id(contractor_id)
            .await
            .map_err(ServiceError::from)?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    /// All quotes for the owner view, newest first.
    #[instrument(skip(self))]
    async fn get_all_quotes(&self) -> Result<Vec<QuoteResponse>, ServiceError> {
        let mut quotes = self.quote_repo.find_all().await.map_err(ServiceError::from)?;
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_submitted_quotes(&self) -> Result<Vec<QuoteResponse>, ServiceError> {
        let quotes = self
            .quote_repo
            .find_by_status(QuoteStatus::Submitted)
            .await
            .map_err(ServiceError::from)?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_submitted_quotes_by_project(
        &self,
        project_identifier: &str,
    ) -> Result<Vec<QuoteResponse>, ServiceError> {
        let quotes = self
            .quote_repo
            .find_by_project_and_status(project_identifier, QuoteStatus::Submitted)
            .await
            .map_err(ServiceError::from)?;
        Ok(quotes.into_iter().map(QuoteResponse::from).collect())
    }

    /// Owner-approved quotes visible to this customer, either through a lot
    /// assignment or as the project's customer.
    #[instrument(skip(self))]
    async fn get_customer_pending_quotes(
        &self,
        customer_auth0_id: &str,
    ) -> Result<Vec<QuoteResponse>, ServiceError> {
        let customer = self
            .user_repo
            .find_by_auth0_user_id(customer_auth0_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;

        let owner_approved = self
            .quote_repo
            .find_by_status(QuoteStatus::OwnerApproved)
            .await
            .map_err(ServiceError::from)?;

        let mut visible = Vec::new();
        for quote in owner_approved {
            if self.customer_can_see_pending_quote(&quote, &customer).await? {
                visible.push(QuoteResponse::from(quote));
            }
        }
        Ok(visible)
    }

    #[instrument(skip(self))]
    async fn approve_quote(&self, quote_number: &str, owner_id: &str) -> Result<QuoteResponse, ServiceError> {
        info!("Approving quote: {} by owner: {}", quote_number, owner_id);

        let mut quote = self
            .quote_repo
            .find_by_quote_number(quote_number)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote not found: {}", quote_number)))?;

        if quote.status != QuoteStatus::Submitted {
            return Err(ServiceError::InvalidInput(format!(
                "Quote is not in SUBMITTED status: {}",
                quote.status.as_str()
            )));
        }

        quote.status = QuoteStatus::OwnerApproved;
        quote.approved_by = Some(owner_id.to_string());
        quote.approved_at = Some(chrono::Utc::now());
        quote.rejection_reason = None;

        let saved = self.quote_repo.update(quote).await.map_err(ServiceError::from)?;
        info!("Quote approved: {}", quote_number);
        Ok(QuoteResponse::from(saved))
    }

    #[instrument(skip(self, rejection_reason))]
    async fn reject_quote(
        &self,
        quote_number: &str,
        rejection_reason: &str,
        owner_id: &str,
    ) -> Result<QuoteResponse, ServiceError> {
        info!("Rejecting quote: {} by owner: {}", quote_number, owner_id);

        if rejection_reason.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Rejection reason is required".to_string(),
            ));
        }

        let mut quote = self
            .quote_repo
            .find_by_quote_number(quote_number)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote not found: {}", quote_number)))?;

        if quote.status != QuoteStatus::Submitted {
            return Err(ServiceError::InvalidInput(format!(
                "Quote is not in SUBMITTED status: {}",
                quote.status.as_str()
            )));
        }

        quote.status = QuoteStatus::Rejected;
        quote.rejection_reason = Some(rejection_reason.to_string());
        quote.approved_by = Some(owner_id.to_string());
        quote.approved_at = Some(chrono::Utc::now());

        let saved = self.quote_repo.update(quote).await.map_err(ServiceError::from)?;
        info!("Quote rejected: {}", quote_number);
        Ok(QuoteResponse::from(saved))
    }

    #[instrument(skip(self))]
    async fn customer_approve_quote(
        &self,
        quote_number: &str,
        customer_auth0_id: &str,
    ) -> Result<QuoteResponse, ServiceError> {
        info!("Customer approving quote: {}", quote_number);

        let mut quote = self
            .quote_repo
            .find_by_quote_number(quote_number)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound(format!("Quote not found: {}", quote_number)))?;

        if quote.status != QuoteStatus::OwnerApproved {
            return Err(ServiceError::InvalidInput(format!(
                "Quote must be owner-approved before customer can approve. Current status: {}",
                quote.status.as_str()
            )));
        }

        let customer = self
            .user_repo
            .find_by_auth0_user_id(customer_auth0_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::NotFound("Customer not found".to_string()))?;

        if !self.customer_can_see_pending_quote(&quote, &customer).await? {
            return Err(ServiceError::Forbidden(
                "Customer is not assigned to this quote's lot or project".to_string(),
            ));
        }

        quote.status = QuoteStatus::CustomerApproved;
        quote.customer_approved_by = Some(customer_auth0_id.to_string());
        quote.customer_approved_at = Some(chrono::Utc::now());
        quote.customer_acknowledged = true;

        let saved = self.quote_repo.update(quote).await.map_err(ServiceError::from)?;
        info!("Quote customer-approved: {}", quote_number);
        Ok(QuoteResponse::from(saved))
    }
}
