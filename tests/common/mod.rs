#![allow(dead_code)]

//! In-memory repository implementations shared by the integration tests.
//! They mirror the store semantics the services rely on: the unique
//! quote-number index, max-sequence scans and timestamp-descending log reads.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use chantier_backend::model::activity_log::ProjectActivityLog;
use chantier_backend::model::lot::{Lot, LotStatus};
use chantier_backend::model::project::{Project, ProjectStatus};
use chantier_backend::model::quote::{Quote, QuoteStatus};
use chantier_backend::model::user::{User, UserRole, UserStatus};
use chantier_backend::repository::activity_log_repo::ActivityLogRepository;
use chantier_backend::repository::lot_repo::LotRepository;
use chantier_backend::repository::project_repo::ProjectRepository;
use chantier_backend::repository::quote_repo::QuoteRepository;
use chantier_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use chantier_backend::repository::user_repo::UserRepository;

// ---------------------------------------------------------------- projects

#[derive(Default)]
pub struct InMemoryProjectRepository {
    pub projects: Mutex<Vec<Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        InMemoryProjectRepository {
            projects: Mutex::new(projects),
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: Project) -> RepositoryResult<Project> {
        let mut stored = project;
        stored.id = Some(bson::oid::ObjectId::new());
        let now = Utc::now();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.projects.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, project: Project) -> RepositoryResult<Project> {
        let mut updated = project;
        updated.updated_at = Some(Utc::now());
        let mut projects = self.projects.lock().unwrap();
        match projects
            .iter_mut()
            .find(|p| p.project_identifier == updated.project_identifier)
        {
            Some(existing) => {
                *existing = updated.clone();
                Ok(updated)
            }
            None => Err(RepositoryError::not_found(format!(
                "No project found to update: {}",
                updated.project_identifier
            ))),
        }
    }

    async fn delete(&self, project_identifier: &str) -> RepositoryResult<()> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.project_identifier != project_identifier);
        if projects.len() == before {
            return Err(RepositoryError::not_found(format!(
                "No project found to delete: {}",
                project_identifier
            )));
        }
        Ok(())
    }

    async fn find_by_identifier(&self, project_identifier: &str) -> RepositoryResult<Option<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.project_identifier == project_identifier)
            .cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Project>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn find_by_status(&self, status: ProjectStatus) -> RepositoryResult<Vec<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> RepositoryResult<Vec<Project>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.customer_id.as_deref() == Some(customer_id))
            .cloned()
            .collect())
    }
}

// -------------------------------------------------------------------- lots

#[derive(Default)]
pub struct InMemoryLotRepository {
    pub lots: Mutex<Vec<Lot>>,
}

impl InMemoryLotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lots(lots: Vec<Lot>) -> Self {
        InMemoryLotRepository {
            lots: Mutex::new(lots),
        }
    }
}

#[async_trait]
impl LotRepository for InMemoryLotRepository {
    async fn insert(&self, lot: Lot) -> RepositoryResult<Lot> {
        let mut stored = lot;
        stored.id = Some(bson::oid::ObjectId::new());
        let now = Utc::now();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.lots.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Option<Lot>> {
        Ok(self
            .lots
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.lot_identifier == lot_identifier)
            .cloned())
    }

    async fn find_by_project(&self, project_identifier: &str) -> RepositoryResult<Vec<Lot>> {
        Ok(self
            .lots
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.project_identifier == project_identifier)
            .cloned()
            .collect())
    }
}

// ------------------------------------------------------------------- users

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        InMemoryUserRepository {
            users: Mutex::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let mut stored = user;
        stored.id = Some(bson::oid::ObjectId::new());
        let now = Utc::now();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        self.users.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_auth0_user_id(&self, auth0_user_id: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.auth0_user_id.as_deref() == Some(auth0_user_id))
            .cloned())
    }

    async fn find_by_user_identifier(&self, user_identifier: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user_identifier == user_identifier)
            .cloned())
    }
}

// ------------------------------------------------------------------ quotes

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    pub quotes: Mutex<Vec<Quote>>,
}

impl InMemoryQuoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a minimal quote carrying the given sequence, so
    /// `find_max_quote_sequence` reflects it.
    pub fn seed_sequence(&self, sequence: i32) {
        let quote = sample_quote(sequence);
        self.quotes.lock().unwrap().push(quote);
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        // Same guarantee as the store's unique index on quoteNumber
        if quotes.iter().any(|q| q.quote_number == quote.quote_number) {
            return Err(RepositoryError::already_exists(format!(
                "Duplicate key: {}",
                quote.quote_number
            )));
        }
        let mut stored = quote;
        stored.id = Some(bson::oid::ObjectId::new());
        let now = Utc::now();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        quotes.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, quote: Quote) -> RepositoryResult<Quote> {
        let mut updated = quote;
        updated.updated_at = Some(Utc::now());
        let mut quotes = self.quotes.lock().unwrap();
        match quotes.iter_mut().find(|q| q.quote_number == updated.quote_number) {
            Some(existing) => {
                *existing = updated.clone();
                Ok(updated)
            }
            None => Err(RepositoryError::not_found(format!(
                "No quote found to update: {}",
                updated.quote_number
            ))),
        }
    }

    async fn find_max_quote_sequence(&self) -> RepositoryResult<Option<i32>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.quote_sequence)
            .max())
    }

    async fn find_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Option<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.quote_number == quote_number)
            .cloned())
    }

    async fn find_by_project_identifier(&self, project_identifier: &str) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.project_identifier == project_identifier)
            .cloned()
            .collect())
    }

    async fn find_by_lot_identifier(&self, lot_identifier: Uuid) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.lot_identifier == lot_identifier)
            .cloned()
            .collect())
    }

    async fn find_by_contractor_id(&self, contractor_id: &str) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.contractor_id == contractor_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(&self, status: QuoteStatus) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_project_and_status(
        &self,
        project_identifier: &str,
        status: QuoteStatus,
    ) -> RepositoryResult<Vec<Quote>> {
        Ok(self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.project_identifier == project_identifier && q.status == status)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Quote>> {
        Ok(self.quotes.lock().unwrap().clone())
    }
}

// ------------------------------------------------------------ activity log

#[derive(Default)]
pub struct InMemoryActivityLogRepository {
    pub entries: Mutex<Vec<ProjectActivityLog>>,
}

impl InMemoryActivityLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLogRepository {
    async fn save(&self, entry: ProjectActivityLog) -> RepositoryResult<ProjectActivityLog> {
        let mut stored = entry;
        stored.id = Some(bson::oid::ObjectId::new());
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_project_ordered_desc(
        &self,
        project_identifier: &str,
    ) -> RepositoryResult<Vec<ProjectActivityLog>> {
        let mut entries: Vec<ProjectActivityLog> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.project_identifier == project_identifier)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}

// ---------------------------------------------------------------- fixtures

pub fn sample_project(project_identifier: &str) -> Project {
    Project {
        id: None,
        project_identifier: project_identifier.to_string(),
        project_name: "Test Project".to_string(),
        project_description: Some("Test Description".to_string()),
        status: ProjectStatus::InProgress,
        start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 31),
        contractor_id: None,
        salesperson_id: None,
        customer_id: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_lot(lot_identifier: Uuid, project_identifier: &str, assigned_user_ids: Vec<String>) -> Lot {
    Lot {
        id: None,
        lot_identifier,
        lot_number: "L-12".to_string(),
        civic_address: "123 Rue Principale".to_string(),
        price: Some(dec!(75000.00)),
        lot_status: LotStatus::Reserved,
        project_identifier: project_identifier.to_string(),
        assigned_user_ids,
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_user(
    user_identifier: &str,
    auth0_user_id: Option<&str>,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> User {
    User {
        id: None,
        user_identifier: user_identifier.to_string(),
        auth0_user_id: auth0_user_id.map(str::to_string),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        primary_email: format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        user_role: role,
        user_status: UserStatus::Active,
        created_at: None,
        updated_at: None,
    }
}

/// A minimal persisted quote carrying `sequence`; used to seed the
/// max-sequence scan.
pub fn sample_quote(sequence: i32) -> Quote {
    Quote {
        id: Some(bson::oid::ObjectId::new()),
        quote_number: format!("QT-{:07}", sequence),
        quote_sequence: sequence,
        project_identifier: "proj-001".to_string(),
        lot_identifier: Uuid::new_v4(),
        contractor_id: "auth0|contractor1".to_string(),
        category: None,
        line_items: vec![],
        total_amount: dec!(0),
        status: QuoteStatus::Submitted,
        approved_by: None,
        approved_at: None,
        customer_approved_by: None,
        customer_approved_at: None,
        customer_acknowledged: false,
        rejection_reason: None,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}
