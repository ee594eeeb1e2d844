mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use chantier_backend::model::activity_log::{ActivityType, ProjectActivityLog};
use chantier_backend::model::user::UserRole;
use chantier_backend::repository::activity_log_repo::ActivityLogRepository;
use chantier_backend::repository::project_repo::ProjectRepository;
use chantier_backend::repository::user_repo::UserRepository;
use chantier_backend::service::project_service::{ProjectService, ProjectServiceImpl};
use chantier_backend::util::error::ServiceError;
use common::{
    sample_project, sample_user, InMemoryActivityLogRepository, InMemoryProjectRepository,
    InMemoryUserRepository,
};

const PROJECT_ID: &str = "proj-001";
const OWNER_AUTH0: &str = "auth0|owner1";
const CONTRACTOR_ID: &str = "9b1dfd3a-0000-4a3a-9a38-1f6f3f1c0001";
const SALESPERSON_ID: &str = "9b1dfd3a-0000-4a3a-9a38-1f6f3f1c0002";

struct TestContext {
    service: ProjectServiceImpl,
    project_repo: Arc<InMemoryProjectRepository>,
    activity_log_repo: Arc<InMemoryActivityLogRepository>,
}

fn setup() -> TestContext {
    let project_repo = Arc::new(InMemoryProjectRepository::with_projects(vec![sample_project(
        PROJECT_ID,
    )]));
    let user_repo = Arc::new(InMemoryUserRepository::with_users(vec![
        sample_user(CONTRACTOR_ID, None, "John", "Contractor", UserRole::Contractor),
        sample_user(SALESPERSON_ID, None, "Jane", "Salesperson", UserRole::Salesperson),
        sample_user(
            "9b1dfd3a-0000-4a3a-9a38-1f6f3f1c00aa",
            Some(OWNER_AUTH0),
            "Owner",
            "User",
            UserRole::Owner,
        ),
    ]));
    let activity_log_repo = Arc::new(InMemoryActivityLogRepository::new());

    let service = ProjectServiceImpl::new(
        project_repo.clone(),
        user_repo,
        activity_log_repo.clone(),
    );

    TestContext {
        service,
        project_repo,
        activity_log_repo,
    }
}

async fn stored_project(ctx: &TestContext) -> chantier_backend::model::project::Project {
    ctx.project_repo
        .find_by_identifier(PROJECT_ID)
        .await
        .unwrap()
        .expect("project should exist")
}

// --------------------------------------------------------- assign contractor

#[tokio::test]
async fn assign_contractor_sets_field_and_logs() {
    let ctx = setup();

    let result = ctx
        .service
        .assign_contractor_to_project(PROJECT_ID, Some(CONTRACTOR_ID.to_string()), OWNER_AUTH0)
        .await
        .unwrap();

    assert_eq!(result.contractor_id.as_deref(), Some(CONTRACTOR_ID));
    assert_eq!(stored_project(&ctx).await.contractor_id.as_deref(), Some(CONTRACTOR_ID));

    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.project_identifier, PROJECT_ID);
    assert_eq!(entry.activity_type, ActivityType::ContractorAssigned);
    assert_eq!(entry.user_identifier, CONTRACTOR_ID);
    assert_eq!(entry.user_name, "John Contractor");
    assert_eq!(entry.changed_by, OWNER_AUTH0);
    assert_eq!(entry.changed_by_name, "Owner User");
    assert!(entry.description.contains("assigned"));
}

#[tokio::test]
async fn assign_contractor_missing_project_mutates_nothing() {
    let ctx = setup();

    match ctx
        .service
        .assign_contractor_to_project("proj-missing", Some(CONTRACTOR_ID.to_string()), OWNER_AUTH0)
        .await
    {
        Err(ServiceError::NotFound(msg)) => assert!(msg.contains("Project not found")),
        other => panic!("expected NotFound, got {:?}", other),
    }

    assert_eq!(ctx.activity_log_repo.entry_count(), 0);
}

#[tokio::test]
async fn assign_contractor_unknown_user_mutates_nothing() {
    let ctx = setup();

    match ctx
        .service
        .assign_contractor_to_project(PROJECT_ID, Some("no-such-user".to_string()), OWNER_AUTH0)
        .await
    {
        Err(ServiceError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }

    assert!(stored_project(&ctx).await.contractor_id.is_none());
    assert_eq!(ctx.activity_log_repo.entry_count(), 0);
}

#[tokio::test]
async fn assign_contractor_requires_an_identifier() {
    let ctx = setup();

    for bad in [None, Some("".to_string()), Some("   ".to_string())] {
        match ctx
            .service
            .assign_contractor_to_project(PROJECT_ID, bad.clone(), OWNER_AUTH0)
            .await
        {
            Err(ServiceError::InvalidInput(msg)) => {
                assert!(msg.contains("Contractor identifier is required"), "got {:?}", msg)
            }
            other => panic!("expected InvalidInput for {:?}, got {:?}", bad, other),
        }
    }

    assert_eq!(ctx.activity_log_repo.entry_count(), 0);
}

#[tokio::test]
async fn assigning_over_an_existing_contractor_replaces_silently() {
    let ctx = setup();
    let replacement = "9b1dfd3a-0000-4a3a-9a38-1f6f3f1c0003";
    ctx.service
        .user_repo
        .insert(sample_user(replacement, None, "Rita", "Replacement", UserRole::Contractor))
        .await
        .unwrap();

    ctx.service
        .assign_contractor_to_project(PROJECT_ID, Some(CONTRACTOR_ID.to_string()), OWNER_AUTH0)
        .await
        .unwrap();
    let result = ctx
        .service
        .assign_contractor_to_project(PROJECT_ID, Some(replacement.to_string()), OWNER_AUTH0)
        .await
        .unwrap();

    assert_eq!(result.contractor_id.as_deref(), Some(replacement));

    // Exactly two ASSIGNED entries; the replaced contractor gets no REMOVED entry
    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|e| e.activity_type == ActivityType::ContractorAssigned));
}

// --------------------------------------------------------- remove contractor

#[tokio::test]
async fn remove_contractor_clears_field_and_logs() {
    let ctx = setup();
    ctx.service
        .assign_contractor_to_project(PROJECT_ID, Some(CONTRACTOR_ID.to_string()), OWNER_AUTH0)
        .await
        .unwrap();

    let result = ctx
        .service
        .remove_contractor_from_project(PROJECT_ID, OWNER_AUTH0)
        .await
        .unwrap();

    assert!(result.contractor_id.is_none());
    assert!(stored_project(&ctx).await.contractor_id.is_none());

    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    let removal = &entries[1];
    assert_eq!(removal.activity_type, ActivityType::ContractorRemoved);
    assert_eq!(removal.user_identifier, CONTRACTOR_ID);
    assert!(removal.description.contains("removed"));
}

#[tokio::test]
async fn remove_contractor_with_none_assigned_is_a_silent_noop() {
    let ctx = setup();

    let result = ctx
        .service
        .remove_contractor_from_project(PROJECT_ID, OWNER_AUTH0)
        .await
        .unwrap();

    assert!(result.contractor_id.is_none());
    // No log entry for a no-op removal
    assert_eq!(ctx.activity_log_repo.entry_count(), 0);
}

#[tokio::test]
async fn remove_contractor_survives_a_missing_user_record() {
    let ctx = setup();
    // Assign directly at the store so the holder has no user record
    let mut project = stored_project(&ctx).await;
    project.contractor_id = Some("ghost-user".to_string());
    ctx.project_repo.update(project).await.unwrap();

    let result = ctx
        .service
        .remove_contractor_from_project(PROJECT_ID, OWNER_AUTH0)
        .await
        .unwrap();

    assert!(result.contractor_id.is_none());
    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    // Name snapshot falls back to the raw identifier
    assert_eq!(entries[0].user_name, "ghost-user");
}

// ------------------------------------------------------- salesperson pair

#[tokio::test]
async fn salesperson_assignment_mirrors_contractor_shape() {
    let ctx = setup();

    let result = ctx
        .service
        .assign_salesperson_to_project(PROJECT_ID, Some(SALESPERSON_ID.to_string()), OWNER_AUTH0)
        .await
        .unwrap();
    assert_eq!(result.salesperson_id.as_deref(), Some(SALESPERSON_ID));

    {
        let entries = ctx.activity_log_repo.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].activity_type, ActivityType::SalespersonAssigned);
        assert_eq!(entries[0].user_name, "Jane Salesperson");
    }

    let result = ctx
        .service
        .remove_salesperson_from_project(PROJECT_ID, OWNER_AUTH0)
        .await
        .unwrap();
    assert!(result.salesperson_id.is_none());

    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].activity_type, ActivityType::SalespersonRemoved);
}

#[tokio::test]
async fn remove_salesperson_with_none_assigned_logs_nothing() {
    let ctx = setup();

    ctx.service
        .remove_salesperson_from_project(PROJECT_ID, OWNER_AUTH0)
        .await
        .unwrap();

    assert_eq!(ctx.activity_log_repo.entry_count(), 0);
}

// ----------------------------------------------------------- customer pair

#[tokio::test]
async fn customer_assignment_mirrors_contractor_shape() {
    let ctx = setup();
    let customer_id = "9b1dfd3a-0000-4a3a-9a38-1f6f3f1c0004";
    ctx.service
        .user_repo
        .insert(sample_user(customer_id, None, "Claire", "Customer", UserRole::Customer))
        .await
        .unwrap();

    let result = ctx
        .service
        .assign_customer_to_project(PROJECT_ID, Some(customer_id.to_string()), OWNER_AUTH0)
        .await
        .unwrap();
    assert_eq!(result.customer_id.as_deref(), Some(customer_id));

    let entries = ctx.activity_log_repo.entries.lock().unwrap();
    assert_eq!(entries[0].activity_type, ActivityType::CustomerAssigned);
}

// ------------------------------------------------------------ activity log

#[tokio::test]
async fn activity_log_is_returned_newest_first() {
    let ctx = setup();
    let base = Utc::now();

    // Insert out of order; retrieval must sort by timestamp descending
    for (offset_hours, activity_type) in [
        (2, ActivityType::ContractorAssigned),
        (0, ActivityType::SalespersonAssigned),
        (1, ActivityType::ContractorRemoved),
    ] {
        ctx.activity_log_repo
            .save(ProjectActivityLog {
                id: None,
                project_identifier: PROJECT_ID.to_string(),
                activity_type,
                user_identifier: CONTRACTOR_ID.to_string(),
                user_name: "John Contractor".to_string(),
                changed_by: OWNER_AUTH0.to_string(),
                changed_by_name: "Owner User".to_string(),
                timestamp: base - Duration::hours(offset_hours),
                description: "entry".to_string(),
            })
            .await
            .unwrap();
    }

    let log = ctx.service.get_project_activity_log(PROJECT_ID).await.unwrap();

    assert_eq!(log.len(), 3);
    assert_eq!(log[0].activity_type, "SALESPERSON_ASSIGNED");
    assert_eq!(log[1].activity_type, "CONTRACTOR_REMOVED");
    assert_eq!(log[2].activity_type, "CONTRACTOR_ASSIGNED");
    assert!(log[0].timestamp >= log[1].timestamp && log[1].timestamp >= log[2].timestamp);
}

#[tokio::test]
async fn activity_log_for_unknown_project_is_empty() {
    let ctx = setup();

    let log = ctx
        .service
        .get_project_activity_log("proj-never-existed")
        .await
        .unwrap();

    assert!(log.is_empty());
}

// --------------------------------------------------------------- scenario

#[tokio::test]
async fn end_to_end_contractor_assignment_scenario() {
    let ctx = setup();

    // proj-001 exists with no contractor
    assert!(stored_project(&ctx).await.contractor_id.is_none());

    ctx.service
        .assign_contractor_to_project(PROJECT_ID, Some(CONTRACTOR_ID.to_string()), OWNER_AUTH0)
        .await
        .unwrap();

    let project = stored_project(&ctx).await;
    assert_eq!(project.contractor_id.as_deref(), Some(CONTRACTOR_ID));

    let log = ctx.service.get_project_activity_log(PROJECT_ID).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].activity_type, "CONTRACTOR_ASSIGNED");
    assert_eq!(log[0].user_identifier, CONTRACTOR_ID);
    assert_eq!(log[0].changed_by, OWNER_AUTH0);
}
