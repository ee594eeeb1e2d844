use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::project_dto::{
    CreateProjectRequest, ProjectActivityLogResponse, ProjectResponse, UpdateProjectRequest,
};
use crate::model::activity_log::{ActivityType, ProjectActivityLog};
use crate::model::project::{Project, ProjectStatus};
use crate::repository::activity_log_repo::ActivityLogRepository;
use crate::repository::project_repo::ProjectRepository;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;

/// The single-holder team roles on a project. Used internally so the six
/// assign/remove operations share one implementation.
#[derive(Debug, Clone, Copy)]
enum TeamRole {
    Contractor,
    Salesperson,
    Customer,
}

impl TeamRole {
    fn label(&self) -> &'static str {
        match self {
            TeamRole::Contractor => "Contractor",
            TeamRole::Salesperson => "Salesperson",
            TeamRole::Customer => "Customer",
        }
    }

    fn assigned_type(&self) -> ActivityType {
        match self {
            TeamRole::Contractor => ActivityType::ContractorAssigned,
            TeamRole::Salesperson => ActivityType::SalespersonAssigned,
            TeamRole::Customer => ActivityType::CustomerAssigned,
        }
    }

    fn removed_type(&self) -> ActivityType {
        match self {
            TeamRole::Contractor => ActivityType::ContractorRemoved,
            TeamRole::Salesperson => ActivityType::SalespersonRemoved,
            TeamRole::Customer => ActivityType::CustomerRemoved,
        }
    }

    fn holder(&self, project: &Project) -> Option<String> {
        match self {
            TeamRole::Contractor => project.contractor_id.clone(),
            TeamRole::Salesperson => project.salesperson_id.clone(),
            TeamRole::Customer => project.customer_id.clone(),
        }
    }

    fn set_holder(&self, project: &mut Project, value: Option<String>) {
        match self {
            TeamRole::Contractor => project.contractor_id = value,
            TeamRole::Salesperson => project.salesperson_id = value,
            TeamRole::Customer => project.customer_id = value,
        }
    }
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn get_all_projects(&self) -> Result<Vec<ProjectResponse>, ServiceError>;
    async fn get_project_by_identifier(&self, project_identifier: &str) -> Result<ProjectResponse, ServiceError>;
    async fn create_project(&self, request: CreateProjectRequest) -> Result<ProjectResponse, ServiceError>;
    async fn update_project(
        &self,
        project_identifier: &str,
        request: UpdateProjectRequest,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn delete_project(&self, project_identifier: &str) -> Result<(), ServiceError>;
    async fn get_projects_by_status(&self, status: ProjectStatus) -> Result<Vec<ProjectResponse>, ServiceError>;
    async fn get_projects_by_customer(&self, customer_id: &str) -> Result<Vec<ProjectResponse>, ServiceError>;

    async fn assign_contractor_to_project(
        &self,
        project_identifier: &str,
        contractor_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn remove_contractor_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn assign_salesperson_to_project(
        &self,
        project_identifier: &str,
        salesperson_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn remove_salesperson_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn assign_customer_to_project(
        &self,
        project_identifier: &str,
        customer_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;
    async fn remove_customer_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError>;

    async fn get_project_activity_log(
        &self,
        project_identifier: &str,
    ) -> Result<Vec<ProjectActivityLogResponse>, ServiceError>;
}

pub struct ProjectServiceImpl {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub activity_log_repo: Arc<dyn ActivityLogRepository>,
}

impl ProjectServiceImpl {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        user_repo: Arc<dyn UserRepository>,
        activity_log_repo: Arc<dyn ActivityLogRepository>,
    ) -> Self {
        ProjectServiceImpl {
            project_repo,
            user_repo,
            activity_log_repo,
        }
    }

    async fn find_project(&self, project_identifier: &str) -> Result<Project, ServiceError> {
        self.project_repo
            .find_by_identifier(project_identifier)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Project not found with identifier: {}",
                    project_identifier
                ))
            })
    }

    /// Actor attribution for the audit trail. The actor's lookup is
    /// best-effort: a missing user falls back to the raw external identity
    /// instead of failing the role change.
    async fn resolve_actor_name(&self, actor_auth0_id: &str) -> String {
        match self.user_repo.find_by_auth0_user_id(actor_auth0_id).await {
            Ok(Some(user)) => user.display_name(),
            _ => actor_auth0_id.to_string(),
        }
    }

    /// Shared assign flow: resolve -> validate -> mutate -> log -> respond.
    /// Assigning over an existing holder silently replaces it; the replaced
    /// holder gets no removal entry from this operation.
    async fn assign_role(
        &self,
        project_identifier: &str,
        member_id: Option<String>,
        actor_auth0_id: &str,
        role: TeamRole,
    ) -> Result<ProjectResponse, ServiceError> {
        let mut project = self.find_project(project_identifier).await?;

        let member_id = member_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("{} identifier is required", role.label()))
            })?;

        let member = self
            .user_repo
            .find_by_user_identifier(&member_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("User not found with identifier: {}", member_id))
            })?;

        let changed_by_name = self.resolve_actor_name(actor_auth0_id).await;

        role.set_holder(&mut project, Some(member.user_identifier.clone()));
        let saved = self.project_repo.update(project).await.map_err(ServiceError::from)?;

        let entry = ProjectActivityLog {
            id: None,
            project_identifier: project_identifier.to_string(),
            activity_type: role.assigned_type(),
            user_identifier: member.user_identifier.clone(),
            user_name: member.display_name(),
            changed_by: actor_auth0_id.to_string(),
            changed_by_name,
            timestamp: chrono::Utc::now(),
            description: format!(
                "{} {} assigned to project {}",
                role.label(),
                member.display_name(),
                project_identifier
            ),
        };
        self.activity_log_repo.save(entry).await.map_err(ServiceError::from)?;

        info!(
            "{} {} assigned to project {}",
            role.label(),
            member.user_identifier,
            project_identifier
        );
        Ok(ProjectResponse::from(saved))
    }

    /// Shared remove flow. Removing when no holder is assigned is a silent
    /// no-op: the project is persisted unchanged and no log entry is written.
    async fn remove_role(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
        role: TeamRole,
    ) -> Result<ProjectResponse, ServiceError> {
        let mut project = self.find_project(project_identifier).await?;

        let holder_id = match role.holder(&project) {
            Some(id) => id,
            None => {
                let saved = self.project_repo.update(project).await.map_err(ServiceError::from)?;
                return Ok(ProjectResponse::from(saved));
            }
        };

        // Best-effort: the removal must go through even when the holder's
        // user record is gone.
        let holder_name = match self.user_repo.find_by_user_identifier(&holder_id).await {
            Ok(Some(user)) => user.display_name(),
            _ => holder_id.clone(),
        };

        let changed_by_name = self.resolve_actor_name(actor_auth0_id).await;

        role.set_holder(&mut project, None);
        let saved = self.project_repo.update(project).await.map_err(ServiceError::from)?;

        let entry = ProjectActivityLog {
            id: None,
            project_identifier: project_identifier.to_string(),
            activity_type: role.removed_type(),
            user_identifier: holder_id.clone(),
            user_name: holder_name.clone(),
            changed_by: actor_auth0_id.to_string(),
            changed_by_name,
            timestamp: chrono::Utc::now(),
            description: format!(
                "{} {} removed from project {}",
                role.label(),
                holder_name,
                project_identifier
            ),
        };
        self.activity_log_repo.save(entry).await.map_err(ServiceError::from)?;

        info!("{} removed from project {}", role.label(), project_identifier);
        Ok(ProjectResponse::from(saved))
    }

    fn validate_create(request: &CreateProjectRequest) -> Result<(), ServiceError> {
        if request.project_name.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Project name cannot be empty".to_string()));
        }
        if let Some(end_date) = request.end_date {
            if request.start_date > end_date {
                return Err(ServiceError::InvalidInput(
                    "Start date cannot be after end date".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectService for ProjectServiceImpl {
    #[instrument(skip(self))]
    async fn get_all_projects(&self) -> Result<Vec<ProjectResponse>, ServiceError> {
        let projects = self.project_repo.find_all().await.map_err(ServiceError::from)?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_project_by_identifier(&self, project_identifier: &str) -> Result<ProjectResponse, ServiceError> {
        let project = self.find_project(project_identifier).await?;
        Ok(ProjectResponse::from(project))
    }

    #[instrument(skip(self, request), fields(project_name = %request.project_name))]
    async fn create_project(&self, request: CreateProjectRequest) -> Result<ProjectResponse, ServiceError> {
        Self::validate_create(&request)?;

        let project = Project {
            id: None,
            project_identifier: Uuid::new_v4().to_string(),
            project_name: request.project_name,
            project_description: request.project_description,
            status: request.status,
            start_date: request.start_date,
            end_date: request.end_date,
            contractor_id: None,
            salesperson_id: None,
            customer_id: None,
            created_at: None,
            updated_at: None,
        };

        let saved = self.project_repo.insert(project).await.map_err(ServiceError::from)?;
        info!("Project created: {}", saved.project_identifier);
        Ok(ProjectResponse::from(saved))
    }

    #[instrument(skip(self, request))]
    async fn update_project(
        &self,
        project_identifier: &str,
        request: UpdateProjectRequest,
    ) -> Result<ProjectResponse, ServiceError> {
        let mut project = self.find_project(project_identifier).await?;

        if let Some(ref name) = request.project_name {
            if name.trim().is_empty() {
                return Err(ServiceError::InvalidInput("Project name cannot be empty".to_string()));
            }
            project.project_name = name.clone();
        }
        if let Some(description) = request.project_description {
            project.project_description = Some(description);
        }
        if let Some(status) = request.status {
            project.status = status;
        }
        if let Some(start_date) = request.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(end_date) = project.end_date {
            if project.start_date > end_date {
                return Err(ServiceError::InvalidInput(
                    "Start date cannot be after end date".to_string(),
                ));
            }
        }

        let saved = self.project_repo.update(project).await.map_err(ServiceError::from)?;
        Ok(ProjectResponse::from(saved))
    }

    #[instrument(skip(self))]
    async fn delete_project(&self, project_identifier: &str) -> Result<(), ServiceError> {
        self.find_project(project_identifier).await?;
        self.project_repo
            .delete(project_identifier)
            .await
            .map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn get_projects_by_status(&self, status: ProjectStatus) -> Result<Vec<ProjectResponse>, ServiceError> {
        let projects = self
            .project_repo
            .find_by_status(status)
            .await
            .map_err(ServiceError::from)?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_projects_by_customer(&self, customer_id: &str) -> Result<Vec<ProjectResponse>, ServiceError> {
        let projects = self
            .project_repo
            .find_by_customer_id(customer_id)
            .await
            .map_err(ServiceError::from)?;
        Ok(projects.into_iter().map(ProjectResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn assign_contractor_to_project(
        &self,
        project_identifier: &str,
        contractor_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.assign_role(project_identifier, contractor_id, actor_auth0_id, TeamRole::Contractor)
            .await
    }

    #[instrument(skip(self))]
    async fn remove_contractor_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.remove_role(project_identifier, actor_auth0_id, TeamRole::Contractor)
            .await
    }

    #[instrument(skip(self))]
    async fn assign_salesperson_to_project(
        &self,
        project_identifier: &str,
        salesperson_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.assign_role(project_identifier, salesperson_id, actor_auth0_id, TeamRole::Salesperson)
            .await
    }

    #[instrument(skip(self))]
    async fn remove_salesperson_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.remove_role(project_identifier, actor_auth0_id, TeamRole::Salesperson)
            .await
    }

    #[instrument(skip(self))]
    async fn assign_customer_to_project(
        &self,
        project_identifier: &str,
        customer_id: Option<String>,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.assign_role(project_identifier, customer_id, actor_auth0_id, TeamRole::Customer)
            .await
    }

    #[instrument(skip(self))]
    async fn remove_customer_from_project(
        &self,
        project_identifier: &str,
        actor_auth0_id: &str,
    ) -> Result<ProjectResponse, ServiceError> {
        self.remove_role(project_identifier, actor_auth0_id, TeamRole::Customer)
            .await
    }

    /// Pure read of the log store, newest entries first. An unknown project
    /// yields an empty list; existence is not re-validated here.
    #[instrument(skip(self))]
    async fn get_project_activity_log(
        &self,
        project_identifier: &str,
    ) -> Result<Vec<ProjectActivityLogResponse>, ServiceError> {
        let entries = self
            .activity_log_repo
            .find_by_project_ordered_desc(project_identifier)
            .await
            .map_err(ServiceError::from)?;
        Ok(entries.into_iter().map(ProjectActivityLogResponse::from).collect())
    }
}
