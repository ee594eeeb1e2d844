use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::activity_log::ProjectActivityLog;
use crate::model::project::{Project, ProjectStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub project_name: String,

    #[validate(length(max = 2000))]
    pub project_description: Option<String>,

    pub status: ProjectStatus,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(max = 200))]
    pub project_name: Option<String>,

    #[validate(length(max = 2000))]
    pub project_description: Option<String>,

    pub status: Option<ProjectStatus>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignContractorRequest {
    pub contractor_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSalespersonRequest {
    pub salesperson_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCustomerRequest {
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub project_identifier: String,
    pub project_name: String,
    pub project_description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub contractor_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub customer_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        ProjectResponse {
            project_identifier: project.project_identifier,
            project_name: project.project_name,
            project_description: project.project_description,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
            contractor_id: project.contractor_id,
            salesperson_id: project.salesperson_id,
            customer_id: project.customer_id,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectActivityLogResponse {
    pub project_identifier: String,
    pub activity_type: String,
    pub user_identifier: String,
    pub user_name: String,
    pub changed_by: String,
    pub changed_by_name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub description: String,
}

impl From<ProjectActivityLog> for ProjectActivityLogResponse {
    fn from(entry: ProjectActivityLog) -> Self {
        ProjectActivityLogResponse {
            project_identifier: entry.project_identifier,
            activity_type: entry.activity_type.as_str().to_string(),
            user_identifier: entry.user_identifier,
            user_name: entry.user_name,
            changed_by: entry.changed_by,
            changed_by_name: entry.changed_by_name,
            timestamp: entry.timestamp,
            description: entry.description,
        }
    }
}
