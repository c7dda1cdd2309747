use std::sync::Arc;

use tracing::info;

use super::{current_caller, required_text, ServiceError, ServiceResult};
use crate::auth::authorization::{require_capability, require_project_manager};
use crate::auth::middleware::AuthContext;
use crate::models::{Capability, CreateProject, Project, UpdateProject};
use crate::repositories::{ProjectRepository, UserRepository};

const PROJECT_NOT_FOUND: &str = "Project not found";

/// Any authenticated user may read projects. Creating one requires the
/// `ManageProjects` capability; changing one requires leading it (or being
/// an admin). Writes check the caller's stored role, not the token's.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { projects, users }
    }

    pub async fn get_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.find_all().await?)
    }

    pub async fn get_project(&self, project_id: i32) -> ServiceResult<Project> {
        self.load(project_id).await
    }

    /// The caller becomes the project's gestor
    pub async fn create_project(
        &self,
        caller: &AuthContext,
        mut data: CreateProject,
    ) -> ServiceResult<Project> {
        let caller = current_caller(self.users.as_ref(), caller).await?;
        require_capability(caller.role, Capability::ManageProjects)?;

        data.gestor_id = caller.user_id;
        data.title = required_text(&data.title, "Title")?;

        let project = self.projects.create(data).await?;
        info!(project_id = project.id, gestor_id = caller.user_id, "Project created");
        Ok(project)
    }

    pub async fn update_project(
        &self,
        caller: &AuthContext,
        project_id: i32,
        mut data: UpdateProject,
    ) -> ServiceResult<Project> {
        let project = self.load(project_id).await?;
        let caller = current_caller(self.users.as_ref(), caller).await?;
        require_project_manager(&project, &caller)?;

        if let Some(ref title) = data.title {
            data.title = Some(required_text(title, "Title")?);
        }

        self.projects
            .update(project_id, data)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))
    }

    pub async fn delete_project(&self, caller: &AuthContext, project_id: i32) -> ServiceResult<()> {
        let project = self.load(project_id).await?;
        let caller = current_caller(self.users.as_ref(), caller).await?;
        require_project_manager(&project, &caller)?;

        if !self.projects.delete(project_id).await? {
            return Err(ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()));
        }

        info!(project_id, user_id = caller.user_id, "Project deleted");
        Ok(())
    }

    async fn load(&self, project_id: i32) -> ServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateUser, Role};
    use crate::repositories::MemoryStore;
    use chrono::{Duration, Utc};

    fn service(store: &Arc<MemoryStore>) -> ProjectService {
        ProjectService::new(store.clone(), store.clone())
    }

    async fn user(store: &MemoryStore, name: &str, role: Role) -> AuthContext {
        let user = UserRepository::create(
            store,
            CreateUser {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                password_hash: "hash".to_string(),
                role,
            },
        )
        .await
        .unwrap();
        AuthContext::new(user.id, user.role)
    }

    fn new_project(title: &str, days: i64) -> CreateProject {
        CreateProject {
            gestor_id: 0,
            title: title.to_string(),
            description: None,
            deadline: Utc::now() + Duration::days(days),
        }
    }

    #[tokio::test]
    async fn test_colaborador_cannot_create() {
        let store = Arc::new(MemoryStore::new());
        let projects = service(&store);
        let colaborador = user(&store, "cora", Role::Colaborador).await;

        assert!(matches!(
            projects.create_project(&colaborador, new_project("P", 1)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(projects.get_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_projects_sorted_by_deadline() {
        let store = Arc::new(MemoryStore::new());
        let projects = service(&store);
        let gestor = user(&store, "gabi", Role::Gestor).await;

        projects.create_project(&gestor, new_project("later", 30)).await.unwrap();
        let sooner = projects.create_project(&gestor, new_project("sooner", 2)).await.unwrap();
        assert_eq!(sooner.gestor_id, gestor.user_id);

        let titles: Vec<String> = projects
            .get_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_only_lead_gestor_or_admin_modifies() {
        let store = Arc::new(MemoryStore::new());
        let projects = service(&store);
        let lead = user(&store, "lead", Role::Gestor).await;
        let other_gestor = user(&store, "other", Role::Gestor).await;
        let admin = user(&store, "root", Role::Admin).await;
        let colaborador = user(&store, "cora", Role::Colaborador).await;

        let project = projects.create_project(&lead, new_project("P", 5)).await.unwrap();
        let rename = || UpdateProject {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };

        for caller in [&other_gestor, &colaborador] {
            assert!(matches!(
                projects.update_project(caller, project.id, rename()).await,
                Err(ServiceError::Forbidden(_))
            ));
        }

        let updated = projects.update_project(&lead, project.id, rename()).await.unwrap();
        assert_eq!(updated.title, "Renamed");

        assert!(matches!(
            projects.delete_project(&other_gestor, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        projects.delete_project(&admin, project.id).await.unwrap();
        assert!(matches!(
            projects.get_project(project.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_demoted_gestor_loses_rights_with_old_token() {
        let store = Arc::new(MemoryStore::new());
        let projects = service(&store);
        let gestor = user(&store, "gabi", Role::Gestor).await;
        let project = projects.create_project(&gestor, new_project("P", 5)).await.unwrap();

        UserRepository::update_role(store.as_ref(), gestor.user_id, Role::Colaborador)
            .await
            .unwrap();

        // `gestor` still says Gestor, as a token issued before the change would
        assert!(matches!(
            projects.create_project(&gestor, new_project("Q", 5)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            projects.delete_project(&gestor, project.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_deleted_caller_is_unauthorized() {
        let store = Arc::new(MemoryStore::new());
        let projects = service(&store);
        let ghost = AuthContext::new(999, Role::Admin);

        assert!(matches!(
            projects.create_project(&ghost, new_project("P", 5)).await,
            Err(ServiceError::Unauthorized(_))
        ));
    }
}
