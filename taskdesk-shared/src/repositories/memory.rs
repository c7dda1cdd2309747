/// In-process repository backend
///
/// Implements every repository trait over plain vectors behind one
/// `tokio::sync::RwLock`. It mirrors the PostgreSQL schema's behavior:
/// unique emails, `ON DELETE CASCADE` foreign keys, and the listing orders
/// documented in [`crate::repositories`]. Timestamps come from a clock that
/// never repeats, so ordering by `created_at` is deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::{
    ProjectRepository, RepositoryError, RepositoryResult, TaskAttachmentRepository,
    TaskCommentRepository, TaskHistoryRepository, TaskRepository, UserRepository,
};
use crate::models::{
    CreateProject, CreateTask, CreateTaskAttachment, CreateTaskComment, CreateTaskHistoryEntry,
    CreateUser, Project, Role, Task, TaskAttachment, TaskComment, TaskHistoryEntry, TaskStatus,
    UpdateProject, UpdateTask, User,
};

#[derive(Default)]
struct Sequences {
    users: i32,
    tasks: i32,
    projects: i32,
    comments: i32,
    attachments: i32,
    history: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    projects: Vec<Project>,
    comments: Vec<TaskComment>,
    attachments: Vec<TaskAttachment>,
    history: Vec<TaskHistoryEntry>,
    ids: Sequences,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    fn now(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }

    fn remove_task_children(&mut self, task_id: i32) {
        self.comments.retain(|c| c.task_id != task_id);
        self.attachments.retain(|a| a.task_id != task_id);
        self.history.retain(|h| h.task_id != task_id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, data: CreateUser) -> RepositoryResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }

        let now = tables.now();
        let user = User {
            id: next_id(&mut tables.ids.users),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_role(&self, id: i32, role: Role) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();

        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        let owned_tasks: Vec<i32> = tables
            .tasks
            .iter()
            .filter(|t| t.user_id == id)
            .map(|t| t.id)
            .collect();
        for task_id in owned_tasks {
            tables.remove_task_children(task_id);
        }
        tables.tasks.retain(|t| t.user_id != id);
        tables.projects.retain(|p| p.gestor_id != id);
        tables.comments.retain(|c| c.user_id != id);
        tables.attachments.retain(|a| a.user_id != id);
        tables.history.retain(|h| h.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all_by_user_id(&self, user_id: i32) -> RepositoryResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tasks)
    }

    async fn create(&self, data: CreateTask) -> RepositoryResult<Task> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let task = Task {
            id: next_id(&mut tables.ids.tasks),
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            status: TaskStatus::Pending,
            priority: data.priority,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: i32, data: UpdateTask) -> RepositoryResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();

        Ok(tables.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            data.apply_to(task);
            task.updated_at = now;
            task.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        if tables.tasks.len() == before {
            return Ok(false);
        }
        tables.remove_task_children(id);
        Ok(true)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects = tables.projects.clone();
        projects.sort_by(|a, b| (a.deadline, a.id).cmp(&(b.deadline, b.id)));
        Ok(projects)
    }

    async fn create(&self, data: CreateProject) -> RepositoryResult<Project> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let project = Project {
            id: next_id(&mut tables.ids.projects),
            gestor_id: data.gestor_id,
            title: data.title,
            description: data.description,
            deadline: data.deadline,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: i32, data: UpdateProject) -> RepositoryResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();

        Ok(tables.projects.iter_mut().find(|p| p.id == id).map(|project| {
            data.apply_to(project);
            project.updated_at = now;
            project.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        Ok(tables.projects.len() < before)
    }
}

#[async_trait]
impl TaskCommentRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskComment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskComment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<TaskComment> = tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(comments)
    }

    async fn create(&self, data: CreateTaskComment) -> RepositoryResult<TaskComment> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let comment = TaskComment {
            id: next_id(&mut tables.ids.comments),
            task_id: data.task_id,
            user_id: data.user_id,
            content: data.content,
            created_at: now,
            updated_at: now,
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_content(
        &self,
        id: i32,
        content: &str,
    ) -> RepositoryResult<Option<TaskComment>> {
        let mut tables = self.tables.write().await;
        let now = tables.now();

        Ok(tables.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = now;
            comment.clone()
        }))
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}

#[async_trait]
impl TaskAttachmentRepository for MemoryStore {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<TaskAttachment>> {
        let tables = self.tables.read().await;
        Ok(tables.attachments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_all_by_task_id(&self, task_id: i32) -> RepositoryResult<Vec<TaskAttachment>> {
        let tables = self.tables.read().await;
        let mut attachments: Vec<TaskAttachment> = tables
            .attachments
            .iter()
            .filter(|a| a.task_id == task_id)
            .cloned()
            .collect();
        attachments.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(attachments)
    }

    async fn create(&self, data: CreateTaskAttachment) -> RepositoryResult<TaskAttachment> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let attachment = TaskAttachment {
            id: next_id(&mut tables.ids.attachments),
            task_id: data.task_id,
            user_id: data.user_id,
            filename: data.filename,
            filepath: data.filepath,
            filesize: data.filesize,
            mimetype: data.mimetype,
            created_at: now,
        };
        tables.attachments.push(attachment.clone());
        Ok(attachment)
    }

    async fn delete(&self, id: i32) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.attachments.len();
        tables.attachments.retain(|a| a.id != id);
        Ok(tables.attachments.len() < before)
    }
}

#[async_trait]
impl TaskHistoryRepository for MemoryStore {
    async fn append(&self, data: CreateTaskHistoryEntry) -> RepositoryResult<TaskHistoryEntry> {
        let mut tables = self.tables.write().await;
        let now = tables.now();
        let entry = TaskHistoryEntry {
            id: next_id(&mut tables.ids.history),
            task_id: data.task_id,
            user_id: data.user_id,
            action: data.action,
            changes: data.changes,
            created_at: now,
        };
        tables.history.push(entry.clone());
        Ok(entry)
    }

    async fn find_all_by_task_id(
        &self,
        task_id: i32,
    ) -> RepositoryResult<Vec<TaskHistoryEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<TaskHistoryEntry> = tables
            .history
            .iter()
            .filter(|h| h.task_id == task_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(entries)
    }
}
