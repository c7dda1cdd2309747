/// User model and role capabilities
///
/// Users are created at registration with the `colaborador` role. Elevated
/// roles (`gestor`, `admin`) are granted by an administrator or by the
/// bootstrap account configured at startup.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('colaborador', 'gestor', 'admin');
///
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'colaborador',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Collaborator: manages their own tasks and comments
    Colaborador,

    /// Manager: additionally creates and manages projects
    Gestor,

    /// Administrator: manages any project and user roles
    Admin,
}

/// Something a role is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create projects and manage the ones they lead
    ManageProjects,

    /// Update or delete projects led by someone else
    ManageAnyProject,

    /// Change other users' roles
    ManageUsers,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageProjects => "manage_projects",
            Capability::ManageAnyProject => "manage_any_project",
            Capability::ManageUsers => "manage_users",
        }
    }
}

// Task access is decided by ownership alone, so it has no entry here
const COLABORADOR_CAPABILITIES: &[Capability] = &[];

const GESTOR_CAPABILITIES: &[Capability] = &[Capability::ManageProjects];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ManageProjects,
    Capability::ManageAnyProject,
    Capability::ManageUsers,
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Colaborador => "colaborador",
            Role::Gestor => "gestor",
            Role::Admin => "admin",
        }
    }

    /// Capability table for this role
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Colaborador => COLABORADOR_CAPABILITIES,
            Role::Gestor => GESTOR_CAPABILITIES,
            Role::Admin => ADMIN_CAPABILITIES,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Colaborador
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,

    pub name: String,

    /// Unique, stored lowercase
    pub email: String,

    /// Argon2id hash; never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,

    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub role: Role,
}
