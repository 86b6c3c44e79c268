//! Layered runtime configuration.
//!
//! Values are merged in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. `taskboard.toml` in the working directory, when present
//! 3. `TASKBOARD_*` environment variables, with `__` separating sections
//!    (for example `TASKBOARD_DATABASE__URL`)

use crate::membership::{
    domain::{MembershipDomainError, Principal},
    services::{AdminOverride, AdminOverrideScope},
};
use crate::task::services::{NoteTemplates, WorkflowSettings};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use thiserror::Error;

/// File consulted for configuration overrides.
pub const CONFIG_FILE: &str = "taskboard.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed or a value had the wrong type.
    #[error("failed to load configuration: {0}")]
    Figment(Box<figment::Error>),

    /// `workflow.max_transition_attempts` was zero.
    #[error("workflow.max_transition_attempts must be at least 1")]
    ZeroTransitionAttempts,

    /// A note template does not parse.
    #[error("invalid note template: {0}")]
    NoteTemplate(#[from] minijinja::Error),

    /// The override principal is malformed.
    #[error("invalid policy.admin_principal: {0}")]
    AdminPrincipal(#[from] MembershipDomainError),

    /// An override scope was configured without a principal.
    #[error("policy.admin_override_scope is set but policy.admin_principal is missing")]
    MissingAdminPrincipal,
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL. The in-memory adapters are used when
    /// absent.
    pub url: Option<String>,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

/// Workflow engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Attempts per transition before giving up under contention.
    pub max_transition_attempts: u32,
    /// Template of the note written when a task is created.
    pub creation_note_template: String,
    /// Template of the note written when no custom transition note is given.
    pub transition_note_template: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_transition_attempts: 3,
            creation_note_template: NoteTemplates::DEFAULT_CREATION.to_owned(),
            transition_note_template: NoteTemplates::DEFAULT_TRANSITION.to_owned(),
        }
    }
}

/// Administrator override policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Principal granted the override.
    pub admin_principal: Option<String>,
    /// How far the override reaches.
    pub admin_override_scope: AdminOverrideScope,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskboardConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Workflow engine settings.
    pub workflow: WorkflowConfig,
    /// Administrator override policy.
    pub policy: PolicyConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl TaskboardConfig {
    /// Loads configuration from defaults, [`CONFIG_FILE`] and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    /// Builds the provider chain. Exposed so callers can merge further
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Builds the workflow engine settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTransitionAttempts`] or
    /// [`ConfigError::NoteTemplate`] for unusable values.
    pub fn workflow_settings(&self) -> Result<WorkflowSettings, ConfigError> {
        let max_transition_attempts = NonZeroU32::new(self.workflow.max_transition_attempts)
            .ok_or(ConfigError::ZeroTransitionAttempts)?;
        let note_templates = NoteTemplates::new(
            self.workflow.creation_note_template.as_str(),
            self.workflow.transition_note_template.as_str(),
        )?;
        Ok(WorkflowSettings {
            max_transition_attempts,
            note_templates,
        })
    }

    /// Builds the administrator override policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAdminPrincipal`] when a scope is set
    /// without a principal, or [`ConfigError::AdminPrincipal`] when the
    /// principal is malformed.
    pub fn admin_override(&self) -> Result<AdminOverride, ConfigError> {
        let scope = self.policy.admin_override_scope;
        if scope == AdminOverrideScope::None {
            return Ok(AdminOverride::disabled());
        }
        let name = self
            .policy
            .admin_principal
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or(ConfigError::MissingAdminPrincipal)?;
        Ok(AdminOverride::new(Principal::new(name)?, scope))
    }
}
