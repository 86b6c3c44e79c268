//! In-memory application repository.
//!
//! Each application sits behind its own mutex so counter reservations for
//! different acronyms never wait on each other; the outer lock is only held
//! for writing while an application is inserted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::application::{
    domain::{AppAcronym, Application, ApplicationDetails, PermissionUpdate},
    ports::{ApplicationRepository, ApplicationRepositoryError, ApplicationRepositoryResult},
};

type ApplicationSlot = Arc<Mutex<Application>>;

/// Thread-safe in-memory application repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationRepository {
    applications: Arc<RwLock<BTreeMap<AppAcronym, ApplicationSlot>>>,
}

impl InMemoryApplicationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, acronym: &AppAcronym) -> ApplicationRepositoryResult<Option<ApplicationSlot>> {
        let applications = self.applications.read().map_err(|err| {
            ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(applications.get(acronym).map(Arc::clone))
    }

    fn with_application<T>(
        &self,
        acronym: &AppAcronym,
        f: impl FnOnce(&mut Application) -> ApplicationRepositoryResult<T>,
    ) -> ApplicationRepositoryResult<T> {
        let slot = self
            .slot(acronym)?
            .ok_or_else(|| ApplicationRepositoryError::NotFound(acronym.clone()))?;
        let mut application = slot.lock().map_err(|err| {
            ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        f(&mut application)
    }
}

fn snapshot(slot: &ApplicationSlot) -> ApplicationRepositoryResult<Application> {
    let application = slot.lock().map_err(|err| {
        ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
    })?;
    Ok(application.clone())
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let mut applications = self.applications.write().map_err(|err| {
            ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if applications.contains_key(application.acronym()) {
            return Err(ApplicationRepositoryError::DuplicateApplication(
                application.acronym().clone(),
            ));
        }
        applications.insert(
            application.acronym().clone(),
            Arc::new(Mutex::new(application.clone())),
        );
        Ok(())
    }

    async fn find_by_acronym(
        &self,
        acronym: &AppAcronym,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        self.slot(acronym)?.as_ref().map(snapshot).transpose()
    }

    async fn list_all(&self) -> ApplicationRepositoryResult<Vec<Application>> {
        let slots: Vec<ApplicationSlot> = {
            let applications = self.applications.read().map_err(|err| {
                ApplicationRepositoryError::persistence(std::io::Error::other(err.to_string()))
            })?;
            applications.values().map(Arc::clone).collect()
        };
        slots.iter().map(snapshot).collect()
    }

    async fn update_details(
        &self,
        acronym: &AppAcronym,
        details: &ApplicationDetails,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application> {
        self.with_application(acronym, |application| {
            application.update_details(details.clone(), updated_at);
            Ok(application.clone())
        })
    }

    async fn update_permissions(
        &self,
        acronym: &AppAcronym,
        update: &PermissionUpdate,
        updated_at: DateTime<Utc>,
    ) -> ApplicationRepositoryResult<Application> {
        self.with_application(acronym, |application| {
            application.apply_permissions(update, updated_at);
            Ok(application.clone())
        })
    }

    async fn reserve_next_task_number(
        &self,
        acronym: &AppAcronym,
    ) -> ApplicationRepositoryResult<u64> {
        self.with_application(acronym, |application| {
            application
                .reserve_next_task_number()
                .map_err(|_| ApplicationRepositoryError::CounterExhausted(acronym.clone()))
        })
    }
}
