//! Application aggregate root.

use super::{AppAcronym, ApplicationDomainError, PermissionUpdate, Stage, StagePermissions};
use crate::membership::domain::GroupName;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive, non-workflow metadata of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDetails {
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl ApplicationDetails {
    /// Creates validated details. Blank descriptions are stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::InvalidDateRange`] when both dates
    /// are set and the end precedes the start.
    pub fn new(
        description: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ApplicationDomainError> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(ApplicationDomainError::InvalidDateRange { start, end });
        }

        Ok(Self {
            description: description.filter(|text| !text.trim().is_empty()),
            start_date,
            end_date,
        })
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the end date, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// Application aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    acronym: AppAcronym,
    details: ApplicationDetails,
    running_number: u64,
    permissions: StagePermissions,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted acronym.
    pub acronym: AppAcronym,
    /// Persisted descriptive metadata.
    pub details: ApplicationDetails,
    /// Persisted running number.
    pub running_number: u64,
    /// Persisted stage permissions.
    pub permissions: StagePermissions,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Creates a new application with its running number at zero.
    #[must_use]
    pub fn new(
        acronym: AppAcronym,
        details: ApplicationDetails,
        permissions: StagePermissions,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            acronym,
            details,
            running_number: 0,
            permissions,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an application from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedApplicationData) -> Self {
        Self {
            acronym: data.acronym,
            details: data.details,
            running_number: data.running_number,
            permissions: data.permissions,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the acronym.
    #[must_use]
    pub const fn acronym(&self) -> &AppAcronym {
        &self.acronym
    }

    /// Returns the descriptive metadata.
    #[must_use]
    pub const fn details(&self) -> &ApplicationDetails {
        &self.details
    }

    /// Returns the number of task identifiers issued so far.
    #[must_use]
    pub const fn running_number(&self) -> u64 {
        self.running_number
    }

    /// Returns the stage permissions.
    #[must_use]
    pub const fn permissions(&self) -> &StagePermissions {
        &self.permissions
    }

    /// Returns the group permitted to perform `stage`, if configured.
    #[must_use]
    pub const fn permitted_group(&self, stage: Stage) -> Option<&GroupName> {
        self.permissions.group_for(stage)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces the descriptive metadata.
    pub fn update_details(&mut self, details: ApplicationDetails, updated_at: DateTime<Utc>) {
        self.details = details;
        self.updated_at = updated_at;
    }

    /// Applies a partial permission change. Past audit history is unaffected.
    pub fn apply_permissions(&mut self, update: &PermissionUpdate, updated_at: DateTime<Utc>) {
        self.permissions.apply(update);
        self.updated_at = updated_at;
    }

    /// Advances the running number and returns the newly issued value.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::RunningNumberExhausted`] when the
    /// counter reached the storage maximum (`i64::MAX`).
    pub fn reserve_next_task_number(&mut self) -> Result<u64, ApplicationDomainError> {
        let max = i64::MAX.unsigned_abs();
        let next = self
            .running_number
            .checked_add(1)
            .filter(|value| *value <= max)
            .ok_or_else(|| {
                ApplicationDomainError::RunningNumberExhausted(self.acronym.as_str().to_owned())
            })?;
        self.running_number = next;
        Ok(next)
    }
}
