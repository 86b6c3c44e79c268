//! Plan aggregate.

use super::{PlanDomainError, PlanName};
use crate::application::domain::AppAcronym;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_COLOR_LENGTH: usize = 32;

/// Mutable fields of a plan: its date window and display colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSchedule {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    color: Option<String>,
}

impl PlanSchedule {
    /// Creates a validated schedule. Blank colours are stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::InvalidDateRange`] when the end precedes
    /// the start, or [`PlanDomainError::ColorTooLong`] beyond 32 characters.
    pub fn new(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        color: Option<String>,
    ) -> Result<Self, PlanDomainError> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && end < start
        {
            return Err(PlanDomainError::InvalidDateRange { start, end });
        }

        let normalized_color = color
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        if let Some(value) = &normalized_color
            && value.chars().count() > MAX_COLOR_LENGTH
        {
            return Err(PlanDomainError::ColorTooLong(value.clone()));
        }

        Ok(Self {
            start_date,
            end_date,
            color: normalized_color,
        })
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

    /// Returns the display colour hint, if any.
    #[must_use]
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }
}

/// Milestone grouping within an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    application: AppAcronym,
    name: PlanName,
    schedule: PlanSchedule,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPlanData {
    /// Owning application.
    pub application: AppAcronym,
    /// Plan name.
    pub name: PlanName,
    /// Persisted schedule.
    pub schedule: PlanSchedule,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    /// Creates a new plan.
    #[must_use]
    pub fn new(
        application: AppAcronym,
        name: PlanName,
        schedule: PlanSchedule,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            application,
            name,
            schedule,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a plan from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPlanData) -> Self {
        Self {
            application: data.application,
            name: data.name,
            schedule: data.schedule,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the owning application.
    #[must_use]
    pub const fn application(&self) -> &AppAcronym {
        &self.application
    }

    /// Returns the plan name.
    #[must_use]
    pub const fn name(&self) -> &PlanName {
        &self.name
    }

    /// Returns the schedule.
    #[must_use]
    pub const fn schedule(&self) -> &PlanSchedule {
        &self.schedule
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

    /// Replaces the schedule.
    pub fn reschedule(&mut self, schedule: PlanSchedule, updated_at: DateTime<Utc>) {
        self.schedule = schedule;
        self.updated_at = updated_at;
    }
}
