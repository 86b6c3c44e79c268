//! `PostgreSQL` task ledger.
//!
//! Mutations lock the task row with `SELECT ... FOR UPDATE`, apply the
//! change to the aggregate and write fields and notes in one statement, all
//! inside a single transaction.

use super::{models::TaskRow, schema::tasks};
use crate::application::domain::AppAcronym;
use crate::database::PgPool;
use crate::membership::domain::Principal;
use crate::plan::domain::PlanName;
use crate::task::{
    domain::{
        AuditNote, PersistedTaskData, StateChange, Task, TaskEdit, TaskId, TaskName, TaskState,
    },
    ports::{TaskLedger, TaskLedgerError, TaskLedgerResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task ledger.
#[derive(Debug, Clone)]
pub struct PostgresTaskLedger {
    pool: PgPool,
}

impl PostgresTaskLedger {
    /// Creates a new ledger from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskLedgerResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskLedgerResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskLedgerError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskLedgerError::persistence)?
    }

    async fn mutate<F>(&self, id: &TaskId, f: F) -> TaskLedgerResult<Task>
    where
        F: FnOnce(&mut Task) -> TaskLedgerResult<()> + Send + 'static,
    {
        let key = id.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskLedgerError, _>(|tx| {
                let row = tasks::table
                    .filter(tasks::id.eq(key.to_string()))
                    .select(TaskRow::as_select())
                    .for_update()
                    .get_result::<TaskRow>(tx)
                    .optional()?
                    .ok_or_else(|| TaskLedgerError::NotFound(key.clone()))?;
                let mut task = row_to_task(row)?;
                f(&mut task)?;

                let notes = serde_json::to_value(task.notes())
                    .map_err(TaskLedgerError::invalid_persisted_data)?;
                diesel::update(tasks::table.filter(tasks::id.eq(key.to_string())))
                    .set((
                        tasks::description.eq(task.description().map(str::to_owned)),
                        tasks::plan_name.eq(task.plan().map(|plan| plan.as_str().to_owned())),
                        tasks::state.eq(task.state().as_str()),
                        tasks::owner.eq(task.owner().as_str()),
                        tasks::notes.eq(notes),
                        tasks::updated_at.eq(task.updated_at()),
                    ))
                    .execute(tx)?;
                Ok(task)
            })
        })
        .await
    }
}

impl From<DieselError> for TaskLedgerError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskLedger for PostgresTaskLedger {
    async fn create_with_id(&self, task: &Task) -> TaskLedgerResult<()> {
        let row = to_row(task)?;
        let task_id = task.id().clone();

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskLedgerError::DuplicateTask(task_id.clone())
                    }
                    _ => TaskLedgerError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &TaskId) -> TaskLedgerResult<Option<Task>> {
        let key = id.to_string();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(&key))
                .select(TaskRow::as_select())
                .get_result::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_application(&self, application: &AppAcronym) -> TaskLedgerResult<Vec<Task>> {
        let acronym = application.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::application_acronym.eq(&acronym))
                .order(tasks::number.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn append_note_and_set_state(
        &self,
        id: &TaskId,
        change: &StateChange,
    ) -> TaskLedgerResult<Task> {
        let prepared = change.clone();
        self.mutate(id, move |task| Ok(task.apply_state_change(&prepared)?))
            .await
    }

    async fn update_fields(&self, id: &TaskId, edit: &TaskEdit) -> TaskLedgerResult<Task> {
        let prepared = edit.clone();
        self.mutate(id, move |task| Ok(task.apply_edit(&prepared)?))
            .await
    }
}

fn to_row(task: &Task) -> TaskLedgerResult<TaskRow> {
    let number = i64::try_from(task.id().number().value())
        .map_err(TaskLedgerError::invalid_persisted_data)?;
    let notes =
        serde_json::to_value(task.notes()).map_err(TaskLedgerError::invalid_persisted_data)?;

    Ok(TaskRow {
        id: task.id().to_string(),
        application_acronym: task.id().application().as_str().to_owned(),
        number,
        name: task.name().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        plan_name: task.plan().map(|plan| plan.as_str().to_owned()),
        state: task.state().as_str().to_owned(),
        creator: task.creator().as_str().to_owned(),
        owner: task.owner().as_str().to_owned(),
        notes,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskLedgerResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        plan_name,
        state,
        creator,
        owner,
        notes,
        created_at,
        updated_at,
        ..
    } = row;

    let task_id = TaskId::parse(&id).map_err(TaskLedgerError::invalid_persisted_data)?;
    let task_name = TaskName::new(name).map_err(TaskLedgerError::invalid_persisted_data)?;
    let plan = plan_name
        .map(PlanName::new)
        .transpose()
        .map_err(TaskLedgerError::invalid_persisted_data)?;
    let task_state =
        TaskState::try_from(state.as_str()).map_err(TaskLedgerError::invalid_persisted_data)?;
    let creator_principal =
        Principal::new(creator).map_err(TaskLedgerError::invalid_persisted_data)?;
    let owner_principal =
        Principal::new(owner).map_err(TaskLedgerError::invalid_persisted_data)?;
    let audit_notes = serde_json::from_value::<Vec<AuditNote>>(notes)
        .map_err(TaskLedgerError::invalid_persisted_data)?;

    Task::from_persisted(PersistedTaskData {
        id: task_id,
        name: task_name,
        description,
        plan,
        state: task_state,
        creator: creator_principal,
        owner: owner_principal,
        notes: audit_notes,
        created_at,
        updated_at,
    })
    .map_err(TaskLedgerError::invalid_persisted_data)
}
