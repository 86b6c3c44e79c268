//! `PostgreSQL` group directory backed by the `group_memberships` table.

use super::schema::group_memberships;
use crate::database::PgPool;
use crate::membership::{
    domain::{GroupName, Principal},
    ports::{GroupMembership, MembershipError, MembershipResult},
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed membership oracle.
#[derive(Debug, Clone)]
pub struct PostgresGroupDirectory {
    pool: PgPool,
}

impl PostgresGroupDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records that `principal` belongs to `group`. Existing memberships are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Persistence`] when the insert fails.
    pub async fn add_member(&self, principal: &Principal, group: &GroupName) -> MembershipResult<()> {
        let principal_name = principal.as_str().to_owned();
        let group_name = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::insert_into(group_memberships::table)
                .values((
                    group_memberships::principal.eq(&principal_name),
                    group_memberships::group_name.eq(&group_name),
                ))
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(MembershipError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> MembershipResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MembershipResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MembershipError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MembershipError::persistence)?
    }
}

#[async_trait]
impl GroupMembership for PostgresGroupDirectory {
    async fn is_member(
        &self,
        principal: &Principal,
        group: &GroupName,
    ) -> MembershipResult<bool> {
        let principal_name = principal.as_str().to_owned();
        let group_name = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::select(exists(
                group_memberships::table
                    .filter(group_memberships::principal.eq(&principal_name))
                    .filter(group_memberships::group_name.eq(&group_name)),
            ))
            .get_result::<bool>(connection)
            .map_err(MembershipError::persistence)
        })
        .await
    }
}
