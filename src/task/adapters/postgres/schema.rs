//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with their audit trail.
    tasks (id) {
        /// Rendered identifier, `{acronym}_{number}`.
        #[max_length = 80]
        id -> Varchar,
        /// Owning application acronym.
        #[max_length = 50]
        application_acronym -> Varchar,
        /// Per-application task number.
        number -> Int8,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional soft plan reference.
        #[max_length = 100]
        plan_name -> Nullable<Varchar>,
        /// Workflow state.
        #[max_length = 20]
        state -> Varchar,
        /// Creating principal.
        #[max_length = 100]
        creator -> Varchar,
        /// Current owner.
        #[max_length = 100]
        owner -> Varchar,
        /// Audit notes as a JSON array, newest first.
        notes -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
