//! Diesel schema for application persistence.

diesel::table! {
    /// Application records with stage permissions and running number.
    applications (acronym) {
        /// Unique application acronym.
        #[max_length = 50]
        acronym -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Optional start date.
        start_date -> Nullable<Date>,
        /// Optional end date.
        end_date -> Nullable<Date>,
        /// Number of task identifiers issued so far.
        running_number -> Int8,
        /// Group permitted to create tasks.
        #[max_length = 10]
        permit_open -> Nullable<Varchar>,
        /// Group permitted to release tasks to the to-do list.
        #[max_length = 10]
        permit_todo -> Nullable<Varchar>,
        /// Group permitted to start and complete tasks.
        #[max_length = 10]
        permit_doing -> Nullable<Varchar>,
        /// Group permitted to close tasks.
        #[max_length = 10]
        permit_done -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
