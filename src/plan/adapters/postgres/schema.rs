//! Diesel schema for plan persistence.

diesel::table! {
    /// Plans keyed by owning application and name.
    plans (application_acronym, name) {
        /// Owning application acronym.
        #[max_length = 50]
        application_acronym -> Varchar,
        /// Plan name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional start date.
        start_date -> Nullable<Date>,
        /// Optional end date.
        end_date -> Nullable<Date>,
        /// Optional display colour.
        #[max_length = 32]
        color -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
