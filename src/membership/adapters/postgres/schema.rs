//! Diesel schema for group membership lookups.

diesel::table! {
    /// One row per principal-group membership.
    group_memberships (principal, group_name) {
        /// Member principal name.
        #[max_length = 100]
        principal -> Varchar,
        /// Group name.
        #[max_length = 10]
        group_name -> Varchar,
    }
}
