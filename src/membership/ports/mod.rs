//! Port contracts for group membership lookups.

pub mod oracle;

#[cfg(test)]
pub use oracle::MockGroupMembership;
pub use oracle::{GroupMembership, MembershipError, MembershipResult};
