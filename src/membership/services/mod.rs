//! Authorization policy services layered over the membership oracle.

mod policy;

pub use policy::{AdminOverride, AdminOverrideScope, PolicyMembership};
