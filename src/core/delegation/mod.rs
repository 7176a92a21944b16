//! Delegation validator
//!
//! A requester may only grant rights covered by the meta-rights they hold:
//! global rights through the category's global management right, scoped rights
//! through same-level rights on the target or inferior-level rights on one of
//! its ancestors. `right_full_admin` bypasses every check.

mod types;
mod validator;

pub use types::{GrantCheck, GrantReason};
pub use validator::DelegationValidator;
