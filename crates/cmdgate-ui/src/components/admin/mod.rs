//! Administration views: member creation, rules, and the audit log.

mod logs;
mod rules;
mod users;

pub(crate) use logs::LogsView;
pub(crate) use rules::RulesView;
pub(crate) use users::UsersView;
