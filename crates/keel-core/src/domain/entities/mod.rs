pub mod common;
pub mod plan;
pub mod template;

pub use crate::domain::DomainError;
pub use common::RelativePath;
pub use plan::{Plan, ResolvedFile};
pub use template::{EntryKind, GroupKey, TemplateEntry, TemplateId, TemplateRef};
