//! Shared types for the VOIDWAVE automation core: the closed error
//! taxonomy, the requirement/status enums, and the narrow collaborator
//! traits the rest of the workspace depends on.

pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::{EmptySession, RequirementKind, RequirementStatus, SessionAccessor, ToolOutcome};
