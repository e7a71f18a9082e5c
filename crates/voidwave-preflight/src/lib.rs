//! Preflight checking: resolve an action's requirements, classify each
//! as met/fixable/manual/missing, and attempt to auto-fix what can be.

mod checker;
mod result;

pub use checker::PreflightChecker;
pub use result::PreflightResult;
