//! Requirement model and the standard requirement builders an action's
//! preflight check composes (spec §3, §4.1).

mod registry;
mod requirement;
mod standard;

pub use registry::requirements_for;
pub use requirement::Requirement;
pub use standard::{
    capture_file_requirement, handshake_requirement, hash_file_requirement,
    interface_requirement, monitor_requirement, root_requirement, target_requirement,
    tool_requirement, wordlist_requirement,
};
