//! Concrete `AUTO-*` remediation handlers and the dispatch table that
//! routes a failing requirement's label to one of them.

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;

pub use context::FixContext;
pub use handler::{AutoFixHandler, FixOutcome};
pub use registry::{dispatch, is_registered};

pub use handlers::acquire::AcquireHandler;
pub use handlers::cleanup::{CleanupAction, CleanupStack};
pub use handlers::data::DataHandler;
pub use handlers::fallback::FallbackHandler;
pub use handlers::guide::GuideHandler;
pub use handlers::iface::IfaceHandler;
pub use handlers::install::InstallHandler;
pub use handlers::keys::KeysHandler;
pub use handlers::monitor::MonitorHandler;
pub use handlers::privilege::PrivilegeHandler;
pub use handlers::setup::SetupHandler;
pub use handlers::update::UpdateHandler;
pub use handlers::validate::{ValidateHandler, ValidationResult};
