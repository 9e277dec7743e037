pub mod logging;
pub mod constants;
pub mod error;
pub mod identity;
pub mod shell;
pub mod template;
pub mod config;
pub mod docker;

pub use docker::extensions::{name_to_argument, BuildPlan, Extension, ExtensionRegistry};
pub use error::{ExtensionError, Result};
pub use identity::{IdentityProvider, SystemIdentity, UserEntry};
