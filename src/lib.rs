pub mod cache;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod models;
pub mod panel;
pub mod registry;
pub mod scheduler;
pub mod sync;
pub mod validation;
pub mod verify;
pub mod wizard;

pub use config::WizardConfig;
pub use error::WizardError;
pub use wizard::Session;
