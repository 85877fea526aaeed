//! Navigation and session orchestration for the competition wizard.

mod controller;
mod session;

pub use controller::WizardController;
pub use session::{LoadSource, Notice, Session};
