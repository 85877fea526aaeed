pub mod awards;
pub mod constants;
pub mod draft;
pub mod eligibility;
pub mod keys;
pub mod overview;
pub mod panel;
pub mod pattern;
pub mod registration;
pub mod stage;
pub mod stage_data;
pub mod syllabus;

pub use draft::CompetitionDraft;
pub use keys::{CacheKey, CompetitionId, StageId};
pub use panel::PanelKind;
pub use stage::Stage;
pub use stage_data::StageData;
