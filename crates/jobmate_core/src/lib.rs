pub mod cv_utils;
pub mod domain;
pub mod draft;
pub mod generation;
pub mod listing;
pub mod persistence;
pub mod ports;
pub mod session;
pub mod settings;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{Application, ApplicationStatus, ApplicationUpdate, CvData, CvGenerationRequest};
pub use generation::{CvWorkflow, GenerationError, GenerationStatus, GenerationTicket};
pub use listing::{ApplicationListView, ApplicationQuery, Page, SortField, SortOrder, StatusFilter};
pub use persistence::{cv_slot, CvSlot, MemoryStore, SingleSlot};
pub use ports::{
    ApplicationService, AuthService, CoverLetterService, CvGenerationService, HrService,
    JobService, KeyValueStore, PortError, PortResult,
};
pub use session::{SessionContext, SessionHandle};
pub use settings::{SettingsStore, SettingsUpdate, UserSettings};
