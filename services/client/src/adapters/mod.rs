pub mod applications;
pub mod auth;
pub mod cover_letters;
pub mod file_store;
pub mod hr;
pub mod http;
pub mod jobs;
pub mod resumes;

pub use applications::RestApplicationsAdapter;
pub use auth::RestAuthAdapter;
pub use cover_letters::RestCoverLettersAdapter;
pub use file_store::FileStore;
pub use hr::RestHrAdapter;
pub use http::ApiClient;
pub use jobs::RestJobsAdapter;
pub use resumes::RestResumesAdapter;
