//! services/client/src/commands.rs
//!
//! Executes parsed CLI commands against the backend adapters and the local
//! store, and prints the results.

use chrono::Utc;
use jobmate_core::{
    cv_utils::{cv_score, export_file_name, export_json, format_month_year, import_json, preview_text},
    domain::{
        AccountRole, AnalyticsFilters, Application, ApplicationStatus, ApplicationUpdate,
        CandidateStatus, CoverLetterRequest, CoverLetterTone, CvData, DashboardStats,
        JobApplication, JobQuery, JobStatus, LoginCredentials, RegisterCredentials,
        ScreeningDecision, UserProfile, CV_TEMPLATES,
    },
    draft::CvDraft,
    generation::CvWorkflow,
    listing::{ApplicationListView, ApplicationQuery, StatusFilter},
    persistence::cv_slot,
    ports::{
        ApplicationService, AuthService, CoverLetterService, CvGenerationService, HrService,
        JobService, KeyValueStore, PortError,
    },
    session::{ProfileUpdate, SessionHandle},
    settings::{SettingsStore, SettingsUpdate, Theme},
    validation::{validate_login, validate_registration, FieldError},
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::{
    ApiClient, FileStore, RestApplicationsAdapter, RestAuthAdapter, RestCoverLettersAdapter,
    RestHrAdapter, RestJobsAdapter, RestResumesAdapter,
};
use crate::cli::{
    ApplicationsCommand, Command, CoverLetterCommand, CvCommand, HrCommand, JobsCommand, ListArgs,
    SettingsCommand, ThemeArg,
};
use crate::config::Config;
use crate::error::ClientError;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

//=========================================================================================
// Application wiring
//=========================================================================================

/// Everything a command needs: local storage, the session, and the adapters.
pub struct App {
    store: Arc<dyn KeyValueStore>,
    session: SessionHandle,
    auth: RestAuthAdapter,
    applications: RestApplicationsAdapter,
    jobs: RestJobsAdapter,
    hr: RestHrAdapter,
    cover_letters: RestCoverLettersAdapter,
    resumes: Arc<dyn CvGenerationService>,
}

impl App {
    /// Opens local storage and builds the adapters for the configured backend.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
        let session = SessionHandle::load(store.clone());
        let client = ApiClient::new(&config.api_url, config.request_timeout, session.clone())?;
        info!("Using backend at {}", client.base_url());
        Ok(Self {
            store,
            session,
            auth: RestAuthAdapter::new(client.clone()),
            applications: RestApplicationsAdapter::new(client.clone()),
            jobs: RestJobsAdapter::new(client.clone()),
            hr: RestHrAdapter::new(client.clone()),
            cover_letters: RestCoverLettersAdapter::new(client.clone()),
            resumes: Arc::new(RestResumesAdapter::new(client)),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    fn workflow(&self) -> CvWorkflow {
        CvWorkflow::restore(self.resumes.clone(), cv_slot(self.store.clone()))
    }

    pub async fn run(&self, command: Command) -> Result<(), ClientError> {
        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Register {
                first_name,
                last_name,
                email,
                password,
                employer,
            } => {
                let credentials = RegisterCredentials {
                    first_name,
                    last_name,
                    email,
                    password,
                    role: Some(if employer {
                        AccountRole::Employer
                    } else {
                        AccountRole::JobSeeker
                    }),
                };
                self.register(credentials).await
            }
            Command::Logout => {
                self.session.logout();
                println!("Signed out.");
                Ok(())
            }
            Command::Whoami => self.whoami().await,
            Command::Applications(command) => self.applications(command).await,
            Command::Cv(command) => self.cv(command).await,
            Command::Jobs(command) => self.jobs(command).await,
            Command::Hr(command) => self.hr(command).await,
            Command::CoverLetter(command) => self.cover_letter(command).await,
            Command::Settings(command) => self.settings(command),
        }
    }

    //=====================================================================================
    // Authentication
    //=====================================================================================

    async fn login(&self, email: String, password: String) -> Result<(), ClientError> {
        let credentials = LoginCredentials { email, password };
        validate_login(&credentials).map_err(ClientError::Invalid)?;
        let response = self
            .auth
            .login(&credentials)
            .await
            .map_err(|e| ClientError::auth_failure(e, LOGIN_FAILED))?;
        self.start_session(response.user, credentials.email, response.access_token)
            .await
            .map_err(|e| ClientError::auth_failure(e, LOGIN_FAILED))?;
        println!("Signed in as {}.", self.display_name());
        Ok(())
    }

    async fn register(&self, credentials: RegisterCredentials) -> Result<(), ClientError> {
        validate_registration(&credentials).map_err(ClientError::Invalid)?;
        let response = self
            .auth
            .register(&credentials)
            .await
            .map_err(|e| ClientError::auth_failure(e, REGISTRATION_FAILED))?;
        self.start_session(
            response.user,
            credentials.email.clone(),
            response.access_token,
        )
        .await
        .map_err(|e| ClientError::auth_failure(e, REGISTRATION_FAILED))?;
        println!("Account created. Signed in as {}.", self.display_name());
        Ok(())
    }

    /// Stores the token, then fills in the profile from `/auth/me` when the
    /// auth response didn't carry one. A failed profile fetch ends the session.
    async fn start_session(
        &self,
        user: Option<UserProfile>,
        email: String,
        token: String,
    ) -> Result<(), PortError> {
        if let Some(profile) = user {
            self.session.set_auth(profile, token);
            return Ok(());
        }
        let placeholder = UserProfile {
            email,
            ..Default::default()
        };
        self.session.set_auth(placeholder, token);
        match self.auth.current_user().await {
            Ok(me) => {
                self.session.update_user(ProfileUpdate {
                    full_name: Some(format!("{} {}", me.first_name, me.last_name)),
                    email: Some(me.email),
                    ..Default::default()
                });
                Ok(())
            }
            Err(e) => {
                warn!("signed in, but failed to fetch the profile: {}", e);
                self.session.logout();
                Err(e)
            }
        }
    }

    fn display_name(&self) -> String {
        self.session
            .snapshot()
            .user
            .map(|u| {
                if u.full_name.trim().is_empty() {
                    u.email
                } else {
                    format!("{} <{}>", u.full_name, u.email)
                }
            })
            .unwrap_or_default()
    }

    async fn whoami(&self) -> Result<(), ClientError> {
        if !self.session.is_authenticated() {
            println!("Not signed in.");
            return Ok(());
        }
        let me = self.auth.current_user().await?;
        println!("{} {} <{}>", me.first_name, me.last_name, me.email);
        println!("Role: {}", me.role);
        Ok(())
    }

    //=====================================================================================
    // Applications
    //=====================================================================================

    async fn applications(&self, command: ApplicationsCommand) -> Result<(), ClientError> {
        match command {
            ApplicationsCommand::List(args) => {
                let applications = self.applications.list_applications().await?;
                let view = list_view(applications, &args)?;
                print_application_page(&view);
            }
            ApplicationsCommand::Show { id } => {
                let application = self.applications.get_application(&id).await?;
                print_application(&application);
            }
            ApplicationsCommand::Update { id, status } => {
                let update = ApplicationUpdate {
                    status: Some(parse_application_status(&status)?),
                    ..Default::default()
                };
                let application = self.applications.update_application(&id, &update).await?;
                println!("{} is now {}.", application.id, application.status);
            }
            ApplicationsCommand::Delete { id } => {
                self.applications.delete_application(&id).await?;
                println!("Deleted application {}.", id);
            }
        }
        Ok(())
    }

    //=====================================================================================
    // CV generation
    //=====================================================================================

    async fn cv(&self, command: CvCommand) -> Result<(), ClientError> {
        let mut workflow = self.workflow();
        match command {
            CvCommand::Generate { draft, template } => {
                let raw = std::fs::read_to_string(&draft)?;
                let draft: CvDraft = serde_json::from_str(&raw)?;
                if let Some(template) = template {
                    workflow.use_template(&template)?;
                }
                let cancel = cancel_on_ctrl_c();
                let cv = workflow.submit(draft, &cancel).await?;
                print_cv_summary(cv);
                print_notice(&workflow);
            }
            CvCommand::Regenerate => {
                let cancel = cancel_on_ctrl_c();
                let cv = workflow.regenerate(&cancel).await?;
                print_cv_summary(cv);
                print_notice(&workflow);
            }
            CvCommand::Template { id: None } => {
                for template in CV_TEMPLATES.iter() {
                    let marker = if template.id == workflow.selected_template() {
                        "*"
                    } else {
                        " "
                    };
                    println!(
                        "{} {:<13} {:<13} {}",
                        marker, template.id, template.name, template.description
                    );
                }
            }
            CvCommand::Template { id: Some(id) } => {
                workflow.select_template(&id)?;
                println!("Template set to '{}'.", workflow.selected_template());
            }
            CvCommand::Show => match workflow.cv() {
                Some(cv) => print_cv_summary(cv),
                None => println!("No CV yet. Run `jobmate cv edit` to start a draft."),
            },
            CvCommand::Edit { out } => {
                let draft = workflow.edit()?;
                std::fs::write(&out, serde_json::to_string_pretty(&draft)?)?;
                println!(
                    "Draft written to {}. Fill it in, then run `jobmate cv generate {}`.",
                    out.display(),
                    out.display()
                );
            }
            CvCommand::New => {
                workflow.start_new();
                println!("Stored CV discarded.");
            }
            CvCommand::Export { dir } => {
                let cv = workflow.cv().ok_or_else(|| {
                    ClientError::Internal("there is no CV to export".to_string())
                })?;
                let path = export_cv(cv, &dir)?;
                println!("Exported to {}.", path.display());
            }
            CvCommand::Import { file } => {
                let raw = std::fs::read_to_string(&file)?;
                let cv = import_json(&raw)?;
                cv_slot(self.store.clone()).save(&cv)?;
                println!("Imported CV for {}.", cv.personal_info.full_name);
            }
        }
        Ok(())
    }

    //=====================================================================================
    // Jobs, HR, cover letters
    //=====================================================================================

    async fn jobs(&self, command: JobsCommand) -> Result<(), ClientError> {
        match command {
            JobsCommand::List { status, search } => {
                let status = status
                    .as_deref()
                    .map(|label| {
                        JobStatus::parse(label).ok_or_else(|| invalid("status", label, "job status"))
                    })
                    .transpose()?;
                let jobs = self.jobs.list_jobs(&JobQuery { status, search }).await?;
                if jobs.is_empty() {
                    println!("No job postings.");
                }
                for job in &jobs {
                    println!(
                        "{:<12} {:<32} {:<20} {:<8} {} applicants",
                        job.id,
                        job.title,
                        job.company,
                        job.status.as_str(),
                        job.application_count
                    );
                }
            }
            JobsCommand::Show { id } => {
                let job = self.jobs.get_job(&id).await?;
                println!("{} at {} ({})", job.title, job.company, job.location);
                println!("Status: {}", job.status.as_str());
                if let Some(salary) = &job.salary_range {
                    println!("Salary: {}", salary);
                }
                println!("\n{}", job.description);
                for requirement in &job.requirements {
                    println!("  - {}", requirement);
                }
            }
            JobsCommand::Delete { id } => {
                self.jobs.delete_job(&id).await?;
                println!("Deleted job {}.", id);
            }
        }
        Ok(())
    }

    async fn hr(&self, command: HrCommand) -> Result<(), ClientError> {
        match command {
            HrCommand::Stats => {
                let stats = self.hr.dashboard_stats().await?;
                print_stats(&stats);
            }
            HrCommand::Dashboard => {
                let (stats, candidates) =
                    futures::try_join!(self.hr.dashboard_stats(), self.hr.candidates(None))?;
                print_stats(&stats);
                println!();
                print_candidates(&candidates);
            }
            HrCommand::Candidates { job_id } => {
                let candidates = self.hr.candidates(job_id.as_deref()).await?;
                print_candidates(&candidates);
            }
            HrCommand::Suggestions { job_id } => {
                let candidates = self.hr.suggested_candidates(&job_id).await?;
                print_candidates(&candidates);
            }
            HrCommand::Screen {
                application_id,
                status,
                notes,
            } => {
                let status = CandidateStatus::parse(&status)
                    .ok_or_else(|| invalid("status", &status, "candidate status"))?;
                let updated = self
                    .hr
                    .screen_candidate(&application_id, &ScreeningDecision { status, notes })
                    .await?;
                println!(
                    "{} moved to {}.",
                    updated.applicant_name,
                    updated.status.as_str()
                );
            }
            HrCommand::Analytics { from, to, job_id } => {
                let filters = AnalyticsFilters {
                    start_date: from,
                    end_date: to,
                    job_id,
                };
                let data = self.hr.analytics(&filters).await?;
                let m = &data.metrics;
                println!("Applications:        {}", m.total_applications);
                println!("Screening complete:  {:.1}%", m.screening_completion_rate);
                println!("Shortlist rate:      {:.1}%", m.shortlist_rate);
                println!("Interview rate:      {:.1}%", m.interview_rate);
                println!("Offer rate:          {:.1}%", m.offer_rate);
                println!("Avg. time to hire:   {:.1} days", m.average_time_to_hire);
                for entry in &data.applications_by_status {
                    println!("  {:<20} {}", entry.status, entry.count);
                }
                println!(
                    "AI spend: ${:.2} ({} tokens, ${:.4} per application)",
                    data.ai_cost.llm_api_spend,
                    data.ai_cost.tokens_used,
                    data.ai_cost.cost_per_application
                );
            }
        }
        Ok(())
    }

    async fn cover_letter(&self, command: CoverLetterCommand) -> Result<(), ClientError> {
        match command {
            CoverLetterCommand::Generate {
                title,
                company,
                description,
                tone,
                resume_id,
            } => {
                let tone = tone
                    .as_deref()
                    .map(|label| {
                        CoverLetterTone::parse(label).ok_or_else(|| invalid("tone", label, "tone"))
                    })
                    .transpose()?;
                let request = CoverLetterRequest {
                    job_title: title,
                    company_name: company,
                    job_description: description,
                    resume_id,
                    tone,
                    personal_info: None,
                };
                let letter = self.cover_letters.generate_cover_letter(&request).await?;
                println!("{}", letter.content);
            }
            CoverLetterCommand::List => {
                for letter in self.cover_letters.list_cover_letters().await? {
                    println!(
                        "{:<12} {:<32} {:<20} {}",
                        letter.id,
                        letter.job_title,
                        letter.company_name,
                        letter.created_at.format("%Y-%m-%d")
                    );
                }
            }
            CoverLetterCommand::Delete { id } => {
                self.cover_letters.delete_cover_letter(&id).await?;
                println!("Deleted cover letter {}.", id);
            }
        }
        Ok(())
    }

    //=====================================================================================
    // Settings
    //=====================================================================================

    fn settings(&self, command: SettingsCommand) -> Result<(), ClientError> {
        let mut settings = SettingsStore::open(self.store.clone());
        match command {
            SettingsCommand::Show => {
                println!("{}", serde_json::to_string_pretty(settings.settings())?);
            }
            SettingsCommand::Theme { theme } => {
                let mut appearance = settings.settings().appearance.clone();
                appearance.theme = match theme {
                    ThemeArg::Light => Theme::Light,
                    ThemeArg::Dark => Theme::Dark,
                };
                settings.update(SettingsUpdate::Appearance(appearance))?;
                println!("Theme saved.");
            }
        }
        Ok(())
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// A token cancelled when the user presses Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; abandoning the in-flight request");
            child.cancel();
        }
    });
    token
}

fn invalid(field: &'static str, value: &str, what: &str) -> ClientError {
    ClientError::Invalid(vec![FieldError::new(
        field,
        format!("'{}' is not a valid {}", value, what),
    )])
}

fn parse_application_status(label: &str) -> Result<ApplicationStatus, ClientError> {
    ApplicationStatus::parse(label).ok_or_else(|| invalid("status", label, "application status"))
}

fn parse_status_filter(label: &str) -> Result<StatusFilter, ClientError> {
    if label.trim().eq_ignore_ascii_case("all") {
        return Ok(StatusFilter::All);
    }
    parse_application_status(label).map(StatusFilter::Only)
}

/// Builds the list view the same way the table does: query first, then page.
pub fn list_view(
    applications: Vec<Application>,
    args: &ListArgs,
) -> Result<ApplicationListView, ClientError> {
    let mut view = ApplicationListView::new(applications);
    view.set_query(ApplicationQuery {
        search: args.search.clone(),
        status: parse_status_filter(&args.status)?,
        sort_field: args.sort.into(),
        sort_order: args.order.into(),
    });
    view.set_page(args.page);
    Ok(view)
}

/// Writes `cv` into `dir` under its export file name.
pub fn export_cv(cv: &CvData, dir: &Path) -> Result<std::path::PathBuf, ClientError> {
    let path = dir.join(export_file_name(cv, Utc::now().date_naive()));
    std::fs::write(&path, export_json(cv)?)?;
    Ok(path)
}

fn print_application_page(view: &ApplicationListView) {
    let page = view.current_page();
    if page.is_empty() {
        println!("No applications match.");
        return;
    }
    println!(
        "{:<10} {:<28} {:<16} {:<20} {:<12}",
        "ID", "TITLE", "COMPANY", "STATUS", "APPLIED"
    );
    for application in &page.items {
        println!(
            "{:<10} {:<28} {:<16} {:<20} {:<12}",
            application.id,
            application.job_title,
            application.company,
            application.status,
            application.applied_date.format("%Y-%m-%d")
        );
    }
    println!(
        "Page {} of {} ({} applications)",
        page.number, page.total_pages, page.total_items
    );
}

fn print_application(application: &Application) {
    println!("{} at {}", application.job_title, application.company);
    println!("{} | {}", application.location, application.employment_type);
    println!("Status:  {}", application.status);
    println!("Applied: {}", application.applied_date.format("%Y-%m-%d"));
    println!("Updated: {}", application.last_updated.format("%Y-%m-%d %H:%M"));
    if let Some(salary) = &application.salary_range {
        println!("Salary:  {}", salary);
    }
}

fn print_cv_summary(cv: &CvData) {
    println!("{}", preview_text(cv));
    println!("Template: {}   Score: {}/100", cv.template, cv_score(cv));
    for job in &cv.work_experience {
        println!(
            "  {} at {} ({} - {})",
            job.job_title,
            job.company,
            format_month_year(Some(&job.start_date)),
            format_month_year(job.end_date.as_deref())
        );
    }
    println!("Skills: {}", cv.skills.join(", "));
}

fn print_notice(workflow: &CvWorkflow) {
    if let Some(notice) = workflow.notice() {
        println!("{}", notice);
    }
}

fn print_stats(stats: &DashboardStats) {
    println!("Active jobs:           {}", stats.active_jobs);
    println!("Total applications:    {}", stats.total_applications);
    println!("Interviews scheduled:  {}", stats.interviews_scheduled);
    println!("New this week:         {}", stats.new_applications_this_week);
}

fn print_candidates(candidates: &[JobApplication]) {
    if candidates.is_empty() {
        println!("No candidates.");
        return;
    }
    for candidate in candidates {
        let score = candidate
            .match_score
            .map(|s| format!("{}%", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<24} {:<28} {:<10} {:>4}",
            candidate.id,
            candidate.applicant_name,
            candidate.applicant_email,
            candidate.status.as_str(),
            score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OrderArg, SortArg};
    use chrono::{Duration, TimeZone};
    use jobmate_core::listing::PAGE_SIZE;

    fn applications(n: usize) -> Vec<Application> {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        (0..n)
            .map(|i| Application {
                id: format!("app-{}", i),
                job_title: if i % 2 == 0 { "Rust Engineer" } else { "Designer" }.to_string(),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                employment_type: "Full-time".to_string(),
                status: ApplicationStatus::ALL[i % 6],
                applied_date: base - Duration::days(i as i64),
                last_updated: base,
                salary_range: None,
                logo: None,
            })
            .collect()
    }

    fn args(search: &str, status: &str, page: usize) -> ListArgs {
        ListArgs {
            search: search.to_string(),
            status: status.to_string(),
            sort: SortArg::Applied,
            order: OrderArg::Desc,
            page,
        }
    }

    #[test]
    fn list_view_applies_query_then_clamps_the_page() {
        let view = list_view(applications(25), &args("rust", "all", 9)).unwrap();
        let page = view.current_page();
        // 13 matches over pages of 10; page 9 clamps to the last page.
        assert_eq!(page.total_items, 13);
        assert_eq!(page.number, 2);
        assert_eq!(page.items.len(), 13 - PAGE_SIZE);
    }

    #[test]
    fn list_view_rejects_unknown_status() {
        let err = list_view(applications(3), &args("", "ghosted", 1)).unwrap_err();
        assert!(matches!(err, ClientError::Invalid(ref errors) if errors[0].field == "status"));
    }

    #[test]
    fn status_filter_accepts_all_and_labels() {
        assert_eq!(parse_status_filter("ALL").unwrap(), StatusFilter::All);
        assert_eq!(
            parse_status_filter("interview").unwrap(),
            StatusFilter::Only(ApplicationStatus::InterviewScheduled)
        );
    }
}
