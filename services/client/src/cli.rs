//! services/client/src/cli.rs
//!
//! Command-line surface of the `jobmate` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use jobmate_core::listing::{SortField, SortOrder};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jobmate")]
#[command(about = "Track job applications and generate CVs and cover letters", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL; overrides JOBMATE_API_URL
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Register an employer account instead of a job seeker
        #[arg(long)]
        employer: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    #[command(subcommand)]
    Applications(ApplicationsCommand),
    #[command(subcommand)]
    Cv(CvCommand),
    #[command(subcommand)]
    Jobs(JobsCommand),
    #[command(subcommand)]
    Hr(HrCommand),
    #[command(subcommand)]
    CoverLetter(CoverLetterCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum ApplicationsCommand {
    /// List applications with search, filter, sort and paging
    List(ListArgs),
    Show { id: String },
    /// Change an application's status
    Update {
        id: String,
        #[arg(long)]
        status: String,
    },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on job title or company
    #[arg(long, default_value = "")]
    pub search: String,
    /// A status label, or "all"
    #[arg(long, default_value = "all")]
    pub status: String,
    #[arg(long, value_enum, default_value_t = SortArg::Applied)]
    pub sort: SortArg,
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortArg {
    Applied,
    Updated,
    Status,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Applied => SortField::AppliedDate,
            SortArg::Updated => SortField::LastUpdated,
            SortArg::Status => SortField::Status,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CvCommand {
    /// Submit a draft file to the generation service
    Generate {
        draft: PathBuf,
        /// Template id; defaults to the selected template
        #[arg(long)]
        template: Option<String>,
    },
    /// Regenerate the stored CV
    Regenerate,
    /// List templates, or select one by id
    Template { id: Option<String> },
    /// Show the stored CV with its score
    Show,
    /// Write an editable draft, pre-filled from the stored CV when there is one
    Edit {
        #[arg(long, value_name = "FILE", default_value = "cv_draft.json")]
        out: PathBuf,
    },
    /// Discard the stored CV
    New,
    /// Export the stored CV as JSON
    Export {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Import a previously exported CV
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    List {
        /// active, closed or draft
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Show { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum HrCommand {
    Stats,
    /// Dashboard stats and recent candidates
    Dashboard,
    Candidates {
        #[arg(long = "job")]
        job_id: Option<String>,
    },
    /// Candidates ranked by match score for a job
    Suggestions { job_id: String },
    /// Move a candidate to a new pipeline stage
    Screen {
        application_id: String,
        #[arg(long)]
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
    Analytics {
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<String>,
        #[arg(long = "job")]
        job_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CoverLetterCommand {
    Generate {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        description: String,
        /// professional, enthusiastic, confident or formal
        #[arg(long)]
        tone: Option<String>,
        #[arg(long)]
        resume_id: Option<String>,
    },
    List,
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}
