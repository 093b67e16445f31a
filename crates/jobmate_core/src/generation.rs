//! crates/jobmate_core/src/generation.rs
//!
//! The CV generation workflow: `Idle -> Generating -> Success | Error`.
//!
//! Each request is split into a `begin_*` step that hands out a
//! `GenerationTicket` and a `resolve` step that applies the outcome. A ticket is
//! only honoured while it is the one in flight; `start_new` and cancellation
//! retire it, so a late response can never overwrite newer state.

use futures::future::{self, Either};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{find_template, CvData, CvGenerationRequest, DEFAULT_TEMPLATE};
use crate::draft::CvDraft;
use crate::persistence::CvSlot;
use crate::ports::{CvGenerationService, PortResult};
use crate::validation::{validate_request, FieldError};

const GENERATE_FAILED: &str = "Failed to generate CV. Please try again.";
const REGENERATE_FAILED: &str = "Failed to regenerate CV. Please try again.";
const GENERATED_NOTICE: &str = "CV generated successfully!";
const REGENERATED_NOTICE: &str = "CV regenerated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Idle,
    Generating,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Generate,
    Regenerate,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("A generation is already in progress")]
    AlreadyGenerating,
    #[error("There is no generated CV to work with")]
    NoDraft,
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
    #[error("The CV form is incomplete")]
    Invalid(Vec<FieldError>),
    #[error("The request was cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

/// Proof that a request was started, needed to apply its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
    kind: RequestKind,
}

impl GenerationTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The ticket was retired before the outcome arrived; nothing changed.
    Stale,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    epoch: u64,
    previous: GenerationStatus,
}

/// One CV generator instance. Holds at most one request in flight.
pub struct CvWorkflow {
    service: Arc<dyn CvGenerationService>,
    slot: CvSlot,
    status: GenerationStatus,
    cv: Option<CvData>,
    error: Option<String>,
    notice: Option<String>,
    selected_template: String,
    show_form: bool,
    epoch: u64,
    in_flight: Option<InFlight>,
}

impl CvWorkflow {
    /// Creates the workflow, resuming from the persisted CV when there is one.
    pub fn restore(service: Arc<dyn CvGenerationService>, slot: CvSlot) -> Self {
        let saved = slot.load();
        let (status, selected_template, show_form) = match &saved {
            Some(cv) => {
                debug!("restored saved CV for '{}'", cv.personal_info.full_name);
                (GenerationStatus::Success, cv.template.clone(), false)
            }
            None => (GenerationStatus::Idle, DEFAULT_TEMPLATE.to_string(), true),
        };
        Self {
            service,
            slot,
            status,
            cv: saved,
            error: None,
            notice: None,
            selected_template,
            show_form,
            epoch: 0,
            in_flight: None,
        }
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn is_generating(&self) -> bool {
        self.status == GenerationStatus::Generating
    }

    pub fn cv(&self) -> Option<&CvData> {
        self.cv.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The confirmation message left by the last successful request.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn selected_template(&self) -> &str {
        &self.selected_template
    }

    /// Whether the input form (rather than the finished CV) should be shown.
    pub fn show_form(&self) -> bool {
        self.show_form
    }

    //=====================================================================================
    // Transitions
    //=====================================================================================

    /// Starts generation from a form draft using the selected template.
    pub fn begin_generate(
        &mut self,
        draft: CvDraft,
    ) -> Result<(GenerationTicket, CvGenerationRequest), GenerationError> {
        self.ensure_idle()?;
        let request = draft.into_request(self.selected_template.clone());
        validate_request(&request).map_err(GenerationError::Invalid)?;
        let ticket = self.start(RequestKind::Generate);
        Ok((ticket, request))
    }

    /// Starts regeneration of the stored CV.
    pub fn begin_regenerate(&mut self) -> Result<(GenerationTicket, CvData), GenerationError> {
        self.ensure_idle()?;
        let current = self.cv.clone().ok_or(GenerationError::NoDraft)?;
        let ticket = self.start(RequestKind::Regenerate);
        Ok((ticket, current))
    }

    /// Applies the outcome of the request identified by `ticket`.
    pub fn resolve(&mut self, ticket: GenerationTicket, outcome: PortResult<CvData>) -> Resolution {
        match self.in_flight {
            Some(in_flight) if in_flight.epoch == ticket.epoch => {}
            _ => {
                debug!("ignoring outcome of retired request #{}", ticket.epoch);
                return Resolution::Stale;
            }
        }
        self.in_flight = None;

        match outcome {
            Ok(cv) => {
                info!(
                    "CV {} for '{}'",
                    match ticket.kind {
                        RequestKind::Generate => "generated",
                        RequestKind::Regenerate => "regenerated",
                    },
                    cv.personal_info.full_name
                );
                self.persist(&cv);
                self.selected_template = cv.template.clone();
                self.cv = Some(cv);
                self.status = GenerationStatus::Success;
                self.show_form = false;
                self.error = None;
                self.notice = Some(
                    match ticket.kind {
                        RequestKind::Generate => GENERATED_NOTICE,
                        RequestKind::Regenerate => REGENERATED_NOTICE,
                    }
                    .to_string(),
                );
            }
            Err(e) => {
                warn!("CV request #{} failed: {}", ticket.epoch, e);
                let fallback = match ticket.kind {
                    RequestKind::Generate => GENERATE_FAILED,
                    RequestKind::Regenerate => REGENERATE_FAILED,
                };
                self.status = GenerationStatus::Error;
                self.error = Some(e.user_message(fallback));
            }
        }
        Resolution::Applied
    }

    /// Abandons the request identified by `ticket`, restoring the prior status.
    pub fn cancel(&mut self, ticket: GenerationTicket) {
        if let Some(in_flight) = self.in_flight {
            if in_flight.epoch == ticket.epoch {
                debug!("cancelled CV request #{}", ticket.epoch);
                self.in_flight = None;
                self.status = in_flight.previous;
                self.epoch += 1;
            }
        }
    }

    /// Re-opens the form pre-filled from the stored CV, which stays stored
    /// until a new generation succeeds.
    pub fn edit(&mut self) -> Result<CvDraft, GenerationError> {
        self.ensure_idle()?;
        let draft = self.cv.as_ref().map(CvDraft::from_cv).unwrap_or_default();
        self.status = GenerationStatus::Idle;
        self.show_form = true;
        Ok(draft)
    }

    /// Drops the current CV and its persisted copy. Valid from any state.
    pub fn start_new(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
        self.cv = None;
        self.status = GenerationStatus::Idle;
        self.show_form = true;
        self.error = None;
        self.notice = None;
        if let Err(e) = self.slot.clear() {
            warn!("failed to clear saved CV: {}", e);
        }
    }

    /// Switches templates. A stored CV is patched and re-saved without
    /// contacting the generation service.
    pub fn select_template(&mut self, template_id: &str) -> Result<(), GenerationError> {
        let template = find_template(template_id)
            .ok_or_else(|| GenerationError::UnknownTemplate(template_id.to_string()))?;
        self.selected_template = template.id.to_string();
        if let Some(mut cv) = self.cv.take() {
            cv.template = template.id.to_string();
            self.persist(&cv);
            self.cv = Some(cv);
        }
        Ok(())
    }

    /// Picks the template for the next generation only. The stored CV keeps
    /// its template until that generation succeeds.
    pub fn use_template(&mut self, template_id: &str) -> Result<(), GenerationError> {
        let template = find_template(template_id)
            .ok_or_else(|| GenerationError::UnknownTemplate(template_id.to_string()))?;
        self.selected_template = template.id.to_string();
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    //=====================================================================================
    // Async drivers
    //=====================================================================================

    /// Generates a CV from `draft`, honouring `cancel`.
    pub async fn submit(
        &mut self,
        draft: CvDraft,
        cancel: &CancellationToken,
    ) -> Result<&CvData, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        let (ticket, request) = self.begin_generate(draft)?;
        let service = self.service.clone();
        self.drive(ticket, service.generate(&request), cancel).await
    }

    /// Regenerates the stored CV, honouring `cancel`.
    pub async fn regenerate(&mut self, cancel: &CancellationToken) -> Result<&CvData, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }
        let (ticket, current) = self.begin_regenerate()?;
        let service = self.service.clone();
        self.drive(ticket, service.regenerate(&current), cancel).await
    }

    async fn drive<F>(
        &mut self,
        ticket: GenerationTicket,
        request: F,
        cancel: &CancellationToken,
    ) -> Result<&CvData, GenerationError>
    where
        F: Future<Output = PortResult<CvData>>,
    {
        let cancelled = cancel.cancelled();
        futures::pin_mut!(request, cancelled);
        match future::select(request, cancelled).await {
            Either::Left((outcome, _)) => {
                self.resolve(ticket, outcome);
                match (&self.cv, self.status) {
                    (Some(cv), GenerationStatus::Success) => Ok(cv),
                    _ => Err(GenerationError::Failed(
                        self.error.clone().unwrap_or_else(|| GENERATE_FAILED.to_string()),
                    )),
                }
            }
            Either::Right(((), _)) => {
                self.cancel(ticket);
                Err(GenerationError::Cancelled)
            }
        }
    }

    //=====================================================================================
    // Helpers
    //=====================================================================================

    fn ensure_idle(&self) -> Result<(), GenerationError> {
        if self.in_flight.is_some() {
            Err(GenerationError::AlreadyGenerating)
        } else {
            Ok(())
        }
    }

    fn start(&mut self, kind: RequestKind) -> GenerationTicket {
        self.epoch += 1;
        self.in_flight = Some(InFlight {
            epoch: self.epoch,
            previous: self.status,
        });
        self.status = GenerationStatus::Generating;
        self.error = None;
        self.notice = None;
        debug!("started CV request #{} ({:?})", self.epoch, kind);
        GenerationTicket {
            epoch: self.epoch,
            kind,
        }
    }

    fn persist(&self, cv: &CvData) {
        if let Err(e) = self.slot.save(cv) {
            warn!("failed to save CV locally: {}", e);
        }
    }
}
