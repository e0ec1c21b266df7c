use crate::compose::{ComposeField, ComposeForm};
use crate::proposal::{
    EpochMs, ExportKind, GenerateRequest, GenerateResponse, ModelOption, NewProposal,
    ProposalContent, ProposalId, ProposalRecord, ProposalStatus, TemplateOption,
};
use crate::reconcile::{self, PendingMatch};
use crate::view_model::{filter_proposals, AppViewModel, ComposeView, ResultViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    Compose,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Sent,
}

impl StatusFilter {
    pub fn matches(&self, status: ProposalStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Draft => status == ProposalStatus::Draft,
            StatusFilter::Sent => status == ProposalStatus::Sent,
        }
    }
}

/// What the result view is anchored to. The enum makes "at most one of
/// {selection, pending match}" impossible to violate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultFocus {
    /// Not yet matched to a persisted record.
    Provisional(PendingMatch),
    /// Matched; the identifier is authoritative for the rest of this
    /// result-view lifetime.
    Bound(ProposalId),
}

/// The proposal payload the result view displays, whatever its provenance
/// (immediate generation response or a persisted record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub prospect_name: String,
    pub prospect_url: String,
    pub pain_points: String,
    pub content: ProposalContent,
    pub presentation_url: Option<String>,
    pub pdf_url: Option<String>,
    pub pptx_url: Option<String>,
    pub status: ProposalStatus,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl ResultView {
    fn from_record(record: &ProposalRecord) -> Self {
        Self {
            prospect_name: record.prospect_name.clone(),
            prospect_url: record.prospect_url.clone(),
            pain_points: record.pain_points.clone(),
            content: record.content.clone(),
            presentation_url: record.presentation_url.clone(),
            pdf_url: record.pdf_url.clone(),
            pptx_url: record.pptx_url.clone(),
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Catalogs {
    pub models: Vec<ModelOption>,
    pub templates: Vec<TemplateOption>,
    pub default_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    view: ViewState,
    compose: ComposeForm,
    compose_error: Option<String>,
    generating: bool,
    generation_seq: u64,
    inflight: Option<GenerateRequest>,
    proposals: Vec<ProposalRecord>,
    status_filter: StatusFilter,
    search: String,
    focus: Option<ResultFocus>,
    result: Option<ResultView>,
    catalogs: Catalogs,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let filtered = filter_proposals(&self.proposals, self.status_filter, &self.search);
        let result = self.result.as_ref().map(|result| {
            let bound = match &self.focus {
                Some(ResultFocus::Bound(id)) => Some(id.clone()),
                _ => None,
            };
            ResultViewModel {
                syncing: matches!(&self.focus, Some(ResultFocus::Provisional(_))),
                editing_enabled: bound.is_some(),
                download_available: bound.is_some()
                    && (result.pdf_url.is_some() || result.pptx_url.is_some()),
                bound,
                result: result.clone(),
            }
        });

        AppViewModel::assemble(
            self.view,
            &self.proposals,
            filtered,
            self.status_filter,
            self.search.clone(),
            ComposeView {
                form: self.compose.clone(),
                error: self.compose_error.clone(),
                generating: self.generating,
                models: self.catalogs.models.clone(),
                templates: self.catalogs.templates.clone(),
                default_model: self.catalogs.default_model.clone(),
            },
            result,
        )
    }

    /// True once since the last observable change; the shell renders only
    /// after a message that returned true here.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // --- compose ---

    pub(crate) fn start_compose(&mut self) {
        self.view = ViewState::Compose;
        self.focus = None;
        self.result = None;
        self.compose = ComposeForm {
            model: self.catalogs.default_model.clone(),
            ..ComposeForm::default()
        };
        self.compose_error = None;
        self.generating = false;
        self.inflight = None;
        self.dirty = true;
    }

    pub(crate) fn edit_compose_field(&mut self, field: ComposeField, value: String) {
        if self.view != ViewState::Compose {
            return;
        }
        self.compose.apply_edit(field, value);
        self.dirty = true;
    }

    pub(crate) fn toggle_deep_scrape(&mut self) {
        if self.view != ViewState::Compose {
            return;
        }
        self.compose.deep_scrape = !self.compose.deep_scrape;
        self.dirty = true;
    }

    /// Validates and submits the compose form. Returns the sequence number
    /// and request of the generation to start, or `None` when nothing should
    /// happen (invalid form, already generating, not composing).
    pub(crate) fn submit_compose(&mut self) -> Option<(u64, GenerateRequest)> {
        if self.view != ViewState::Compose || self.generating {
            return None;
        }
        match self.compose.build_request() {
            Ok(request) => {
                self.generation_seq += 1;
                self.generating = true;
                self.compose_error = None;
                self.inflight = Some(request.clone());
                self.dirty = true;
                Some((self.generation_seq, request))
            }
            Err(message) => {
                self.compose_error = Some(message);
                self.dirty = true;
                None
            }
        }
    }

    fn generation_is_current(&self, seq: u64) -> bool {
        self.view == ViewState::Compose && self.generating && seq == self.generation_seq
    }

    /// Applies a successful generation: moves to the provisional result view
    /// and returns the fields to persist. Stale completions (reset or
    /// re-submitted since) return `None` and change nothing.
    pub(crate) fn complete_generation(
        &mut self,
        seq: u64,
        response: GenerateResponse,
        generated_at: EpochMs,
    ) -> Option<NewProposal> {
        if !self.generation_is_current(seq) {
            return None;
        }
        let request = self.inflight.take()?;
        self.generating = false;

        self.result = Some(ResultView {
            prospect_name: request.prospect_name.clone(),
            prospect_url: request.prospect_url.clone(),
            pain_points: request.pain_points.clone(),
            content: response.data.clone(),
            presentation_url: response.presentation_url.clone(),
            pdf_url: response.pdf_url.clone(),
            pptx_url: response.pptx_url.clone(),
            status: ProposalStatus::Draft,
            created_at: generated_at,
            updated_at: generated_at,
        });
        self.focus = Some(ResultFocus::Provisional(PendingMatch {
            prospect_name: request.prospect_name.clone(),
            prospect_url: request.prospect_url.clone(),
            pain_points: request.pain_points.clone(),
            generated_at,
        }));
        self.view = ViewState::Result;
        self.dirty = true;

        Some(NewProposal {
            prospect_name: request.prospect_name,
            prospect_url: request.prospect_url,
            pain_points: request.pain_points,
            content: response.data,
            presentation_url: response.presentation_url,
            pdf_url: response.pdf_url,
            pptx_url: response.pptx_url,
        })
    }

    pub(crate) fn fail_generation(&mut self, seq: u64, message: String) {
        if !self.generation_is_current(seq) {
            return;
        }
        self.generating = false;
        self.inflight = None;
        self.compose_error = Some(message);
        self.dirty = true;
    }

    // --- collection and reconciliation ---

    pub(crate) fn apply_snapshot(&mut self, mut records: Vec<ProposalRecord>) {
        // The store delivers newest-first; re-assert in case it ever doesn't.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if self.proposals != records {
            self.proposals = records;
            self.dirty = true;
        }
    }

    /// Runs reconciliation against the current collection. A no-op unless the
    /// result view is provisional; once bound, nothing here ever rebinds.
    pub(crate) fn reconcile_pending(&mut self) {
        let matched = match (&self.view, &self.focus) {
            (ViewState::Result, Some(ResultFocus::Provisional(pending))) => {
                reconcile::find_match(&self.proposals, pending).cloned()
            }
            _ => None,
        };
        if let Some(record) = matched {
            if let Some(result) = self.result.as_mut() {
                result.status = record.status;
                result.created_at = record.created_at;
                result.updated_at = record.updated_at;
            }
            self.focus = Some(ResultFocus::Bound(record.id));
            self.dirty = true;
        }
    }

    // --- selection and result actions ---

    pub(crate) fn select_record(&mut self, id: &ProposalId) {
        let Some(record) = self.proposals.iter().find(|record| record.id == *id) else {
            return;
        };
        self.result = Some(ResultView::from_record(record));
        self.focus = Some(ResultFocus::Bound(record.id.clone()));
        self.view = ViewState::Result;
        self.compose_error = None;
        self.generating = false;
        self.inflight = None;
        self.dirty = true;
    }

    pub(crate) fn reset(&mut self) {
        self.view = ViewState::List;
        self.focus = None;
        self.result = None;
        self.compose_error = None;
        self.generating = false;
        self.inflight = None;
        self.dirty = true;
    }

    pub(crate) fn set_status_filter(&mut self, filter: StatusFilter) {
        if self.status_filter != filter {
            self.status_filter = filter;
            self.dirty = true;
        }
    }

    pub(crate) fn set_search(&mut self, search: String) {
        if self.search != search {
            self.search = search;
            self.dirty = true;
        }
    }

    fn bound_id(&self) -> Option<ProposalId> {
        match &self.focus {
            Some(ResultFocus::Bound(id)) if self.view == ViewState::Result => Some(id.clone()),
            _ => None,
        }
    }

    /// Applies a local content edit in place. Returns the bound id to persist
    /// against, or `None` while unbound (editing is disabled then).
    pub(crate) fn apply_content_edit(
        &mut self,
        content: &ProposalContent,
        updated_at: EpochMs,
    ) -> Option<ProposalId> {
        let id = self.bound_id()?;
        let result = self.result.as_mut()?;
        result.content = content.clone();
        result.updated_at = updated_at;
        self.dirty = true;
        Some(id)
    }

    /// Toggles draft/sent on the displayed proposal. Returns the bound id and
    /// the new status, or `None` while unbound.
    pub(crate) fn toggle_status(
        &mut self,
        updated_at: EpochMs,
    ) -> Option<(ProposalId, ProposalStatus)> {
        let id = self.bound_id()?;
        let result = self.result.as_mut()?;
        let next = result.status.toggled();
        result.status = next;
        result.updated_at = updated_at;
        self.dirty = true;
        Some((id, next))
    }

    /// The artifact export to track for a download request: PDF when present,
    /// else PPTX. `None` while unbound or without artifacts.
    pub(crate) fn download_target(&self) -> Option<(ProposalId, ExportKind)> {
        let id = self.bound_id()?;
        let result = self.result.as_ref()?;
        if result.pdf_url.is_some() {
            Some((id, ExportKind::Pdf))
        } else if result.pptx_url.is_some() {
            Some((id, ExportKind::Pptx))
        } else {
            None
        }
    }

    pub(crate) fn email_export_target(&self) -> Option<ProposalId> {
        self.bound_id()
    }

    pub(crate) fn displayed_result(&self) -> Option<&ResultView> {
        if self.view == ViewState::Result {
            self.result.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn set_catalogs(
        &mut self,
        models: Vec<ModelOption>,
        templates: Vec<TemplateOption>,
        default_model: String,
    ) {
        let next = Catalogs {
            models,
            templates,
            default_model,
        };
        if self.catalogs != next {
            // Pre-fill the model picker when the composer is still on the
            // stale default.
            if self.view == ViewState::Compose && self.compose.model == self.catalogs.default_model
            {
                self.compose.model = next.default_model.clone();
            }
            self.catalogs = next;
            self.dirty = true;
        }
    }
}
