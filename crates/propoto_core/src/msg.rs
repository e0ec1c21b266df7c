use crate::compose::ComposeField;
use crate::proposal::{
    EpochMs, GenerateResponse, ModelOption, ProposalContent, ProposalId, ProposalRecord,
    TemplateOption,
};
use crate::state::StatusFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User opened the composer for a fresh draft.
    ComposeStarted,
    /// User edited a compose form field.
    ComposeFieldEdited { field: ComposeField, value: String },
    /// User toggled the deep-scrape option.
    DeepScrapeToggled,
    /// User submitted the compose form for generation.
    ComposeSubmitted,
    /// The generation call resolved successfully.
    GenerationSucceeded {
        seq: u64,
        response: GenerateResponse,
        generated_at: EpochMs,
    },
    /// The generation call failed.
    GenerationFailed { seq: u64, message: String },
    /// The store subscription delivered the current full proposal list.
    SnapshotArrived(Vec<ProposalRecord>),
    /// User selected an existing proposal from the list.
    ProposalSelected { id: ProposalId },
    /// User navigated back to the list view.
    ResetToList,
    /// User changed the list status filter.
    StatusFilterChanged(StatusFilter),
    /// User changed the list search text.
    SearchChanged(String),
    /// User committed an edit to the displayed proposal body.
    ContentEdited {
        content: ProposalContent,
        updated_at: EpochMs,
    },
    /// User toggled the draft/sent status of the displayed proposal.
    StatusToggled { updated_at: EpochMs },
    /// User requested the PDF/PPTX artifact download.
    DownloadRequested,
    /// User requested the email export.
    EmailExportRequested,
    /// User requested a local copy of the displayed proposal.
    CopyRequested,
    /// Model and template catalogs became available (fetch or cache).
    CatalogsLoaded {
        models: Vec<ModelOption>,
        templates: Vec<TemplateOption>,
        default_model: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
