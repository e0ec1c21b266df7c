//! Propoto core: pure dashboard state machine and view-model helpers.
mod compose;
mod effect;
mod msg;
mod proposal;
mod reconcile;
mod state;
mod update;
mod view_model;

pub use compose::{ComposeField, ComposeForm};
pub use effect::Effect;
pub use msg::Msg;
pub use proposal::{
    EpochMs, ExportKind, GenerateRequest, GenerateResponse, ModelOption, NewProposal,
    PricingTier, ProposalContent, ProposalId, ProposalRecord, ProposalStatus, TemplateOption,
};
pub use reconcile::{find_match, PendingMatch, MATCH_WINDOW_MS};
pub use state::{AppState, ResultFocus, ResultView, StatusFilter, ViewState};
pub use update::update;
pub use view_model::{
    AppViewModel, ComposeView, PipelineMetrics, ProposalRowView, ResultViewModel,
    VISIBLE_PROPOSALS_CAP,
};
