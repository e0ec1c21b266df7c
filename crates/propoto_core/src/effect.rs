use crate::proposal::{
    ExportKind, GenerateRequest, NewProposal, ProposalContent, ProposalId, ProposalStatus,
};
use crate::state::ResultView;

/// Side effects requested by [`crate::update`]; executed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the agent service. `seq` ties the completion message back to this
    /// submission so stale completions can be dropped.
    Generate { seq: u64, request: GenerateRequest },
    /// Persist a freshly generated proposal. Completion is observed through
    /// the subscription snapshot, never acknowledged directly.
    PersistProposal(NewProposal),
    /// Persist an edit to a bound proposal's body.
    UpdateContent {
        id: ProposalId,
        content: ProposalContent,
    },
    /// Persist a status change of a bound proposal.
    UpdateStatus {
        id: ProposalId,
        status: ProposalStatus,
    },
    /// Record an export of a bound proposal in the audit trail.
    TrackExport { id: ProposalId, kind: ExportKind },
    /// Write a local markdown copy of the displayed proposal.
    SaveLocalCopy { result: ResultView },
}
