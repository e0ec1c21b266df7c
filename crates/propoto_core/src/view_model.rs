use crate::compose::ComposeForm;
use crate::proposal::{
    EpochMs, ModelOption, ProposalId, ProposalRecord, ProposalStatus, TemplateOption,
};
use crate::state::{ResultView, StatusFilter, ViewState};

/// Display-only truncation of the proposal list; not a query-level limit.
pub const VISIBLE_PROPOSALS_CAP: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineMetrics {
    pub total: usize,
    pub sent: usize,
    /// Percentage of proposals marked sent, rounded; 0 when empty.
    pub close_rate_pct: u8,
}

impl PipelineMetrics {
    fn from_records(records: &[ProposalRecord]) -> Self {
        let total = records.len();
        let sent = records
            .iter()
            .filter(|record| record.status == ProposalStatus::Sent)
            .count();
        let close_rate_pct = if total > 0 {
            ((sent as f64 / total as f64) * 100.0).round() as u8
        } else {
            0
        };
        Self {
            total,
            sent,
            close_rate_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalRowView {
    pub id: ProposalId,
    pub prospect_name: String,
    pub prospect_url: String,
    pub status: ProposalStatus,
    pub created_at: EpochMs,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposeView {
    pub form: ComposeForm,
    pub error: Option<String>,
    pub generating: bool,
    pub models: Vec<ModelOption>,
    pub templates: Vec<TemplateOption>,
    pub default_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultViewModel {
    pub result: ResultView,
    /// The persisted record the result is confirmed to correspond to, once
    /// reconciliation has succeeded.
    pub bound: Option<ProposalId>,
    /// True while provisional: generated but not yet matched to a record.
    pub syncing: bool,
    pub editing_enabled: bool,
    pub download_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view: ViewState,
    pub metrics: PipelineMetrics,
    pub status_filter: StatusFilter,
    pub search: String,
    /// Filtered rows, newest first, capped at [`VISIBLE_PROPOSALS_CAP`].
    pub rows: Vec<ProposalRowView>,
    /// Size of the filtered set before the display cap.
    pub filtered_count: usize,
    pub compose: ComposeView,
    pub result: Option<ResultViewModel>,
}

impl AppViewModel {
    pub(crate) fn assemble(
        view: ViewState,
        records: &[ProposalRecord],
        filtered: Vec<&ProposalRecord>,
        status_filter: StatusFilter,
        search: String,
        compose: ComposeView,
        result: Option<ResultViewModel>,
    ) -> Self {
        let rows = filtered
            .iter()
            .take(VISIBLE_PROPOSALS_CAP)
            .map(|record| ProposalRowView {
                id: record.id.clone(),
                prospect_name: record.prospect_name.clone(),
                prospect_url: record.prospect_url.clone(),
                status: record.status,
                created_at: record.created_at,
            })
            .collect();
        Self {
            view,
            metrics: PipelineMetrics::from_records(records),
            status_filter,
            search,
            rows,
            filtered_count: filtered.len(),
            compose,
            result,
        }
    }
}

/// A record is shown iff it passes the status filter and, when a search text
/// is set, its prospect name or URL contains the text case-insensitively.
pub(crate) fn filter_proposals<'a>(
    records: &'a [ProposalRecord],
    status_filter: StatusFilter,
    search: &str,
) -> Vec<&'a ProposalRecord> {
    let query = search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            let matches_status = status_filter.matches(record.status);
            let matches_query = query.is_empty()
                || record.prospect_name.to_lowercase().contains(&query)
                || record.prospect_url.to_lowercase().contains(&query);
            matches_status && matches_query
        })
        .collect()
}
