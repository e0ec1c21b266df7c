//! Matches a freshly generated (not yet persisted) proposal against records
//! arriving from the store subscription.
//!
//! The generation call and the persistence write are independent network
//! calls with no shared correlation token, so the only way to recognize "our"
//! record in a snapshot is business-key equality plus recency.

use crate::proposal::{EpochMs, ProposalRecord};

/// Maximum distance between a record's creation time and the generation
/// completion time for the record to be accepted as the generated proposal.
pub const MATCH_WINDOW_MS: EpochMs = 5 * 60 * 1000;

/// A generated proposal that has not yet been matched to a persisted record.
///
/// Created the instant a generation call succeeds; destroyed when a matching
/// record is found or the result view is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMatch {
    pub prospect_name: String,
    pub prospect_url: String,
    /// Empty when the request carried no pain points; an empty value does not
    /// constrain matching.
    pub pain_points: String,
    pub generated_at: EpochMs,
}

/// Picks the persisted record corresponding to `pending`, if any.
///
/// Candidates must match the prospect identity exactly. Among candidates the
/// newest wins (ties: last in iteration order), and the winner is accepted
/// only when its creation time lies within [`MATCH_WINDOW_MS`] of the
/// generation time. Returns `None` otherwise; callers re-run on the next
/// snapshot.
pub fn find_match<'a>(
    records: &'a [ProposalRecord],
    pending: &PendingMatch,
) -> Option<&'a ProposalRecord> {
    let latest = records
        .iter()
        .filter(|record| is_candidate(record, pending))
        .max_by_key(|record| record.created_at)?;

    if latest.created_at.abs_diff(pending.generated_at) < MATCH_WINDOW_MS {
        Some(latest)
    } else {
        None
    }
}

fn is_candidate(record: &ProposalRecord, pending: &PendingMatch) -> bool {
    record.prospect_name == pending.prospect_name
        && record.prospect_url == pending.prospect_url
        && (pending.pain_points.is_empty() || record.pain_points == pending.pain_points)
}
