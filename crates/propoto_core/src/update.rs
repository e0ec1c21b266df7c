use crate::{AppState, Effect, ExportKind, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ComposeStarted => {
            state.start_compose();
            Vec::new()
        }
        Msg::ComposeFieldEdited { field, value } => {
            state.edit_compose_field(field, value);
            Vec::new()
        }
        Msg::DeepScrapeToggled => {
            state.toggle_deep_scrape();
            Vec::new()
        }
        Msg::ComposeSubmitted => match state.submit_compose() {
            Some((seq, request)) => vec![Effect::Generate { seq, request }],
            None => Vec::new(),
        },
        Msg::GenerationSucceeded {
            seq,
            response,
            generated_at,
        } => match state.complete_generation(seq, response, generated_at) {
            Some(new_proposal) => vec![Effect::PersistProposal(new_proposal)],
            None => Vec::new(),
        },
        Msg::GenerationFailed { seq, message } => {
            state.fail_generation(seq, message);
            Vec::new()
        }
        Msg::SnapshotArrived(records) => {
            state.apply_snapshot(records);
            state.reconcile_pending();
            Vec::new()
        }
        Msg::ProposalSelected { id } => {
            state.select_record(&id);
            Vec::new()
        }
        Msg::ResetToList => {
            state.reset();
            Vec::new()
        }
        Msg::StatusFilterChanged(filter) => {
            state.set_status_filter(filter);
            Vec::new()
        }
        Msg::SearchChanged(search) => {
            state.set_search(search);
            Vec::new()
        }
        Msg::ContentEdited {
            content,
            updated_at,
        } => match state.apply_content_edit(&content, updated_at) {
            Some(id) => vec![Effect::UpdateContent { id, content }],
            None => Vec::new(),
        },
        Msg::StatusToggled { updated_at } => match state.toggle_status(updated_at) {
            Some((id, status)) => vec![Effect::UpdateStatus { id, status }],
            None => Vec::new(),
        },
        Msg::DownloadRequested => match state.download_target() {
            Some((id, kind)) => vec![Effect::TrackExport { id, kind }],
            None => Vec::new(),
        },
        Msg::EmailExportRequested => match state.email_export_target() {
            Some(id) => vec![Effect::TrackExport {
                id,
                kind: ExportKind::Email,
            }],
            None => Vec::new(),
        },
        Msg::CopyRequested => match state.displayed_result() {
            Some(result) => vec![Effect::SaveLocalCopy {
                result: result.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CatalogsLoaded {
            models,
            templates,
            default_model,
        } => {
            state.set_catalogs(models, templates, default_model);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
