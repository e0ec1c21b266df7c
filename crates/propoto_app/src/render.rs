//! Plain-text projection of the view model onto the console. Deliberately
//! minimal; it exists to exercise the view model, not to be a UI.

use propoto_core::{
    AppViewModel, EpochMs, ProposalStatus, ResultViewModel, StatusFilter, ViewState,
};

use crate::config::AppConfig;

pub fn welcome(config: &AppConfig) -> String {
    let store = match &config.store_url {
        Some(url) => url.clone(),
        None => "in-memory demo store".to_string(),
    };
    format!(
        "propoto shell | org {} | agent {} | store {}\ntype 'help' for commands",
        config.org_id, config.agent_url, store
    )
}

pub fn help() -> String {
    [
        "commands:",
        "  list view:    new | open <n> | filter all|draft|sent | search [text]",
        "  compose view: name <text> | url <text> | pain <text> | model <key> |",
        "                template <key> | deep | submit | back",
        "  result view:  status | edit <summary|situation|strategy|why|next> <text> |",
        "                copy | download | email | back",
        "  anywhere:     help | quit",
    ]
    .join("\n")
}

pub fn render(view: &AppViewModel, now: EpochMs) -> String {
    match view.view {
        ViewState::List => render_list(view, now),
        ViewState::Compose => render_compose(view),
        ViewState::Result => match &view.result {
            Some(result) => render_result(result),
            None => render_list(view, now),
        },
    }
}

fn render_list(view: &AppViewModel, now: EpochMs) -> String {
    let mut out = format!(
        "\nProposals | total {} | sent {} | close rate {}%\n",
        view.metrics.total, view.metrics.sent, view.metrics.close_rate_pct
    );
    let filter = match view.status_filter {
        StatusFilter::All => "all",
        StatusFilter::Draft => "draft",
        StatusFilter::Sent => "sent",
    };
    if view.search.is_empty() {
        out.push_str(&format!("filter: {filter}\n"));
    } else {
        out.push_str(&format!("filter: {filter} | search: '{}'\n", view.search));
    }

    if view.rows.is_empty() {
        out.push_str("  no proposals match the current filters\n");
    }
    for (index, row) in view.rows.iter().enumerate() {
        let badge = match row.status {
            ProposalStatus::Sent => "sent ",
            ProposalStatus::Draft => "draft",
        };
        out.push_str(&format!(
            "  {:>2}. [{badge}] {} | {} | {}\n",
            index + 1,
            row.prospect_name,
            row.prospect_url,
            format_age(row.created_at, now)
        ));
    }
    if view.filtered_count > view.rows.len() {
        out.push_str(&format!(
            "  ... and {} more\n",
            view.filtered_count - view.rows.len()
        ));
    }
    out
}

fn render_compose(view: &AppViewModel) -> String {
    let compose = &view.compose;
    let mut out = String::from("\nCompose a new proposal\n");
    out.push_str(&format!("  name:     {}\n", compose.form.prospect_name));
    out.push_str(&format!("  url:      {}\n", compose.form.prospect_url));
    out.push_str(&format!("  pain:     {}\n", compose.form.pain_points));
    out.push_str(&format!("  model:    {}\n", compose.form.model));
    out.push_str(&format!("  template: {}\n", compose.form.template));
    out.push_str(&format!("  deep scrape: {}\n", compose.form.deep_scrape));

    if !compose.models.is_empty() {
        let keys: Vec<_> = compose.models.iter().map(|model| model.key.as_str()).collect();
        out.push_str(&format!(
            "  models: {} (default {})\n",
            keys.join(", "),
            compose.default_model
        ));
    }
    if !compose.templates.is_empty() {
        let keys: Vec<_> = compose
            .templates
            .iter()
            .map(|template| template.key.as_str())
            .collect();
        out.push_str(&format!("  templates: {}\n", keys.join(", ")));
    }

    if compose.generating {
        out.push_str("  generating...\n");
    }
    if let Some(error) = &compose.error {
        out.push_str(&format!("  error: {error}\n"));
    }
    out
}

fn render_result(result: &ResultViewModel) -> String {
    let mut out = String::from("\n");
    out.push_str(&propoto_engine::render_markdown(&result.result));
    out.push('\n');
    match &result.bound {
        Some(id) => {
            let download = if result.download_available {
                "download available"
            } else {
                "no artifacts"
            };
            out.push_str(&format!("[record {id} | {download}]\n"));
        }
        None => {
            out.push_str("[syncing... not yet saved; editing and export disabled]\n");
        }
    }
    out
}

fn format_age(created_at: EpochMs, now: EpochMs) -> String {
    const DAY_MS: EpochMs = 24 * 60 * 60 * 1000;
    let days = now.saturating_sub(created_at) / DAY_MS;
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => chrono::DateTime::from_timestamp_millis(created_at as i64)
            .map(|datetime| datetime.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format!("{days} days ago")),
    }
}
