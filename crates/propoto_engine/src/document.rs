use propoto_core::{EpochMs, ResultView};

/// Renders the displayed proposal as a standalone markdown document with a
/// small frontmatter header, section per section, tiers last before the
/// closing next-steps block.
pub fn render_markdown(result: &ResultView) -> String {
    let mut doc = format!(
        "---\nprospect: {name}\nurl: {url}\nstatus: {status}\ncreated_utc: {created}\nupdated_utc: {updated}\n---\n\n# Proposal for {name}\n",
        name = result.prospect_name,
        url = result.prospect_url,
        status = result.status,
        created = format_utc(result.created_at),
        updated = format_utc(result.updated_at),
    );

    let sections = [
        ("Executive Summary", &result.content.executive_summary),
        ("Current Situation", &result.content.current_situation),
        ("Proposed Strategy", &result.content.proposed_strategy),
        ("Why Us", &result.content.why_us),
    ];
    for (title, body) in sections {
        if !body.is_empty() {
            doc.push_str(&format!("\n## {title}\n\n{body}\n"));
        }
    }

    if !result.content.investment.is_empty() {
        doc.push_str("\n## Investment\n");
        for tier in &result.content.investment {
            doc.push_str(&format!("\n### {} ({})\n\n", tier.name, tier.price));
            for feature in &tier.features {
                doc.push_str(&format!("- {feature}\n"));
            }
        }
    }

    if !result.content.next_steps.is_empty() {
        doc.push_str(&format!("\n## Next Steps\n\n{}\n", result.content.next_steps));
    }

    doc
}

fn format_utc(timestamp: EpochMs) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp as i64)
        .map(|datetime| datetime.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}
