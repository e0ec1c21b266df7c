use std::fs;

use propoto_core::{PricingTier, ProposalContent, ProposalStatus, ResultView};
use propoto_engine::{
    ensure_output_dir, proposal_filename, render_markdown, AtomicFileWriter,
};
use tempfile::TempDir;

fn sample_result() -> ResultView {
    ResultView {
        prospect_name: "Acme Corp".to_string(),
        prospect_url: "acme.com".to_string(),
        pain_points: "low conversion".to_string(),
        content: ProposalContent {
            executive_summary: "We can double the pipeline.".to_string(),
            current_situation: "Traffic is flat.".to_string(),
            proposed_strategy: "Rebuild the funnel.".to_string(),
            why_us: "Forty B2B teams shipped.".to_string(),
            investment: vec![PricingTier {
                name: "Growth".to_string(),
                price: "$4,500/mo".to_string(),
                features: vec!["Weekly sprints".to_string()],
            }],
            next_steps: "Kickoff call.".to_string(),
        },
        presentation_url: None,
        pdf_url: None,
        pptx_url: None,
        status: ProposalStatus::Draft,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
    }
}

#[test]
fn markdown_document_carries_frontmatter_and_all_sections() {
    let doc = render_markdown(&sample_result());

    assert!(doc.starts_with("---\nprospect: Acme Corp\n"));
    assert!(doc.contains("status: draft\n"));
    assert!(doc.contains("created_utc: 2023-11-14T22:13:20+00:00"));
    assert!(doc.contains("# Proposal for Acme Corp"));
    assert!(doc.contains("## Executive Summary\n\nWe can double the pipeline."));
    assert!(doc.contains("## Investment"));
    assert!(doc.contains("### Growth ($4,500/mo)"));
    assert!(doc.contains("- Weekly sprints"));
    assert!(doc.contains("## Next Steps\n\nKickoff call."));
}

#[test]
fn empty_sections_are_omitted_from_the_document() {
    let mut result = sample_result();
    result.content.why_us = String::new();
    result.content.investment.clear();

    let doc = render_markdown(&result);
    assert!(!doc.contains("## Why Us"));
    assert!(!doc.contains("## Investment"));
}

#[test]
fn filenames_are_sanitized_and_stable() {
    assert_eq!(proposal_filename("Acme Corp"), "Acme Corp.md");
    assert_eq!(proposal_filename("Acme/Corp: Intl?"), "Acme_Corp_ Intl.md");
    assert_eq!(proposal_filename("  "), "proposal.md");
    assert_eq!(proposal_filename("CON"), "CON_.md");
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_copies() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    let filename = proposal_filename("Acme Corp");

    let first = writer.write(&filename, "draft one").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "draft one");

    // Re-exporting the same prospect overwrites in place.
    let second = writer.write(&filename, "draft two").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "draft two");
}

#[test]
fn no_partial_file_is_left_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("doc.md", "data").is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}
