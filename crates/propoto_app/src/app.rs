use std::io::BufRead;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use propoto_core::{update, AppState, AppViewModel, ComposeField, Msg, StatusFilter};
use propoto_logging::propoto_info;

use crate::config::AppConfig;
use crate::effects::{now_ms, EffectRunner};
use crate::persistence;
use crate::render;

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(&config, msg_tx);
    let mut state = AppState::new();
    let mut dispatch_seq: u64 = 0;

    // Seed the composer options from the cache; the live fetch replaces them.
    if let Some((models, templates, default_model)) = persistence::load_catalogs(&config.output_dir)
    {
        dispatch(
            &mut state,
            &runner,
            &mut dispatch_seq,
            Msg::CatalogsLoaded {
                models,
                templates,
                default_model,
            },
        );
    }

    let line_rx = spawn_stdin_reader();
    println!("{}", render::welcome(&config));
    println!("{}", render::render(&state.view(), now_ms()));
    let _ = state.consume_dirty();

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            dispatch(&mut state, &runner, &mut dispatch_seq, msg);
        }

        match line_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                } else if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("q")
                {
                    break;
                } else if trimmed.eq_ignore_ascii_case("help") || trimmed == "?" {
                    println!("{}", render::help());
                } else {
                    match parse_command(&state.view(), trimmed, now_ms()) {
                        Some(msgs) => {
                            for msg in msgs {
                                dispatch(&mut state, &runner, &mut dispatch_seq, msg);
                            }
                        }
                        None => println!("unrecognized command; type 'help'"),
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if state.consume_dirty() {
            println!("{}", render::render(&state.view(), now_ms()));
        }
    }

    propoto_info!("propoto shell exiting");
    Ok(())
}

fn dispatch(state: &mut AppState, runner: &EffectRunner, seq: &mut u64, msg: Msg) {
    *seq += 1;
    propoto_logging::set_dispatch_seq(*seq);
    let current = std::mem::take(state);
    let (next, effects) = update(current, msg);
    *state = next;
    runner.enqueue(effects);
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

/// Translates a console command into messages against the current view.
/// `None` means the input was not understood.
fn parse_command(view: &AppViewModel, line: &str, now: u64) -> Option<Vec<Msg>> {
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "new" | "compose" => Some(vec![Msg::ComposeStarted]),
        "back" | "list" => Some(vec![Msg::ResetToList]),
        "open" => {
            let row = rest
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| view.rows.get(index))?;
            Some(vec![Msg::ProposalSelected {
                id: row.id.clone(),
            }])
        }
        "filter" => {
            let filter = match rest.to_ascii_lowercase().as_str() {
                "all" => StatusFilter::All,
                "draft" | "drafts" => StatusFilter::Draft,
                "sent" => StatusFilter::Sent,
                _ => return None,
            };
            Some(vec![Msg::StatusFilterChanged(filter)])
        }
        "search" => Some(vec![Msg::SearchChanged(rest.to_string())]),
        "name" => Some(vec![edit_field(ComposeField::ProspectName, rest)]),
        "url" => Some(vec![edit_field(ComposeField::ProspectUrl, rest)]),
        "pain" => Some(vec![edit_field(ComposeField::PainPoints, rest)]),
        "model" => Some(vec![edit_field(ComposeField::Model, rest)]),
        "template" => Some(vec![edit_field(ComposeField::Template, rest)]),
        "deep" => Some(vec![Msg::DeepScrapeToggled]),
        "submit" | "go" => Some(vec![Msg::ComposeSubmitted]),
        "status" => Some(vec![Msg::StatusToggled { updated_at: now }]),
        "copy" | "save" => Some(vec![Msg::CopyRequested]),
        "download" => Some(vec![Msg::DownloadRequested]),
        "email" => Some(vec![Msg::EmailExportRequested]),
        "edit" => parse_edit(view, rest, now),
        _ => None,
    }
}

fn edit_field(field: ComposeField, value: &str) -> Msg {
    Msg::ComposeFieldEdited {
        field,
        value: value.to_string(),
    }
}

/// `edit <section> <text>` replaces one section of the displayed proposal.
fn parse_edit(view: &AppViewModel, rest: &str, now: u64) -> Option<Vec<Msg>> {
    let (section, text) = rest.split_once(' ')?;
    let result = view.result.as_ref()?;
    if !result.editing_enabled {
        println!("editing is disabled until the proposal is saved");
        return Some(Vec::new());
    }

    let mut content = result.result.content.clone();
    let target = match section.to_ascii_lowercase().as_str() {
        "summary" => &mut content.executive_summary,
        "situation" => &mut content.current_situation,
        "strategy" => &mut content.proposed_strategy,
        "why" => &mut content.why_us,
        "next" => &mut content.next_steps,
        _ => return None,
    };
    *target = text.trim().to_string();

    Some(vec![Msg::ContentEdited {
        content,
        updated_at: now,
    }])
}
