use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use propoto_core::{Effect, EpochMs, Msg, ResultView};
use propoto_engine::{AtomicFileWriter, EngineEvent, EngineHandle};
use propoto_logging::{propoto_error, propoto_info, propoto_warn};

use crate::config::AppConfig;
use crate::persistence;

pub struct EffectRunner {
    engine: EngineHandle,
    writer: AtomicFileWriter,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (engine, events) = EngineHandle::new(config.engine_config());
        engine.refresh_catalogs();
        spawn_event_loop(events, msg_tx, config.output_dir.clone());
        Self {
            engine,
            writer: AtomicFileWriter::new(config.output_dir.clone()),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate { seq, request } => {
                    propoto_info!(
                        "Generate seq={} prospect={} url={}",
                        seq,
                        request.prospect_name,
                        request.prospect_url
                    );
                    self.engine.generate(seq, request);
                }
                Effect::PersistProposal(new) => self.engine.persist(new),
                Effect::UpdateContent { id, content } => self.engine.update_content(id, content),
                Effect::UpdateStatus { id, status } => self.engine.update_status(id, status),
                Effect::TrackExport { id, kind } => self.engine.track_export(id, kind),
                Effect::SaveLocalCopy { result } => self.save_local_copy(&result),
            }
        }
    }

    fn save_local_copy(&self, result: &ResultView) {
        let document = propoto_engine::render_markdown(result);
        let filename = propoto_engine::proposal_filename(&result.prospect_name);
        match self.writer.write(&filename, &document) {
            Ok(path) => println!("saved a copy to {}", path.display()),
            Err(err) => propoto_error!("failed to save proposal copy: {err}"),
        }
    }
}

/// Pumps engine events into the message channel, stamping generation
/// completions with the wall clock the reconciler will match against.
fn spawn_event_loop(
    events: mpsc::Receiver<EngineEvent>,
    msg_tx: mpsc::Sender<Msg>,
    output_dir: PathBuf,
) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            let msg = match event {
                EngineEvent::Snapshot(records) => Msg::SnapshotArrived(records),
                EngineEvent::GenerationFinished { seq, result } => match result {
                    Ok(response) => Msg::GenerationSucceeded {
                        seq,
                        response,
                        generated_at: now_ms(),
                    },
                    Err(err) => {
                        propoto_warn!("generation seq={seq} failed: {err}");
                        Msg::GenerationFailed {
                            seq,
                            message: err.to_string(),
                        }
                    }
                },
                EngineEvent::CatalogsFetched {
                    models,
                    templates,
                    default_model,
                } => {
                    persistence::save_catalogs(&output_dir, &models, &templates, &default_model);
                    Msg::CatalogsLoaded {
                        models,
                        templates,
                        default_model,
                    }
                }
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

pub fn now_ms() -> EpochMs {
    Utc::now().timestamp_millis().max(0) as EpochMs
}
