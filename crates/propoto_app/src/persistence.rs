use std::fs;
use std::path::Path;

use propoto_core::{ModelOption, TemplateOption};
use propoto_engine::AtomicFileWriter;
use propoto_logging::{propoto_error, propoto_info, propoto_warn};
use serde::{Deserialize, Serialize};

const CATALOG_FILENAME: &str = ".propoto_catalogs.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedModel {
    key: String,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedTemplate {
    key: String,
    name: String,
    description: String,
    tone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CatalogCache {
    models: Vec<CachedModel>,
    templates: Vec<CachedTemplate>,
    default_model: String,
}

/// Loads the cached model/template catalogs so the composer has options
/// before the first live fetch lands.
pub(crate) fn load_catalogs(
    output_dir: &Path,
) -> Option<(Vec<ModelOption>, Vec<TemplateOption>, String)> {
    let path = output_dir.join(CATALOG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            propoto_warn!("Failed to read catalog cache from {:?}: {}", path, err);
            return None;
        }
    };

    let cache: CatalogCache = match ron::from_str(&content) {
        Ok(cache) => cache,
        Err(err) => {
            propoto_warn!("Failed to parse catalog cache from {:?}: {}", path, err);
            return None;
        }
    };

    propoto_info!("Loaded catalog cache from {:?}", path);
    let models = cache
        .models
        .into_iter()
        .map(|model| ModelOption {
            key: model.key,
            name: model.name,
        })
        .collect();
    let templates = cache
        .templates
        .into_iter()
        .map(|template| TemplateOption {
            key: template.key,
            name: template.name,
            description: template.description,
            tone: template.tone,
        })
        .collect();
    Some((models, templates, cache.default_model))
}

pub(crate) fn save_catalogs(
    output_dir: &Path,
    models: &[ModelOption],
    templates: &[TemplateOption],
    default_model: &str,
) {
    let cache = CatalogCache {
        models: models
            .iter()
            .map(|model| CachedModel {
                key: model.key.clone(),
                name: model.name.clone(),
            })
            .collect(),
        templates: templates
            .iter()
            .map(|template| CachedTemplate {
                key: template.key.clone(),
                name: template.name.clone(),
                description: template.description.clone(),
                tone: template.tone.clone(),
            })
            .collect(),
        default_model: default_model.to_string(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&cache, pretty) {
        Ok(content) => content,
        Err(err) => {
            propoto_error!("Failed to serialize catalog cache: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    match writer.write(CATALOG_FILENAME, &content) {
        Ok(path) => propoto_info!("Saved catalog cache to {:?}", path),
        Err(err) => propoto_error!("Failed to save catalog cache: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn catalogs_round_trip_through_the_cache_file() {
        let temp = TempDir::new().unwrap();
        let models = vec![ModelOption {
            key: "grok".to_string(),
            name: "Grok".to_string(),
        }];
        let templates = vec![TemplateOption {
            key: "consultative".to_string(),
            name: "Consultative".to_string(),
            description: "Problem-first narrative".to_string(),
            tone: "measured".to_string(),
        }];

        save_catalogs(temp.path(), &models, &templates, "grok");
        let (loaded_models, loaded_templates, default_model) =
            load_catalogs(temp.path()).expect("cache present");

        assert_eq!(loaded_models, models);
        assert_eq!(loaded_templates, templates);
        assert_eq!(default_model, "grok");
    }

    #[test]
    fn a_missing_cache_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_catalogs(temp.path()).is_none());
    }

    #[test]
    fn a_corrupt_cache_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CATALOG_FILENAME), "not ron at all {{{").unwrap();
        assert!(load_catalogs(temp.path()).is_none());
    }
}
