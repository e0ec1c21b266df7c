use url::Url;

use crate::proposal::GenerateRequest;

/// Editable fields of the compose form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    ProspectName,
    ProspectUrl,
    PainPoints,
    Model,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposeForm {
    pub prospect_name: String,
    pub prospect_url: String,
    pub pain_points: String,
    /// Agent model key; empty means the service default.
    pub model: String,
    /// Proposal template key; empty means the service default.
    pub template: String,
    pub deep_scrape: bool,
}

impl ComposeForm {
    pub(crate) fn apply_edit(&mut self, field: ComposeField, value: String) {
        match field {
            ComposeField::ProspectName => self.prospect_name = value,
            ComposeField::ProspectUrl => self.prospect_url = value,
            ComposeField::PainPoints => self.pain_points = value,
            ComposeField::Model => self.model = value,
            ComposeField::Template => self.template = value,
        }
    }

    /// Validates the form and assembles the generation request.
    pub(crate) fn build_request(&self) -> Result<GenerateRequest, String> {
        let prospect_name = self.prospect_name.trim();
        if prospect_name.is_empty() {
            return Err("prospect name is required".to_string());
        }
        let prospect_url = validate_prospect_url(&self.prospect_url)?;

        let optional = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        Ok(GenerateRequest {
            prospect_name: prospect_name.to_string(),
            prospect_url,
            pain_points: self.pain_points.trim().to_string(),
            model: optional(&self.model),
            template: optional(&self.template),
            deep_scrape: self.deep_scrape.then_some(true),
        })
    }
}

/// Accepts scheme-less input ("acme.com") by assuming https, but rejects
/// anything that does not parse to a host-bearing URL.
fn validate_prospect_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("prospect URL is required".to_string());
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    match Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(trimmed.to_string()),
        _ => Err(format!("'{trimmed}' is not a valid prospect URL")),
    }
}
