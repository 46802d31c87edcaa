//! Askama templates for HTMX responses.
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS and the HTMX script
//! - `index.html` - The translator page
//! - `partials/` - Fragments swapped in by HTMX (target options, result, speech status)

use askama::Template;
use askama_web::WebTemplate;
use translation_enhancer_core::{QualityScore, ScoreBand, TranslationEnhancer, TranslationResult};

/// Entry of the source language dropdown
pub struct LanguageOption {
    pub name: String,
    pub selected: bool,
}

/// One row of the score legend
pub struct LegendRow {
    pub range: &'static str,
    pub description: &'static str,
    pub css_class: &'static str,
}

fn legend_rows() -> Vec<LegendRow> {
    ScoreBand::ALL
        .into_iter()
        .map(|band| LegendRow {
            range: band.range_label(),
            description: band.description(),
            css_class: band.css_class(),
        })
        .collect()
}

// =============================================================================
// Full Page Templates
// =============================================================================

/// Translator page with language pickers, text box and legend.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub languages: Vec<LanguageOption>,
    pub targets: Vec<String>,
    pub legend: Vec<LegendRow>,
}

impl IndexTemplate {
    pub fn new(enhancer: &TranslationEnhancer) -> Self {
        let default_source = enhancer.default_source();
        Self {
            languages: enhancer
                .languages()
                .iter()
                .map(|l| LanguageOption {
                    name: l.name.clone(),
                    selected: l.name == default_source,
                })
                .collect(),
            targets: owned(enhancer.valid_targets(default_source)),
            legend: legend_rows(),
        }
    }
}

// =============================================================================
// Fragment Templates (HTMX partial responses)
// =============================================================================

/// `<option>` list for the target dropdown, with nothing selected.
#[derive(Template, WebTemplate)]
#[template(path = "partials/target_options.html")]
pub struct TargetOptionsTemplate {
    pub targets: Vec<String>,
}

impl TargetOptionsTemplate {
    pub fn new(targets: Vec<&str>) -> Self {
        Self {
            targets: owned(targets),
        }
    }
}

/// Translation output and score label.
///
/// On failure the translation box is empty and `message` holds the reason.
#[derive(Template, WebTemplate)]
#[template(path = "partials/result.html")]
pub struct ResultTemplate {
    pub translated_text: String,
    pub score: Option<f64>,
    pub band_label: &'static str,
    pub band_class: &'static str,
    pub message: String,
}

impl From<TranslationResult> for ResultTemplate {
    fn from(result: TranslationResult) -> Self {
        let band = result.quality.band();
        let (score, message) = match result.quality {
            QualityScore::Score(score) => (Some(score), String::new()),
            QualityScore::Unavailable(message) => (None, message),
        };

        Self {
            translated_text: result.translated_text,
            score,
            band_label: band.map_or("", ScoreBand::description),
            band_class: band.map_or("score-unavailable", ScoreBand::css_class),
            message,
        }
    }
}

/// Status line shown while speech plays.
#[derive(Template, WebTemplate)]
#[template(path = "partials/speaking.html")]
pub struct SpeakingTemplate {
    pub message: &'static str,
}

impl SpeakingTemplate {
    pub const fn playing() -> Self {
        Self {
            message: "🔊 Playing...",
        }
    }

    pub const fn nothing_to_say() -> Self {
        Self {
            message: "Nothing to play.",
        }
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}
