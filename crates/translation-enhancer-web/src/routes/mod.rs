//! HTTP route handlers for the translation enhancer web application.
//!
//! All routes return HTML, either the full page or fragments for HTMX.
//! Templates come from the `templates` module.

mod pages;
mod speak;
mod translate;

pub use pages::index;
pub use speak::speak;
pub use translate::{targets, translate};

use serde::Deserialize as SerdeDeserialize;

/// Query params for the target language list.
#[derive(SerdeDeserialize, Default)]
pub struct TargetsQuery {
    #[serde(default)]
    pub source: Option<String>,
}

/// Form data for translation.
///
/// Fields are optional so that an incomplete form reaches the pipeline and
/// comes back as "Missing input." rather than a 422.
#[derive(SerdeDeserialize, Default)]
pub struct TranslateForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

/// Form data for speech output.
#[derive(SerdeDeserialize, Default)]
pub struct SpeakForm {
    #[serde(default)]
    pub text: String,
}
