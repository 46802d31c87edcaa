//! Translation routes - target list and translate.

use axum::extract::{Form, Query, State};
use std::sync::Arc;
use tracing::{debug, error};
use translation_enhancer_core::{TranslationRequest, TranslationResult};

use super::{TargetsQuery, TranslateForm};
use crate::state::AppState;
use crate::templates::{ResultTemplate, TargetOptionsTemplate};

/// Target `<option>` list for the selected source language.
///
/// HTMX: Replaces the contents of `#target`, clearing the selection.
pub async fn targets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TargetsQuery>,
) -> TargetOptionsTemplate {
    let source = query.source.unwrap_or_default();
    debug!("targets: source={}", source);
    TargetOptionsTemplate::new(state.enhancer().valid_targets(&source))
}

/// Translate the submitted text - returns the result fragment.
///
/// HTMX: Replaces `#result`. Pipeline failures are rendered as the score
/// message, so this route always answers 200.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TranslateForm>,
) -> ResultTemplate {
    let request = TranslationRequest {
        text: form.text,
        source: form.source,
        target: form.target,
    };

    let result = state.enhancer().translate(&request).await.unwrap_or_else(|e| {
        error!("Translation failed: {}", e);
        TranslationResult::from(e)
    });

    ResultTemplate::from(result)
}
