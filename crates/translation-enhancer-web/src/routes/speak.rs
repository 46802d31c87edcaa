//! Speech route.

use axum::extract::{Form, State};
use std::sync::Arc;

use super::SpeakForm;
use crate::state::AppState;
use crate::templates::SpeakingTemplate;

/// Read the current translation aloud.
///
/// HTMX: Replaces `#speech-status`. Playback runs in the background so the
/// page stays responsive.
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SpeakForm>,
) -> SpeakingTemplate {
    if form.text.is_empty() {
        return SpeakingTemplate::nothing_to_say();
    }

    state.speak_in_background(form.text);
    SpeakingTemplate::playing()
}
