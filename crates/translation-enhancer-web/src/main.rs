//! Translation Enhancer Web - browser front end for translating, scoring and speaking sentences.

mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use translation_enhancer_core::{AppConfig, ConfigOverrides};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "translation-enhancer-web")]
#[command(author, version, about = "Translation Enhancer Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model hub base URL
    #[arg(long, env = "HF_HUB_URL")]
    hub_url: Option<String>,

    /// Inference API base URL
    #[arg(long, env = "HF_INFERENCE_URL")]
    inference_url: Option<String>,

    /// Access token for the hub and inference API
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// BLEURT scoring endpoint
    #[arg(long, env = "BLEURT_ENDPOINT")]
    scorer_endpoint: Option<String>,

    /// Disable speech output
    #[arg(long)]
    no_speech: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hub_url: self.hub_url.clone(),
            inference_url: self.inference_url.clone(),
            api_token: self.token.clone(),
            scorer_endpoint: self.scorer_endpoint.clone(),
        }
    }

    fn load_config(&self) -> Result<AppConfig> {
        let mut config = if let Some(config_path) = &self.config {
            AppConfig::from_file(config_path).context("Failed to load config file")?
        } else {
            AppConfig::load()
        };

        config.apply_overrides(self.overrides());
        if self.no_speech {
            config.speech.enabled = false;
        }

        Ok(config)
    }
}

/// Build the router with all routes and middleware
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::index))
        // API endpoints - HTML fragments (HTMX)
        .route("/api/targets", get(routes::targets))
        .route("/api/translate", post(routes::translate))
        .route("/api/speak", post(routes::speak))
        // Middleware
        // Cache-Control for HTML fragments - prevents bfcache issues with HTMX
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = args.load_config()?;
    let state = Arc::new(
        AppState::new(&config).context("Failed to initialize application state")?,
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use translation_enhancer_core::{
        Error, LoadError, LoadedModel, ModelId, ModelStore, ScorerService, SilentSpeech,
        TranslationEnhancer, model::ModelStoreInfo,
    };

    struct ReverseModel(ModelId);

    #[async_trait]
    impl LoadedModel for ReverseModel {
        fn id(&self) -> &ModelId {
            &self.0
        }

        async fn generate(&self, text: &str) -> translation_enhancer_core::Result<String> {
            Ok(text.chars().rev().collect())
        }
    }

    /// Publishes only English → French
    struct OneModelStore;

    #[async_trait]
    impl ModelStore for OneModelStore {
        fn info(&self) -> ModelStoreInfo {
            ModelStoreInfo { name: "one" }
        }

        async fn load(&self, id: &ModelId) -> Result<Arc<dyn LoadedModel>, LoadError> {
            if id.as_str().ends_with("-en-fr") {
                Ok(Arc::new(ReverseModel(id.clone())))
            } else {
                Err(LoadError::NotFound(id.clone()))
            }
        }
    }

    struct ConstScorer(Option<f64>);

    #[async_trait]
    impl ScorerService for ConstScorer {
        fn name(&self) -> &'static str {
            "const"
        }

        async fn score_batch(
            &self,
            _references: &[String],
            _candidates: &[String],
        ) -> translation_enhancer_core::Result<Vec<f64>> {
            self.0
                .map(|s| vec![s])
                .ok_or_else(|| Error::ScoringUnavailable("offline".to_string()))
        }
    }

    fn test_app(score: Option<f64>) -> Router {
        let enhancer = TranslationEnhancer::with_components(
            &AppConfig::default(),
            Arc::new(OneModelStore),
            Arc::new(ConstScorer(score)),
            Arc::new(SilentSpeech),
        )
        .unwrap();
        app(Arc::new(AppState::with_enhancer(enhancer)))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_flags_become_overrides() {
        let args = Args::try_parse_from([
            "translation-enhancer-web",
            "--scorer-endpoint",
            "http://scorer:9000/score",
            "--inference-url",
            "http://inference.local",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_overrides(args.overrides());
        assert_eq!(config.scorer.endpoint, "http://scorer:9000/score");
        assert_eq!(config.model_store.inference_url, "http://inference.local");
    }

    #[tokio::test]
    async fn test_index_defaults_to_english() {
        let response = test_app(Some(0.5))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains(r#"<option value="English" selected>English</option>"#));
        assert!(html.contains(r#"<option value="Tamil">Tamil</option>"#));
    }

    #[tokio::test]
    async fn test_targets_exclude_source() {
        let response = test_app(Some(0.5))
            .oneshot(
                Request::get("/api/targets?source=Hindi")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_text(response).await;
        assert!(!html.contains(r#"value="Hindi""#));
        assert!(html.contains(r#"value="English""#));
    }

    #[tokio::test]
    async fn test_translate_renders_score() {
        let response = test_app(Some(0.6543))
            .oneshot(form_post(
                "/api/translate",
                "text=abc&source=English&target=French",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("cba"));
        assert!(html.contains("0.654"));
        assert!(html.contains("score-good"));
    }

    #[tokio::test]
    async fn test_translate_missing_input() {
        let response = test_app(Some(0.5))
            .oneshot(form_post("/api/translate", "text=&source=English&target=French"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Missing input."));
    }

    #[tokio::test]
    async fn test_translate_unavailable_model() {
        let response = test_app(Some(0.5))
            .oneshot(form_post(
                "/api/translate",
                "text=hello&source=Tamil&target=Telugu",
            ))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("not available."));
    }

    #[tokio::test]
    async fn test_scoring_failure_is_not_a_500() {
        let response = test_app(None)
            .oneshot(form_post(
                "/api/translate",
                "text=abc&source=English&target=French",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("quality scorer unavailable"));
    }

    #[tokio::test]
    async fn test_speak_reports_playing() {
        let response = test_app(Some(0.5))
            .oneshot(form_post("/api/speak", "text=Bonjour"))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Playing..."));

        let response = test_app(Some(0.5))
            .oneshot(form_post("/api/speak", "text="))
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Nothing to play."));
    }
}
