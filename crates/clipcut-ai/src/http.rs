//! HTTP-backed `SemanticAnalyzer`: calls out to a configured LLM-fronting
//! endpoint over `reqwest` and validates the response shape.
//!
//! The provider itself — what model answers these requests — is out of
//! scope (§1); this adapter only knows how to call it and validate what
//! comes back.

use async_trait::async_trait;
use clipcut_core::{Caption, ScriptLine};
use tracing::{debug, info};

use crate::error::{AiError, AiResult};
use crate::port::{EnrichmentResult, SemanticAnalyzer, TakeSelectionQuery, TakeSelectionResult};

#[derive(Debug, Clone, serde::Serialize)]
struct EnrichRequest<'a> {
    captions: &'a [Caption],
    script: Option<&'a [ScriptLine]>,
}

/// Configuration for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpAnalyzerConfig {
    pub base_url: String,
    pub provider_name: String,
    pub timeout: std::time::Duration,
}

impl Default for HttpAnalyzerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".to_string(),
            provider_name: "semantic-analyzer".to_string(),
            timeout: std::time::Duration::from_secs(30),
        }
    }
}

pub struct HttpSemanticAnalyzer {
    client: reqwest::Client,
    config: HttpAnalyzerConfig,
}

impl HttpSemanticAnalyzer {
    pub fn new(config: HttpAnalyzerConfig) -> AiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| AiError::Transport {
                provider: config.provider_name.clone(),
                source,
            })?;
        Ok(Self { client, config })
    }

    fn provider(&self) -> &str {
        &self.config.provider_name
    }
}

#[async_trait]
impl SemanticAnalyzer for HttpSemanticAnalyzer {
    async fn enrich_captions(
        &self,
        captions: &[Caption],
        script: Option<&[ScriptLine]>,
    ) -> AiResult<EnrichmentResult> {
        debug!(provider = self.provider(), count = captions.len(), "enrich_captions");
        let body = EnrichRequest { captions, script };
        let response = self
            .client
            .post(format!("{}/enrich", self.config.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|source| AiError::Transport {
                provider: self.provider().to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(AiError::BadStatus {
                provider: self.provider().to_string(),
                status: response.status().as_u16(),
            });
        }

        let result: EnrichmentResult =
            response
                .json()
                .await
                .map_err(|source| AiError::SchemaInvalid {
                    provider: self.provider().to_string(),
                    detail: source.to_string(),
                })?;

        if result.enriched_captions.len() != captions.len() {
            return Err(AiError::SchemaInvalid {
                provider: self.provider().to_string(),
                detail: format!(
                    "expected {} enriched captions, got {}",
                    captions.len(),
                    result.enriched_captions.len()
                ),
            });
        }

        info!(
            provider = self.provider(),
            processing_time_ms = result.metadata.processing_time_ms,
            "enrich_captions completed"
        );
        Ok(result)
    }

    async fn select_takes(&self, query: &TakeSelectionQuery) -> AiResult<TakeSelectionResult> {
        debug!(provider = self.provider(), segments = query.segments.len(), "select_takes");
        let response = self
            .client
            .post(format!("{}/select-takes", self.config.base_url))
            .json(query)
            .send()
            .await
            .map_err(|source| AiError::Transport {
                provider: self.provider().to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(AiError::BadStatus {
                provider: self.provider().to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| AiError::SchemaInvalid {
                provider: self.provider().to_string(),
                detail: source.to_string(),
            })
    }
}
