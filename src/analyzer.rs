//! LinkedIn content analyzer pipeline
//!
//! A strict three-stage sequential pipeline:
//!
//! 1. **Extract** the post's content (`/api/linkedin/extract`)
//! 2. **Analyze** the extracted content (`/api/linkedin/analyze`)
//! 3. **Recommend** learning material for it (`/api/recommendations/unified`)
//!
//! Each stage runs only if the previous one succeeded. There is no
//! parallelism, cancellation or retry. Progress is tracked in an explicit
//! [`PipelineState`] so a caller can report exactly where a run stopped.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::api::client::{checked, payload};
use crate::api::types::{
    AnalysisResult, AnalyzeRequest, ExtractRequest, ExtractedContent, Recommendation,
    RecommendationList, UnifiedRecommendationRequest,
};
use crate::api::{ApiClient, ANALYZE_ENDPOINT, EXTRACT_ENDPOINT, UNIFIED_RECOMMENDATIONS_ENDPOINT};
use crate::error::{user_message, LinkrecError, Result};

// ---------------------------------------------------------------------------
// Stages and state
// ---------------------------------------------------------------------------

/// One step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Extract,
    Analyze,
    Recommend,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::Extract => "Extraction",
            PipelineStage::Analyze => "Analysis",
            PipelineStage::Recommend => "Recommendation generation",
        };
        write!(f, "{}", s)
    }
}

/// Where a pipeline run currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    /// Nothing has run yet
    Idle,
    /// Extraction succeeded
    Extracted(ExtractedContent),
    /// Extraction and analysis succeeded
    Analyzed(ExtractedContent, AnalysisResult),
    /// All three stages succeeded
    Recommended(ContentReport),
    /// A stage failed; later stages were not attempted
    Failed {
        stage: PipelineStage,
        message: String,
    },
}

impl PipelineState {
    /// Stage that would run next, if any
    pub fn next_stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineState::Idle => Some(PipelineStage::Extract),
            PipelineState::Extracted(_) => Some(PipelineStage::Analyze),
            PipelineState::Analyzed(..) => Some(PipelineStage::Recommend),
            PipelineState::Recommended(_) | PipelineState::Failed { .. } => None,
        }
    }

    /// `true` once the run has succeeded or failed
    pub fn is_terminal(&self) -> bool {
        self.next_stage().is_none()
    }
}

/// Output of a complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentReport {
    pub url: String,
    pub extracted: ExtractedContent,
    pub analysis: AnalysisResult,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// ContentPipeline
// ---------------------------------------------------------------------------

/// Runs the extract → analyze → recommend chain against the backend.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use linkrec::analyzer::ContentPipeline;
/// use linkrec::api::ApiClient;
///
/// # async fn example() -> linkrec::error::Result<()> {
/// let client = ApiClient::new("http://localhost:8000", Duration::from_secs(60))?;
/// let pipeline = ContentPipeline::new(client, 10);
/// let report = pipeline.run("https://www.linkedin.com/posts/some-post").await?;
/// println!("{} recommendations", report.recommendations.len());
/// # Ok(())
/// # }
/// ```
pub struct ContentPipeline {
    client: ApiClient,
    max_recommendations: usize,
}

impl ContentPipeline {
    /// Create a pipeline asking for at most `max_recommendations` items.
    pub fn new(client: ApiClient, max_recommendations: usize) -> Self {
        Self {
            client,
            max_recommendations,
        }
    }

    /// Run all three stages for `url`.
    ///
    /// # Errors
    ///
    /// - [`LinkrecError::Validation`] for an empty URL (nothing is sent)
    /// - [`LinkrecError::Pipeline`] naming the first stage that failed
    pub async fn run(&self, url: &str) -> Result<ContentReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(LinkrecError::Validation("Please enter a LinkedIn URL".to_string()).into());
        }

        let mut state = PipelineState::Idle;
        loop {
            state = self.advance(state, url).await;
            match state {
                PipelineState::Recommended(report) => return Ok(report),
                PipelineState::Failed { stage, message } => {
                    tracing::error!(%stage, %message, "Content pipeline stopped");
                    return Err(LinkrecError::Pipeline { stage, message }.into());
                }
                _ => {}
            }
        }
    }

    /// Run the next stage for `state`. Terminal states are returned as-is.
    pub async fn advance(&self, state: PipelineState, url: &str) -> PipelineState {
        match state {
            PipelineState::Idle => match self.extract(url).await {
                Ok(extracted) => PipelineState::Extracted(extracted),
                Err(e) => failed(PipelineStage::Extract, e),
            },
            PipelineState::Extracted(extracted) => match self.analyze(&extracted, url).await {
                Ok(analysis) => PipelineState::Analyzed(extracted, analysis),
                Err(e) => failed(PipelineStage::Analyze, e),
            },
            PipelineState::Analyzed(extracted, analysis) => {
                match self.recommend(&extracted, &analysis).await {
                    Ok(recommendations) => PipelineState::Recommended(ContentReport {
                        url: url.to_string(),
                        extracted,
                        analysis,
                        recommendations,
                    }),
                    Err(e) => failed(PipelineStage::Recommend, e),
                }
            }
            terminal => terminal,
        }
    }

    /// Stage 1: extract the post's content.
    ///
    /// Empty extracted content counts as failure.
    pub async fn extract(&self, url: &str) -> Result<ExtractedContent> {
        tracing::info!(url, "Extracting content");
        let request = ExtractRequest {
            url: url.to_string(),
        };
        let value: Value = self.client.post(EXTRACT_ENDPOINT, &request).await?;
        let mut extracted: ExtractedContent = payload(value)?;

        if extracted.content.trim().is_empty() {
            anyhow::bail!("no content could be extracted from {}", url);
        }
        if extracted.url.is_none() {
            extracted.url = Some(url.to_string());
        }

        tracing::debug!(
            method = %extracted.extraction_method,
            quality = extracted.quality_score,
            "Content extracted"
        );
        Ok(extracted)
    }

    /// Stage 2: analyze extracted content.
    pub async fn analyze(&self, extracted: &ExtractedContent, url: &str) -> Result<AnalysisResult> {
        tracing::info!(title = %extracted.title, "Analyzing content");
        let request = AnalyzeRequest {
            title: extracted.title.clone(),
            content: extracted.content.clone(),
            url: url.to_string(),
        };
        let value: Value = self.client.post(ANALYZE_ENDPOINT, &request).await?;
        let value = checked(value)?;
        let value = value.get("analysis").cloned().unwrap_or(value);
        Ok(serde_json::from_value(value)?)
    }

    /// Stage 3: generate recommendations from the analysis.
    pub async fn recommend(
        &self,
        extracted: &ExtractedContent,
        analysis: &AnalysisResult,
    ) -> Result<Vec<Recommendation>> {
        tracing::info!(
            technologies = analysis.technologies.len(),
            "Generating recommendations"
        );
        let request =
            UnifiedRecommendationRequest::from_analysis(extracted, analysis, self.max_recommendations);
        let value: Value = self
            .client
            .post(UNIFIED_RECOMMENDATIONS_ENDPOINT, &request)
            .await?;
        let list: RecommendationList = payload(value)?;
        Ok(list.into())
    }
}

fn failed(stage: PipelineStage, err: anyhow::Error) -> PipelineState {
    let message = match err.downcast_ref::<LinkrecError>() {
        Some(LinkrecError::Api { message, .. }) if message.trim().is_empty() => {
            "the server rejected the request".to_string()
        }
        Some(LinkrecError::Api { message, .. }) => message.clone(),
        Some(LinkrecError::ServiceUnavailable(_)) => user_message(&err, ""),
        _ => err.to_string(),
    };
    PipelineState::Failed { stage, message }
}
