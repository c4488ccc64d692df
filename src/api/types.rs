//! Request and response shapes exchanged with the backend
//!
//! These mirror the backend's ad hoc JSON. Unknown fields are ignored and
//! most fields default when absent, since no schema is published.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LinkrecError;

/// Accepts identifiers sent either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/supabase-oauth`
#[derive(Debug, Clone, Serialize)]
pub struct OAuthExchangeRequest {
    pub access_token: String,
}

/// Response of every session-issuing endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    /// Session token; some deployments call it `access_token`
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A user account as returned by the profile endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "username")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Partial profile update; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// `true` when no field would be sent
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.bio.is_none()
    }
}

/// Body of `PUT /api/auth/password`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Content analyzer
// ---------------------------------------------------------------------------

/// Body of `POST /api/linkedin/extract`
#[derive(Debug, Clone, Serialize)]
pub struct ExtractRequest {
    pub url: String,
}

/// Content pulled out of a LinkedIn post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "text")]
    pub content: String,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub extraction_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Body of `POST /api/linkedin/analyze`
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Remote analysis of extracted content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub learning_goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_topics: Vec<String>,
}

/// Body of `POST /api/recommendations/unified`
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedRecommendationRequest {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub content_type: String,
    pub difficulty: String,
    pub learning_goals: Vec<String>,
    pub max_recommendations: usize,
}

impl UnifiedRecommendationRequest {
    /// Builds the generation request from the first two pipeline stages.
    pub fn from_analysis(
        extracted: &ExtractedContent,
        analysis: &AnalysisResult,
        max_recommendations: usize,
    ) -> Self {
        let description = if analysis.summary.trim().is_empty() {
            extracted.content.clone()
        } else {
            analysis.summary.clone()
        };

        Self {
            title: extracted.title.clone(),
            description,
            technologies: analysis.technologies.clone(),
            content_type: analysis.content_type.clone(),
            difficulty: analysis.difficulty.clone(),
            learning_goals: analysis.learning_goals.clone(),
            max_recommendations,
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Per-signal scores behind a recommendation's overall score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default, alias = "technology_match", skip_serializing_if = "Option::is_none")]
    pub technology: Option<f64>,
    #[serde(default, alias = "content_relevance", skip_serializing_if = "Option::is_none")]
    pub content: Option<f64>,
    #[serde(default, alias = "difficulty_alignment", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    #[serde(default, alias = "intent_alignment", skip_serializing_if = "Option::is_none")]
    pub intent: Option<f64>,
    #[serde(default, alias = "semantic_similarity", skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f64>,
}

/// A backend-scored content suggestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "scores", skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// Normalize a backend score to a 0-100 scale.
///
/// The backend sends scores either as fractions (0-1) or as percentages
/// (0-100). Values up to and including `1.0` are read as fractions, so a
/// percentage score of exactly 1 is shown as 100%.
///
/// # Examples
///
/// ```
/// use linkrec::api::types::score_to_percent;
///
/// assert_eq!(score_to_percent(0.5), 50.0);
/// assert_eq!(score_to_percent(1.0), 100.0);
/// assert_eq!(score_to_percent(78.0), 78.0);
/// ```
pub fn score_to_percent(value: f64) -> f64 {
    if value <= 1.0 {
        value * 100.0
    } else {
        value
    }
}

impl Recommendation {
    /// Overall score on a 0-100 scale, see [`score_to_percent`]
    pub fn score_percent(&self) -> f64 {
        score_to_percent(self.score)
    }
}

/// Recommendation lists arrive bare or wrapped in `{"recommendations": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecommendationList {
    Bare(Vec<Recommendation>),
    Wrapped {
        #[serde(default)]
        recommendations: Vec<Recommendation>,
    },
}

impl From<RecommendationList> for Vec<Recommendation> {
    fn from(list: RecommendationList) -> Self {
        match list {
            RecommendationList::Bare(items) => items,
            RecommendationList::Wrapped { recommendations } => recommendations,
        }
    }
}

/// Kinds of feedback the backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Relevant,
    NotRelevant,
    Saved,
    Clicked,
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeedbackKind::Relevant => "relevant",
            FeedbackKind::NotRelevant => "not_relevant",
            FeedbackKind::Saved => "saved",
            FeedbackKind::Clicked => "clicked",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FeedbackKind {
    type Err = LinkrecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "relevant" => Ok(FeedbackKind::Relevant),
            "not_relevant" => Ok(FeedbackKind::NotRelevant),
            "saved" => Ok(FeedbackKind::Saved),
            "clicked" => Ok(FeedbackKind::Clicked),
            other => Err(LinkrecError::Validation(format!(
                "Unknown feedback kind: {}. Use relevant, not_relevant, saved, or clicked",
                other
            ))),
        }
    }
}

/// Body of `POST /api/recommendations/feedback`
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub recommendation_id: String,
    pub feedback_type: FeedbackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of `POST /api/bookmarks`
#[derive(Debug, Clone, Serialize)]
pub struct BookmarkRequest {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Recommendation> for BookmarkRequest {
    fn from(rec: &Recommendation) -> Self {
        Self {
            url: rec.url.clone(),
            title: rec.title.clone(),
            description: rec
                .description
                .clone()
                .unwrap_or_else(|| rec.reason.clone()),
            category: rec.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_accepts_access_token_alias() {
        let resp: AuthResponse = serde_json::from_value(json!({"access_token": "t1"})).unwrap();
        assert_eq!(resp.token.as_deref(), Some("t1"));
    }

    #[test]
    fn test_auth_response_without_token() {
        let resp: AuthResponse = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert!(resp.token.is_none());
    }

    #[test]
    fn test_user_numeric_id() {
        let user: User =
            serde_json::from_value(json!({"id": 7, "email": "a@b.c", "username": "ada"})).unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn test_profile_update_skips_absent_fields() {
        let update = ProfileUpdate {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"name": "Ada"}));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_recommendation_with_breakdown() {
        let rec: Recommendation = serde_json::from_value(json!({
            "id": 12,
            "title": "Async Rust",
            "url": "https://example.com/async",
            "reason": "Matches your interest in tokio",
            "score": 0.87,
            "scores": {"technology_match": 0.9, "semantic": 0.8}
        }))
        .unwrap();
        assert_eq!(rec.id, "12");
        let breakdown = rec.score_breakdown.unwrap();
        assert_eq!(breakdown.technology, Some(0.9));
        assert_eq!(breakdown.semantic, Some(0.8));
        assert!(breakdown.intent.is_none());
    }

    #[test]
    fn test_score_percent_handles_both_scales() {
        let fractional = Recommendation {
            score: 0.5,
            ..Default::default()
        };
        let percent = Recommendation {
            score: 72.0,
            ..Default::default()
        };
        assert!((fractional.score_percent() - 50.0).abs() < f64::EPSILON);
        assert!((percent.score_percent() - 72.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_of_exactly_one_reads_as_fraction() {
        assert_eq!(score_to_percent(1.0), 100.0);
        assert_eq!(score_to_percent(0.0), 0.0);
        assert_eq!(score_to_percent(1.5), 1.5);
    }

    #[test]
    fn test_recommendation_list_bare_and_wrapped() {
        let bare: RecommendationList =
            serde_json::from_value(json!([{"id": "a", "title": "A"}])).unwrap();
        let wrapped: RecommendationList = serde_json::from_value(
            json!({"recommendations": [{"id": "b"}, {"id": "c"}], "total": 2}),
        )
        .unwrap();
        assert_eq!(Vec::<Recommendation>::from(bare).len(), 1);
        assert_eq!(Vec::<Recommendation>::from(wrapped).len(), 2);
    }

    #[test]
    fn test_feedback_kind_parse_and_display() {
        assert_eq!("not-relevant".parse::<FeedbackKind>().unwrap(), FeedbackKind::NotRelevant);
        assert_eq!(FeedbackKind::NotRelevant.to_string(), "not_relevant");
        assert!("meh".parse::<FeedbackKind>().is_err());
        assert_eq!(
            serde_json::to_value(FeedbackKind::Saved).unwrap(),
            json!("saved")
        );
    }

    #[test]
    fn test_unified_request_falls_back_to_content_without_summary() {
        let extracted = ExtractedContent {
            title: "Post".to_string(),
            content: "Body text".to_string(),
            ..Default::default()
        };
        let analysis = AnalysisResult {
            technologies: vec!["rust".to_string()],
            ..Default::default()
        };
        let req = UnifiedRecommendationRequest::from_analysis(&extracted, &analysis, 5);
        assert_eq!(req.description, "Body text");
        assert_eq!(req.technologies, vec!["rust".to_string()]);
        assert_eq!(req.max_recommendations, 5);
    }

    #[test]
    fn test_bookmark_from_recommendation_uses_reason_without_description() {
        let rec = Recommendation {
            title: "T".to_string(),
            url: "https://x".to_string(),
            reason: "because".to_string(),
            ..Default::default()
        };
        let bookmark = BookmarkRequest::from(&rec);
        assert_eq!(bookmark.description, "because");
        assert!(bookmark.category.is_none());
    }
}
