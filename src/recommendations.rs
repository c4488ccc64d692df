//! Recommendations feed, feedback and bookmarking
//!
//! The backend does all scoring and ranking. The only local logic is a
//! category-equality filter; category browsing itself is done server-side
//! by calling the endpoint for that category.

use std::fmt;

use serde_json::Value;
use url::Url;

use crate::api::client::{checked, payload};
use crate::api::types::{
    BookmarkRequest, FeedbackKind, FeedbackRequest, Recommendation, RecommendationList,
};
use crate::api::{
    ApiClient, BOOKMARKS_ENDPOINT, RECOMMENDATIONS_ENDPOINT, RECOMMENDATION_FEEDBACK_ENDPOINT,
};
use crate::error::{LinkrecError, Result};

// Only the path and query are kept from URLs built on this base.
const FEED_BASE: &str = "http://feed.invalid";

/// Which slice of the feed to show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,
    /// One category, compared case-insensitively
    Category(String),
}

impl CategoryFilter {
    /// `None`, blank and `"all"` select everything.
    pub fn from_option(category: Option<&str>) -> Self {
        match category.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(c) if c.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(c) => CategoryFilter::Category(c.to_string()),
        }
    }

    /// `true` when `rec` belongs to this slice
    pub fn matches(&self, rec: &Recommendation) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(wanted) => rec
                .category
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(wanted))
                .unwrap_or(false),
        }
    }

    /// Path and query of the feed endpoint for this slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrec::recommendations::CategoryFilter;
    ///
    /// assert_eq!(
    ///     CategoryFilter::All.endpoint(5).unwrap(),
    ///     "/api/recommendations?limit=5"
    /// );
    /// assert_eq!(
    ///     CategoryFilter::Category("machine learning".to_string()).endpoint(5).unwrap(),
    ///     "/api/recommendations/category/machine%20learning?limit=5"
    /// );
    /// ```
    pub fn endpoint(&self, limit: usize) -> Result<String> {
        let mut url = Url::parse(FEED_BASE).map_err(LinkrecError::Url)?;
        url.set_path(RECOMMENDATIONS_ENDPOINT);
        if let CategoryFilter::Category(category) = self {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push("category").push(category);
            }
        }
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        Ok(url[url::Position::BeforePath..].to_string())
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Category(c) => write!(f, "{}", c),
        }
    }
}

/// Keep only the recommendations in `filter`'s category.
pub fn filter_by_category<'a>(
    recommendations: &'a [Recommendation],
    filter: &CategoryFilter,
) -> Vec<&'a Recommendation> {
    recommendations.iter().filter(|r| filter.matches(r)).collect()
}

/// Feed access for the logged-in user.
pub struct RecommendationService {
    client: ApiClient,
}

impl RecommendationService {
    /// Create the service over an authenticated client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch up to `limit` recommendations for `filter`.
    ///
    /// Only the endpoint for `filter` is called.
    pub async fn list(&self, filter: &CategoryFilter, limit: usize) -> Result<Vec<Recommendation>> {
        self.client.require_token().await?;
        let endpoint = filter.endpoint(limit)?;
        tracing::info!(category = %filter, limit, "Fetching recommendations");

        let value: Value = self.client.get(&endpoint).await?;
        let list: RecommendationList = payload(value)?;
        Ok(list.into())
    }

    /// Look a recommendation up by id in the `filter` slice of the feed.
    pub async fn find(
        &self,
        id: &str,
        filter: &CategoryFilter,
        limit: usize,
    ) -> Result<Option<Recommendation>> {
        let items = self.list(filter, limit).await?;
        Ok(items.into_iter().find(|r| r.id == id))
    }

    /// Record feedback for a recommendation.
    pub async fn feedback(
        &self,
        recommendation_id: &str,
        kind: FeedbackKind,
        comment: Option<String>,
    ) -> Result<()> {
        let recommendation_id = recommendation_id.trim();
        if recommendation_id.is_empty() {
            return Err(
                LinkrecError::Validation("A recommendation id is required".to_string()).into(),
            );
        }

        self.client.require_token().await?;
        tracing::info!(recommendation_id, %kind, "Sending recommendation feedback");

        let body = FeedbackRequest {
            recommendation_id: recommendation_id.to_string(),
            feedback_type: kind,
            comment: comment.filter(|c| !c.trim().is_empty()),
        };
        let value: Value = self
            .client
            .post(RECOMMENDATION_FEEDBACK_ENDPOINT, &body)
            .await?;
        checked(value)?;
        Ok(())
    }

    /// Bookmark a recommendation, then report it as saved.
    ///
    /// A rejected bookmark fails the call and no feedback is sent. Once the
    /// bookmark exists, a failed `saved` feedback call is logged and ignored.
    pub async fn save(&self, recommendation: &Recommendation) -> Result<()> {
        if recommendation.url.trim().is_empty() {
            return Err(
                LinkrecError::Validation("Recommendation has no URL to bookmark".to_string())
                    .into(),
            );
        }

        self.client.require_token().await?;
        tracing::info!(id = %recommendation.id, "Saving recommendation as bookmark");

        let body = BookmarkRequest::from(recommendation);
        let value: Value = self.client.post(BOOKMARKS_ENDPOINT, &body).await?;
        checked(value)?;

        if let Err(e) = self
            .feedback(&recommendation.id, FeedbackKind::Saved, None)
            .await
        {
            tracing::warn!(error = %e, "Bookmark saved but feedback was not recorded");
        }
        Ok(())
    }
}
