//! Reviews embedded in a restaurant record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::draft::IssueCollector;

/// Maximum review text length in characters.
pub const REVIEW_TEXT_MAX: usize = 500;

/// A review embedded in its parent restaurant; no independent identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Identifier of the author; recorded as supplied, no integrity check.
    pub user_id: String,
    /// Star rating from 1 to 5.
    pub stars: u8,
    /// Review body, at most [`REVIEW_TEXT_MAX`] characters.
    pub text: String,
    /// When the review was written; defaults to creation time.
    pub date: DateTime<Utc>,
}

/// Loosely-typed review input awaiting validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    /// Author identifier, if supplied.
    pub user_id: Option<String>,
    /// Star rating, if supplied. Bounds are checked during validation.
    pub stars: Option<i64>,
    /// Review body, if supplied.
    pub text: Option<String>,
    /// Review timestamp; absent means "now".
    pub date: Option<DateTime<Utc>>,
}

impl ReviewDraft {
    /// Validate one draft, reporting issues under `reviews[index].*` fields.
    ///
    /// Returns `None` when any field fails; the collector then carries the
    /// per-field messages.
    pub(super) fn validate(self, index: usize, issues: &mut IssueCollector) -> Option<Review> {
        let mut valid = true;

        let user_id = match self.user_id.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_owned(),
            _ => {
                issues.push(
                    format!("reviews[{index}].userId"),
                    "missing_field",
                    "review author is required",
                );
                valid = false;
                String::new()
            }
        };

        let stars = match self.stars {
            Some(value @ 1..=5) => u8::try_from(value).ok(),
            _ => None,
        };
        if stars.is_none() {
            issues.push(
                format!("reviews[{index}].stars"),
                "out_of_range",
                "review stars must be an integer between 1 and 5",
            );
            valid = false;
        }

        let text = match self.text.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() && value.chars().count() <= REVIEW_TEXT_MAX => {
                value.to_owned()
            }
            _ => {
                issues.push(
                    format!("reviews[{index}].text"),
                    "invalid_length",
                    format!("review text is required and limited to {REVIEW_TEXT_MAX} characters"),
                );
                valid = false;
                String::new()
            }
        };

        if !valid {
            return None;
        }

        Some(Review {
            user_id,
            stars: stars?,
            text,
            date: self.date.unwrap_or_else(Utc::now),
        })
    }
}
