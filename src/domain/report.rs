use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Classification of a stored report.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Pricing suggestion accepted for a product.
    Pricing,
    /// Sales/inventory analysis.
    Sales,
    /// Free-form authored report.
    Custom,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Sales => "sales",
            Self::Custom => "custom",
        }
    }

    /// Parse the stored tag back into a kind; unknown tags become `Custom`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pricing" => Self::Pricing,
            "sales" => Self::Sales,
            _ => Self::Custom,
        }
    }
}

/// Domain representation of an accepted, immutable report.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Report {
    /// Unique identifier of the report.
    pub id: i32,
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Report classification tag.
    pub kind: ReportKind,
    /// Criteria the content was generated from.
    pub criteria: String,
    /// Markdown content; never mutated after acceptance.
    pub content: String,
    /// Timestamp for when the report was accepted.
    pub created_at: NaiveDateTime,
}

/// Payload required to persist an accepted report.
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Report classification tag.
    pub kind: ReportKind,
    /// Criteria the content was generated from.
    pub criteria: String,
    /// Markdown content to store verbatim.
    pub content: String,
    /// Timestamp captured when the payload was created.
    pub created_at: NaiveDateTime,
}

impl NewReport {
    pub fn new(
        profile_id: i32,
        kind: ReportKind,
        criteria: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            profile_id,
            kind,
            criteria: criteria.into(),
            content: content.into(),
            created_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list reports for a profile.
#[derive(Debug, Clone)]
pub struct ReportListQuery {
    /// Owning profile identifier.
    pub profile_id: i32,
    /// Optional kind filter.
    pub kind: Option<ReportKind>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ReportListQuery {
    /// Construct a query that targets all reports belonging to `profile_id`.
    pub fn new(profile_id: i32) -> Self {
        Self {
            profile_id,
            kind: None,
            pagination: None,
        }
    }

    /// Filter the results by report kind.
    pub fn kind(mut self, kind: ReportKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
