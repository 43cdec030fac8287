use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::report::{NewReport, ReportKind};
use crate::forms::sanitize_inline_text;

/// Maximum length allowed for generation criteria.
const CRITERIA_MAX_LEN: usize = 1024;
const CRITERIA_MAX_LEN_VALIDATOR: u64 = CRITERIA_MAX_LEN as u64;

/// Result type returned by the report form helpers.
pub type ReportFormResult<T> = Result<T, ReportFormError>;

/// Errors that can occur while processing report forms.
#[derive(Debug, Error)]
pub enum ReportFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided criteria are empty after sanitization.
    #[error("report criteria cannot be empty")]
    EmptyCriteria,
    /// The submitted content is empty.
    #[error("report content cannot be empty")]
    EmptyContent,
}

/// Form payload emitted when requesting an authored report.
#[derive(Debug, Deserialize, Validate)]
pub struct AuthorReportForm {
    /// Free-form criteria the report should be written from.
    #[validate(length(min = 1, max = CRITERIA_MAX_LEN_VALIDATOR))]
    pub criteria: String,
}

impl AuthorReportForm {
    /// Validates and sanitizes the criteria string.
    pub fn into_criteria(self) -> ReportFormResult<String> {
        self.validate()?;

        let criteria = sanitize_inline_text(&self.criteria);
        if criteria.is_empty() {
            return Err(ReportFormError::EmptyCriteria);
        }

        Ok(criteria)
    }
}

/// Form payload emitted when the vendor accepts generated content.
#[derive(Debug, Deserialize, Validate)]
pub struct AcceptReportForm {
    /// Report classification tag.
    pub kind: String,
    /// Criteria the content was generated from.
    #[validate(length(max = CRITERIA_MAX_LEN_VALIDATOR))]
    pub criteria: String,
    /// Generated markdown, stored verbatim.
    pub content: String,
}

impl AcceptReportForm {
    /// Validates the payload into a persistable report.
    pub fn into_new_report(self, profile_id: i32) -> ReportFormResult<NewReport> {
        self.validate()?;

        let content = self.content.trim();
        if content.is_empty() {
            return Err(ReportFormError::EmptyContent);
        }

        let criteria = sanitize_inline_text(&self.criteria);

        Ok(NewReport::new(
            profile_id,
            ReportKind::from_tag(&self.kind),
            criteria,
            content,
        ))
    }
}
