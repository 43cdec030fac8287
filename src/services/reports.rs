use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::profile::Profile;
use crate::domain::report::{Report, ReportListQuery};
use crate::forms::reports::AcceptReportForm;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProfileReader, ProfileWriter, ReportReader, ReportWriter};
use crate::services::main::ensure_profile;
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the reports index page.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the reports index template.
pub struct ReportsPageData {
    /// Profile of the signed-in vendor.
    pub profile: Profile,
    /// Paginated list of accepted reports, newest first.
    pub reports: Paginated<Report>,
}

/// Loads the reports overview page.
pub fn load_reports_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ReportsQuery,
) -> ServiceResult<ReportsPageData>
where
    R: ProfileReader + ProfileWriter + ReportReader + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let page = query.page.unwrap_or(1);
    let list_query = ReportListQuery::new(profile.id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, reports) = repo.list_reports(list_query).map_err(ServiceError::from)?;

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let reports = Paginated::new(reports, page, total_pages);

    Ok(ReportsPageData { profile, reports })
}

/// Persists generated content the vendor accepted. Stored rows are immutable.
pub fn accept_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AcceptReportForm,
) -> ServiceResult<Report>
where
    R: ProfileReader + ProfileWriter + ReportWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    let new_report = form
        .into_new_report(profile.id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_report(&new_report).map_err(ServiceError::from)
}

/// Deletes an accepted report owned by the signed-in vendor.
pub fn remove_report<R>(repo: &R, user: &AuthenticatedUser, report_id: i32) -> ServiceResult<()>
where
    R: ProfileReader + ProfileWriter + ReportWriter + ?Sized,
{
    let profile = ensure_profile(repo, user)?;

    repo.delete_report(report_id, profile.id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::profile::NewProfile;
    use crate::domain::report::{NewReport, ReportKind};
    use crate::repository::errors::RepositoryResult;
    use crate::repository::mock::{MockProfileReader, MockProfileWriter, MockReportWriter};

    fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    fn sample_profile(id: i32) -> Profile {
        Profile {
            id,
            sub: "auth0|1".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            phone: None,
            theme_background: "#ffffff".to_string(),
            theme_primary: "#1f2937".to_string(),
            theme_accent: "#f59e0b".to_string(),
            font_family: "Inter".to_string(),
            banner_url: None,
            avatar_url: None,
            max_products: 50,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "auth0|1".to_string(),
            email: "vendor@example.com".to_string(),
            name: "Vendor".to_string(),
            exp: 0,
        }
    }

    struct FakeRepo {
        profile_reader: MockProfileReader,
        profile_writer: MockProfileWriter,
        report_writer: MockReportWriter,
    }

    impl FakeRepo {
        fn with_profile() -> Self {
            let mut repo = Self {
                profile_reader: MockProfileReader::new(),
                profile_writer: MockProfileWriter::new(),
                report_writer: MockReportWriter::new(),
            };
            repo.profile_reader
                .expect_get_profile_by_sub()
                .returning(|_| Ok(Some(sample_profile(3))));
            repo
        }
    }

    impl ProfileReader for FakeRepo {
        fn get_profile_by_id(&self, id: i32) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_id(id)
        }

        fn get_profile_by_sub(&self, sub: &str) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_sub(sub)
        }

        fn get_profile_by_email(&self, email: &str) -> RepositoryResult<Option<Profile>> {
            self.profile_reader.get_profile_by_email(email)
        }
    }

    impl ProfileWriter for FakeRepo {
        fn create_profile(&self, new_profile: &NewProfile) -> RepositoryResult<Profile> {
            self.profile_writer.create_profile(new_profile)
        }

        fn update_profile(
            &self,
            profile_id: i32,
            updates: &crate::domain::profile::UpdateProfile,
        ) -> RepositoryResult<Profile> {
            self.profile_writer.update_profile(profile_id, updates)
        }
    }

    impl ReportWriter for FakeRepo {
        fn create_report(&self, new_report: &NewReport) -> RepositoryResult<Report> {
            self.report_writer.create_report(new_report)
        }

        fn delete_report(&self, report_id: i32, profile_id: i32) -> RepositoryResult<()> {
            self.report_writer.delete_report(report_id, profile_id)
        }
    }

    #[test]
    fn accept_report_persists_payload() {
        let mut repo = FakeRepo::with_profile();
        let user = sample_user();

        repo.report_writer
            .expect_create_report()
            .times(1)
            .withf(|new_report| {
                assert_eq!(new_report.profile_id, 3);
                assert_eq!(new_report.kind, ReportKind::Sales);
                assert_eq!(new_report.content, "# Análisis");
                true
            })
            .returning(|new_report| {
                Ok(Report {
                    id: 21,
                    profile_id: new_report.profile_id,
                    kind: new_report.kind,
                    criteria: new_report.criteria.clone(),
                    content: new_report.content.clone(),
                    created_at: fixed_datetime(),
                })
            });

        let form = AcceptReportForm {
            kind: "sales".to_string(),
            criteria: "julio".to_string(),
            content: "# Análisis".to_string(),
        };

        let report = accept_report(&repo, &user, form).expect("expected success");

        assert_eq!(report.id, 21);
    }

    #[test]
    fn accept_report_rejects_empty_content() {
        let repo = FakeRepo::with_profile();
        let user = sample_user();

        let form = AcceptReportForm {
            kind: "sales".to_string(),
            criteria: "julio".to_string(),
            content: "  ".to_string(),
        };

        let result = accept_report(&repo, &user, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn remove_report_deletes_record() {
        let mut repo = FakeRepo::with_profile();
        let user = sample_user();

        repo.report_writer
            .expect_delete_report()
            .times(1)
            .withf(|report_id, profile_id| {
                assert_eq!(*report_id, 6);
                assert_eq!(*profile_id, 3);
                true
            })
            .returning(|_, _| Ok(()));

        let result = remove_report(&repo, &user, 6);

        assert!(matches!(result, Ok(())));
    }
}
