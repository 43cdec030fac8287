use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::profile::UpdateProfile;
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the profile form helpers.
pub type ProfileFormResult<T> = Result<T, ProfileFormError>;

/// Errors that can occur while processing the settings form.
#[derive(Debug, Error)]
pub enum ProfileFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("display name cannot be empty")]
    EmptyName,
    /// A theme color is not a `#rrggbb` value.
    #[error("invalid color `{value}`")]
    InvalidColor { value: String },
}

/// Form payload emitted when saving the storefront settings page.
#[derive(Debug, Deserialize, Validate)]
pub struct SettingsForm {
    /// Display name shown on the storefront.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Contact phone for the messaging-app call to action.
    #[serde(default)]
    pub phone: Option<String>,
    /// Storefront background color.
    pub theme_background: String,
    /// Storefront primary color.
    pub theme_primary: String,
    /// Storefront accent color.
    pub theme_accent: String,
    /// Storefront font family.
    #[validate(length(min = 1, max = 64))]
    pub font_family: String,
    /// Banner image reference.
    #[serde(default)]
    pub banner_url: Option<String>,
    /// Avatar image reference.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl SettingsForm {
    /// Validates and sanitizes the payload into a profile patch.
    pub fn into_update_profile(self) -> ProfileFormResult<UpdateProfile> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProfileFormError::EmptyName);
        }

        for color in [
            &self.theme_background,
            &self.theme_primary,
            &self.theme_accent,
        ] {
            if !is_hex_color(color) {
                return Err(ProfileFormError::InvalidColor {
                    value: color.clone(),
                });
            }
        }

        let phone = self
            .phone
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());

        let banner_url = self
            .banner_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        let avatar_url = self
            .avatar_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        Ok(UpdateProfile {
            name,
            phone,
            theme_background: self.theme_background,
            theme_primary: self.theme_primary,
            theme_accent: self.theme_accent,
            font_family: sanitize_inline_text(&self.font_family),
            banner_url,
            avatar_url,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> SettingsForm {
        SettingsForm {
            name: " Tienda  Rosa ".to_string(),
            phone: Some(" +54 11 5555-0000 ".to_string()),
            theme_background: "#ffffff".to_string(),
            theme_primary: "#1f2937".to_string(),
            theme_accent: "#f59e0b".to_string(),
            font_family: "Inter".to_string(),
            banner_url: Some("  ".to_string()),
            avatar_url: Some("https://img.example/a.png".to_string()),
        }
    }

    #[test]
    fn settings_form_sanitizes() {
        let update = base_form().into_update_profile().expect("valid form");

        assert_eq!(update.name, "Tienda Rosa");
        assert_eq!(update.phone.as_deref(), Some("+54 11 5555-0000"));
        assert!(update.banner_url.is_none());
        assert_eq!(update.avatar_url.as_deref(), Some("https://img.example/a.png"));
    }

    #[test]
    fn settings_form_rejects_bad_color() {
        let mut form = base_form();
        form.theme_accent = "orange".to_string();

        assert!(matches!(
            form.into_update_profile(),
            Err(ProfileFormError::InvalidColor { .. })
        ));
    }
}
