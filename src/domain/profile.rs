use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Domain representation of a vendor profile (one per authenticated tenant).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Profile {
    /// Unique identifier of the profile.
    pub id: i32,
    /// Identity reference assigned by the auth service.
    pub sub: String,
    /// Email address of the vendor.
    pub email: String,
    /// Display name shown on the storefront.
    pub name: String,
    /// Contact phone used for the messaging-app call to action.
    pub phone: Option<String>,
    /// Storefront background color.
    pub theme_background: String,
    /// Storefront primary color.
    pub theme_primary: String,
    /// Storefront accent color.
    pub theme_accent: String,
    /// Storefront font family.
    pub font_family: String,
    /// Banner image reference.
    pub banner_url: Option<String>,
    /// Avatar image reference.
    pub avatar_url: Option<String>,
    /// Maximum number of products the vendor may create.
    pub max_products: i32,
    /// Timestamp for when the profile was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the profile.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new profile on first sign-in.
#[derive(Debug, Clone)]
pub struct NewProfile {
    /// Identity reference assigned by the auth service.
    pub sub: String,
    /// Email address of the vendor.
    pub email: String,
    /// Display name shown on the storefront.
    pub name: String,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProfile {
    /// Build a profile payload from auth-service claims.
    pub fn new(sub: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            name: name.into(),
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Patch data applied when the owner edits their profile settings.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    /// Display name shown on the storefront.
    pub name: String,
    /// Contact phone, `None` clears the value.
    pub phone: Option<String>,
    /// Storefront background color.
    pub theme_background: String,
    /// Storefront primary color.
    pub theme_primary: String,
    /// Storefront accent color.
    pub theme_accent: String,
    /// Storefront font family.
    pub font_family: String,
    /// Banner image reference, `None` clears the value.
    pub banner_url: Option<String>,
    /// Avatar image reference, `None` clears the value.
    pub avatar_url: Option<String>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}
