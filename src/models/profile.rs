use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::profile::{
    NewProfile as DomainNewProfile, Profile as DomainProfile, UpdateProfile as DomainUpdateProfile,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct Profile {
    pub id: i32,
    pub sub: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub theme_background: String,
    pub theme_primary: String,
    pub theme_accent: String,
    pub font_family: String,
    pub banner_url: Option<String>,
    pub avatar_url: Option<String>,
    pub max_products: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile<'a> {
    pub sub: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProfile<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub theme_background: &'a str,
    pub theme_primary: &'a str,
    pub theme_accent: &'a str,
    pub font_family: &'a str,
    pub banner_url: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Profile> for DomainProfile {
    fn from(value: Profile) -> Self {
        Self {
            id: value.id,
            sub: value.sub,
            email: value.email,
            name: value.name,
            phone: value.phone,
            theme_background: value.theme_background,
            theme_primary: value.theme_primary,
            theme_accent: value.theme_accent,
            font_family: value.font_family,
            banner_url: value.banner_url,
            avatar_url: value.avatar_url,
            max_products: value.max_products,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProfile> for NewProfile<'a> {
    fn from(value: &'a DomainNewProfile) -> Self {
        Self {
            sub: value.sub.as_str(),
            email: value.email.as_str(),
            name: value.name.as_str(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProfile> for UpdateProfile<'a> {
    fn from(value: &'a DomainUpdateProfile) -> Self {
        Self {
            name: value.name.as_str(),
            phone: value.phone.as_deref(),
            theme_background: value.theme_background.as_str(),
            theme_primary: value.theme_primary.as_str(),
            theme_accent: value.theme_accent.as_str(),
            font_family: value.font_family.as_str(),
            banner_url: value.banner_url.as_deref(),
            avatar_url: value.avatar_url.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
