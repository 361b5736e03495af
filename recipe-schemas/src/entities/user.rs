//! Account entities: registration, login and roles.

use serde::{Deserialize, Serialize};

use crate::EntitySchema;

/// Registration as the server accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "camelCase")]
#[schema(message = "נדרשים פרטי הרשמה")]
pub struct Register {
    #[schema(
        trim,
        lowercase,
        email("כתובת אימייל לא תקינה"),
        max_length(255, "כתובת אימייל ארוכה מדי")
    )]
    pub email: String,

    #[schema(
        trim,
        min_length(2, "שם מלא חייב להכיל לפחות 2 תווים"),
        max_length(100, "שם מלא ארוך מדי")
    )]
    pub full_name: String,

    #[schema(
        min_length(6, "סיסמה חייבת להכיל לפחות 6 תווים"),
        max_length(128, "סיסמה ארוכה מדי")
    )]
    pub password: String,
}

/// Registration as the form submits it, with the password typed twice.
///
/// A mismatch is reported on `confirmPassword`, and only once every field
/// has the right type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    message = "נדרשים פרטי הרשמה",
    equal(
        source = "password",
        target = "confirmPassword",
        message = "הסיסמאות אינן תואמות"
    )
)]
pub struct RegisterWithConfirm {
    #[serde(flatten)]
    pub account: Register,

    pub confirm_password: String,
}

impl RegisterWithConfirm {
    /// The registration the server stores, without the confirmation.
    pub fn into_register(self) -> Register {
        self.account
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "camelCase")]
#[schema(message = "נדרשים פרטי התחברות")]
pub struct Login {
    #[schema(
        trim,
        lowercase,
        email("כתובת אימייל לא תקינה"),
        max_length(255, "כתובת אימייל ארוכה מדי")
    )]
    pub email: String,

    #[schema(min_length(1, "נדרשת סיסמה"))]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "lowercase")]
#[schema(message = "תפקיד לא תקין")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
