//! Recipe entities.

use serde::{Deserialize, Serialize};

use crate::EntitySchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EntitySchema)]
#[schema(message = "סוג כשרות לא תקין")]
pub enum KosherType {
    #[default]
    Parve,
    Dairy,
    Meat,
}

/// A new recipe. [`UpdateRecipe`] is generated from it with every field
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "camelCase")]
#[schema(message = "נדרשים פרטי מתכון", partial = "UpdateRecipe")]
pub struct CreateRecipe {
    #[schema(
        trim,
        min_length(2, "שם המתכון חייב להכיל לפחות 2 תווים"),
        max_length(200, "שם המתכון ארוך מדי")
    )]
    pub title: String,

    #[schema(
        trim,
        min_length(2, "קטגוריה חייבת להכיל לפחות 2 תווים"),
        max_length(100, "קטגוריה ארוכה מדי")
    )]
    pub category: String,

    #[schema(
        min_items(1, "נדרש לפחות מרכיב אחד"),
        items(trim, min_length(1, "מרכיב לא יכול להיות ריק"))
    )]
    pub ingredients: Vec<String>,

    #[schema(
        min_items(1, "נדרשת לפחות הוראה אחת"),
        items(trim, min_length(1, "הוראה לא יכולה להיות ריקה"))
    )]
    pub instructions: Vec<String>,

    /// Minutes. Fractions are accepted.
    #[schema(
        min(1, "זמן הכנה חייב להיות לפחות דקה אחת"),
        max(10000, "זמן הכנה לא סביר")
    )]
    pub prep_time: f64,

    #[schema(
        int("רמת קושי חייבת להיות מספר שלם"),
        min(1, "רמת קושי חייבת להיות לפחות 1"),
        max(5, "רמת קושי יכולה להיות עד 5")
    )]
    pub difficulty: i64,

    #[schema(trim, default = "")]
    pub image_url: String,

    #[schema(default = false)]
    pub is_yemeni: bool,

    #[schema(default = "Parve")]
    pub kosher_type: KosherType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[schema(message = "נדרש דירוג")]
pub struct RateRecipe {
    #[schema(min(0, "דירוג חייב להיות לפחות 0"), max(5, "דירוג יכול להיות עד 5"))]
    pub rating: f64,
}

impl UpdateRecipe {
    /// True when the update names no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
