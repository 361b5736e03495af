//! User-facing message texts.
//!
//! Entity messages live next to the entity definitions. The constants here
//! cover the structural checks every rule carries by default and the fixed
//! texts of the request layer.

/// A string was expected.
pub const INVALID_STRING: &str = "ערך חייב להיות טקסט";

/// A number was expected.
pub const INVALID_NUMBER: &str = "ערך חייב להיות מספר";

/// A boolean was expected.
pub const INVALID_BOOLEAN: &str = "ערך חייב להיות כן או לא";

/// A list was expected.
pub const INVALID_ARRAY: &str = "ערך חייב להיות רשימה";

/// An object was expected, or a required key is missing.
pub const INVALID_OBJECT: &str = "נדרש אובייקט תקין";

/// The value is not one of the allowed options.
pub const INVALID_OPTION: &str = "ערך לא תקין";

// Defaults for checks declared without their own message.

pub const INVALID_EMAIL: &str = "כתובת אימייל לא תקינה";
pub const INVALID_FORMAT: &str = "פורמט לא תקין";
pub const TOO_SHORT: &str = "הערך קצר מדי";
pub const TOO_LONG: &str = "הערך ארוך מדי";
pub const NOT_INTEGER: &str = "ערך חייב להיות מספר שלם";
pub const TOO_SMALL: &str = "הערך קטן מדי";
pub const TOO_LARGE: &str = "הערך גדול מדי";
pub const TOO_FEW_ITEMS: &str = "אין מספיק פריטים";
pub const TOO_MANY_ITEMS: &str = "יותר מדי פריטים";

/// A value passed its schema but could not be converted to the target type.
pub const INTERNAL_ERROR: &str = "שגיאה פנימית באימות הנתונים";

// Request layer. These match the texts the controllers always answered with.

pub const VALIDATION_ERROR: &str = "Validation error";
pub const NOT_LOGGED_IN: &str = "Not logged in";
pub const INVALID_SESSION: &str = "Invalid session";
pub const INTERNAL_ERROR_PUBLIC: &str = "An internal error occurred";
