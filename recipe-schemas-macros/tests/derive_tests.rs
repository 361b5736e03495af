//! Integration tests for the EntitySchema derive macro.
//!
//! These tests verify that the generated schemas, projected input types and
//! partial variants behave as declared.

use recipe_schemas::schema::Schema;
use recipe_schemas::{EntitySchema, ROOT_ERROR_KEY, ValidationResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

// =============================================================================
// Basic Struct Tests
// =============================================================================

#[test]
fn test_basic_struct_derive() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Note {
        title: String,
        stars: f64,
        pinned: bool,
    }

    let schema = Note::schema().as_object().unwrap();
    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["title", "stars", "pinned"]);
    assert!(matches!(schema.get("title"), Some(Schema::String(_))));
    assert!(matches!(schema.get("stars"), Some(Schema::Number(_))));
    assert!(matches!(schema.get("pinned"), Some(Schema::Boolean(_))));

    let note = Note::validate(&json!({ "title": "a", "stars": 1, "pinned": true }))
        .into_result()
        .unwrap();
    assert_eq!(note.title, "a");
}

#[test]
fn test_struct_with_rename() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[schema(rename = "NoteDTO")]
    struct Note {
        title: String,
    }

    assert_eq!(Note::type_name(), "NoteDTO");
    assert_eq!(Note::schema_name(), "NoteDTOSchema");
}

#[test]
fn test_schema_rename_all() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[schema(rename_all = "camelCase")]
    #[serde(rename_all = "camelCase")]
    struct Person {
        first_name: String,
        last_name: String,
    }

    let keys: Vec<_> = Person::schema().as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["firstName", "lastName"]);
}

#[test]
fn test_serde_rename_is_respected() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[serde(rename_all = "camelCase")]
    struct Recipe {
        #[serde(rename = "img")]
        image_url: String,
        prep_time: f64,
    }

    let keys: Vec<_> = Recipe::schema().as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["img", "prepTime"]);

    let recipe = Recipe::validate(&json!({ "img": "x.png", "prepTime": 5 }))
        .into_result()
        .unwrap();
    assert_eq!(recipe.image_url, "x.png");
}

// =============================================================================
// Checks
// =============================================================================

#[test]
fn test_checks_run_in_fixed_order() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Account {
        // Written out of order on purpose.
        #[schema(max_length(20, "long"), email("bad"), lowercase, trim)]
        email: String,
    }

    let account = Account::validate(&json!({ "email": "  A@B.CO  " }))
        .into_result()
        .unwrap();
    assert_eq!(account.email, "a@b.co");
}

#[test]
fn test_default_messages() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Title {
        #[schema(min_length = 3)]
        title: String,
    }

    let result = Title::validate(&json!({ "title": "ab" }));
    assert_eq!(
        result.errors().unwrap().get("title"),
        Some(recipe_schemas::messages::TOO_SHORT)
    );

    let result = Title::validate(&json!({ "title": 3 }));
    assert_eq!(
        result.errors().unwrap().get("title"),
        Some(recipe_schemas::messages::INVALID_STRING)
    );
}

#[test]
fn test_custom_type_message() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[schema(message = "object please")]
    struct Rating {
        #[schema(message = "number please")]
        value: f64,
    }

    let errors = Rating::validate(&json!({ "value": "4" })).errors().cloned().unwrap();
    assert_eq!(errors.get("value"), Some("number please"));

    let errors = Rating::validate(&json!([])).errors().cloned().unwrap();
    assert_eq!(errors.get(ROOT_ERROR_KEY), Some("object please"));

    let errors = Rating::validate(&json!({})).errors().cloned().unwrap();
    assert_eq!(errors.get("value"), Some("object please"));
}

#[test]
fn test_pattern_check() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Slug {
        #[schema(pattern("^[a-z-]+$", "lowercase words only"))]
        slug: String,
    }

    assert!(Slug::validate(&json!({ "slug": "jachnun-recipe" })).is_success());
    assert_eq!(
        Slug::validate(&json!({ "slug": "Jachnun" }))
            .errors()
            .unwrap()
            .get("slug"),
        Some("lowercase words only")
    );
}

#[test]
fn test_integer_types_check_whole_numbers() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Counts {
        signed: i32,
        unsigned: u32,
    }

    let counts = Counts::validate(&json!({ "signed": -3, "unsigned": 4.0 }))
        .into_result()
        .unwrap();
    assert_eq!(counts.signed, -3);
    assert_eq!(counts.unsigned, 4);

    let errors = Counts::validate(&json!({ "signed": 1.5, "unsigned": -1 }))
        .errors()
        .cloned()
        .unwrap();
    assert_eq!(errors.get("signed"), Some(recipe_schemas::messages::NOT_INTEGER));
    assert_eq!(errors.get("unsigned"), Some(recipe_schemas::messages::TOO_SMALL));
}

#[test]
fn test_integer_width_bounds_values() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Servings {
        count: u8,
        #[schema(max(12, "too many"))]
        portions: u8,
    }

    let servings = Servings::validate(&json!({ "count": 255, "portions": 12 }))
        .into_result()
        .unwrap();
    assert_eq!(servings.count, 255);

    let errors = Servings::validate(&json!({ "count": 300, "portions": 13 }))
        .errors()
        .cloned()
        .unwrap();
    assert_eq!(errors.get("count"), Some(recipe_schemas::messages::TOO_LARGE));
    assert_eq!(errors.get("portions"), Some("too many"));
    assert!(!errors.contains(ROOT_ERROR_KEY));

    let contract = recipe_schemas::export::emit_schema(Servings::schema());
    assert!(contract.contains("v.maxValue(255,"));
}

#[test]
fn test_list_items_and_counts() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Tags {
        #[schema(
            min_items(1, "at least one"),
            max_items(3, "at most three"),
            items(trim, min_length(1, "empty tag"))
        )]
        tags: Vec<String>,
    }

    let tags = Tags::validate(&json!({ "tags": [" soup ", "winter"] }))
        .into_result()
        .unwrap();
    assert_eq!(tags.tags, vec!["soup", "winter"]);

    let message = |input| {
        Tags::validate(&input)
            .errors()
            .and_then(|errors| errors.get("tags").map(str::to_string))
    };
    assert_eq!(message(json!({ "tags": [] })).as_deref(), Some("at least one"));
    assert_eq!(message(json!({ "tags": ["a", "b", "c", "d"] })).as_deref(), Some("at most three"));
    assert_eq!(message(json!({ "tags": ["a", " "] })).as_deref(), Some("empty tag"));
    // Item type errors suppress the count check.
    assert_eq!(
        message(json!({ "tags": [1, 2, 3, 4] })).as_deref(),
        Some(recipe_schemas::messages::INVALID_STRING)
    );
}

// =============================================================================
// Optional fields and defaults
// =============================================================================

#[test]
fn test_option_field_absent_and_present() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Profile {
        #[schema(trim, max_length(10, "too long"))]
        nickname: Option<String>,
    }

    let profile = Profile::validate(&json!({})).into_result().unwrap();
    assert_eq!(profile.nickname, None);

    let profile = Profile::validate(&json!({ "nickname": " dana " }))
        .into_result()
        .unwrap();
    assert_eq!(profile.nickname.as_deref(), Some("dana"));

    // Present null goes through the wrapped rule.
    assert!(!Profile::validate(&json!({ "nickname": null })).is_success());
}

#[test]
fn test_defaults_fill_absent_keys() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[serde(rename_all = "camelCase")]
    struct Settings {
        #[schema(default = 10)]
        page_size: u32,
        #[schema(default = "he")]
        locale: String,
        #[schema(default = true)]
        dark_mode: bool,
    }

    let settings = Settings::validate(&json!({})).into_result().unwrap();
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.locale, "he");
    assert!(settings.dark_mode);

    let input = SettingsInput {
        page_size: Some(25.0),
        locale: None,
        dark_mode: None,
    };
    assert_eq!(serde_json::to_value(&input).unwrap(), json!({ "pageSize": 25.0 }));
    let settings = Settings::validate_input(&input).into_result().unwrap();
    assert_eq!(settings.page_size, 25);
}

// =============================================================================
// Nested, flattened and partial entities
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, EntitySchema)]
#[serde(rename_all = "lowercase")]
#[schema(message = "unknown unit")]
enum Unit {
    Grams,
    Cups,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EntitySchema)]
#[schema(message = "amount required")]
struct Amount {
    #[schema(min(0, "negative"))]
    quantity: f64,
    unit: Unit,
}

#[test]
fn test_enum_picklist() {
    assert_eq!(Unit::validate(&json!("cups")).into_result().unwrap(), Unit::Cups);
    let errors = Unit::validate(&json!("Cups")).errors().cloned().unwrap();
    assert_eq!(errors.get(ROOT_ERROR_KEY), Some("unknown unit"));

    match Unit::schema() {
        Schema::Picklist(rule) => assert_eq!(rule.options, vec!["grams", "cups"]),
        other => panic!("expected picklist, got {}", other.kind_name()),
    }
}

#[test]
fn test_nested_entity_attributed_to_outer_field() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    struct Ingredient {
        name: String,
        amount: Amount,
    }

    let ingredient = Ingredient::validate(&json!({
        "name": "flour",
        "amount": { "quantity": 2, "unit": "cups" },
    }))
    .into_result()
    .unwrap();
    assert_eq!(ingredient.amount.unit, Unit::Cups);

    let errors = Ingredient::validate(&json!({
        "name": "flour",
        "amount": { "quantity": -1, "unit": "cups" },
    }))
    .errors()
    .cloned()
    .unwrap();
    assert_eq!(errors.get("amount"), Some("negative"));
}

#[test]
fn test_flatten_and_cross_check() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[serde(rename_all = "camelCase")]
    #[schema(equal(source = "quantity", target = "confirmQuantity", message = "mismatch"))]
    struct ConfirmedAmount {
        #[serde(flatten)]
        amount: Amount,
        confirm_quantity: f64,
    }

    let keys: Vec<_> = ConfirmedAmount::schema()
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(keys, vec!["quantity", "unit", "confirmQuantity"]);

    let ok = ConfirmedAmount::validate(&json!({
        "quantity": 2, "unit": "grams", "confirmQuantity": 2,
    }));
    assert!(ok.is_success());

    let errors = ConfirmedAmount::validate(&json!({
        "quantity": 2, "unit": "grams", "confirmQuantity": 3,
    }))
    .errors()
    .cloned()
    .unwrap();
    assert_eq!(errors.get("confirmQuantity"), Some("mismatch"));
    assert_eq!(errors.len(), 1);

    // Structural failure elsewhere: the check does not run.
    let errors = ConfirmedAmount::validate(&json!({
        "quantity": 2, "unit": "kg", "confirmQuantity": 3,
    }))
    .errors()
    .cloned()
    .unwrap();
    assert_eq!(errors.get("unit"), Some("unknown unit"));
    assert!(!errors.contains("confirmQuantity"));
}

#[test]
fn test_partial_variant() {
    #[derive(Debug, Serialize, Deserialize, EntitySchema)]
    #[serde(rename_all = "camelCase")]
    #[schema(partial = "PatchAmount")]
    struct NewAmount {
        #[schema(min(0, "negative"))]
        quantity: f64,
        #[schema(default = "grams")]
        unit: Unit,
    }

    let patch = PatchAmount::validate(&json!({})).into_result().unwrap();
    assert_eq!(patch, PatchAmount::default());

    let patch = PatchAmount::validate(&json!({ "quantity": 3 })).into_result().unwrap();
    assert_eq!(patch.quantity, Some(3.0));
    assert_eq!(patch.unit, None);

    let result = PatchAmount::validate(&json!({ "quantity": -3 }));
    assert_eq!(result.errors().unwrap().get("quantity"), Some("negative"));

    let input = PatchAmountInput {
        quantity: None,
        unit: Some(Unit::Cups),
    };
    assert_eq!(serde_json::to_value(&input).unwrap(), json!({ "unit": "cups" }));
    assert_eq!(PatchAmount::schema_name(), "PatchAmountSchema");
}

#[test]
fn test_result_wire_shape() {
    let result: ValidationResult<Amount> = Amount::validate(&json!({ "quantity": 1 }));
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": false, "data": null, "errors": { "unit": "amount required" } })
    );
}
