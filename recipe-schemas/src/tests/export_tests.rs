//! Tests for the browser contract module

use crate::entities::{CreateRecipe, KosherType, RegisterWithConfirm};
use crate::export::{ExportConfig, emit_schema, generate_entry, generate_module};
use crate::registry::{SchemaEntry, SchemaRegistry};
use crate::EntitySchema;

#[test]
fn test_module_layout() {
    let module = generate_module(&SchemaRegistry::builtin(), &ExportConfig::default());

    assert!(module.starts_with("import * as v from 'valibot';\n\n"));
    assert!(module.contains("export const ROOT_ERROR_KEY = \"_root\";"));
    assert!(module.contains("export type ValidationResult<T> ="));
    assert!(module.contains("export function validate<T extends v.GenericSchema>("));

    let kosher = module.find("export const KosherTypeSchema").unwrap();
    let create = module.find("export const CreateRecipeSchema").unwrap();
    let update = module.find("export const UpdateRecipeSchema").unwrap();
    assert!(kosher < create && create < update);
}

#[test]
fn test_module_is_deterministic() {
    let config = ExportConfig::default().with_preamble("// header");
    let registry = SchemaRegistry::builtin();
    assert_eq!(
        generate_module(&registry, &config),
        generate_module(&registry, &config)
    );
    assert!(generate_module(&registry, &config).starts_with("// header\n\n"));
}

#[test]
fn test_module_without_runtime_or_types() {
    let config = ExportConfig::new()
        .with_import(false)
        .with_types(false)
        .with_runtime(false);
    let module = generate_module(&SchemaRegistry::builtin(), &config);

    assert!(module.starts_with("export const KosherTypeSchema"));
    assert!(!module.contains("InferInput"));
    assert!(!module.contains("ROOT_ERROR_KEY"));
}

#[test]
fn test_entry_type_aliases() {
    let entry = generate_entry(&SchemaEntry::of::<KosherType>(), &ExportConfig::default());
    assert_eq!(
        entry,
        "export const KosherTypeSchema = v.picklist([\"Parve\", \"Dairy\", \"Meat\"], \"סוג כשרות לא תקין\");\n\
         export type KosherTypeInput = v.InferInput<typeof KosherTypeSchema>;\n\
         export type KosherTypeOutput = v.InferOutput<typeof KosherTypeSchema>;\n"
    );
}

#[test]
fn test_create_recipe_contract() {
    let schema = emit_schema(CreateRecipe::schema());

    assert!(schema.contains(
        "title: v.pipe(v.string(\"ערך חייב להיות טקסט\"), v.trim(), v.minLength(2, \"שם המתכון חייב להכיל לפחות 2 תווים\"), v.maxLength(200, \"שם המתכון ארוך מדי\")),"
    ));
    assert!(schema.contains("v.minLength(1, \"נדרש לפחות מרכיב אחד\")"));
    assert!(schema.contains("v.minValue(1, \"זמן הכנה חייב להיות לפחות דקה אחת\")"));
    assert!(schema.contains("v.integer(\"רמת קושי חייבת להיות מספר שלם\")"));
    assert!(schema.contains("imageUrl: v.optional(v.pipe(v.string(\"ערך חייב להיות טקסט\"), v.trim()), \"\"),"));
    assert!(schema.contains("isYemeni: v.optional(v.boolean(\"ערך חייב להיות כן או לא\"), false),"));
    assert!(schema.contains("\"Meat\"], \"סוג כשרות לא תקין\"), \"Parve\"),"));
    assert!(schema.ends_with("}, \"נדרשים פרטי מתכון\")"));
}

#[test]
fn test_confirm_contract_uses_raw_check() {
    let schema = emit_schema(RegisterWithConfirm::schema());
    assert!(schema.starts_with("v.pipe(v.object({"));
    assert!(schema.contains("confirmPassword: v.string(\"ערך חייב להיות טקסט\"),"));
    assert!(schema.contains("dataset.value[\"password\"] !== dataset.value[\"confirmPassword\"]"));
    assert!(schema.contains("message: \"הסיסמאות אינן תואמות\""));
}
