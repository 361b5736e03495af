//! The entities the application accepts.
//!
//! Each write operation has exactly one entity. The output shape is the
//! struct itself; its pre-validation shape is the generated `{Name}Input`.

pub mod ids;
pub mod recipe;
pub mod user;

pub use ids::{RecipeId, UserId};
pub use recipe::{
    CreateRecipe, CreateRecipeInput, KosherType, RateRecipe, RateRecipeInput, UpdateRecipe,
    UpdateRecipeInput,
};
pub use user::{
    Login, LoginInput, Register, RegisterInput, RegisterWithConfirm, RegisterWithConfirmInput,
    UserRole,
};
