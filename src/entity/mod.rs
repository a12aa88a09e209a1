pub mod audit_logs;
pub mod crazy_recipe_reviews;
pub mod crazy_recipes;
pub mod favorites;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use crazy_recipe_reviews::Entity as CrazyRecipeReviews;
pub use crazy_recipes::Entity as CrazyRecipes;
pub use favorites::Entity as Favorites;
pub use users::Entity as Users;
