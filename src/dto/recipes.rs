use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, models::CrazyRecipe};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub cooking_time: i32,
    pub is_veg: bool,
    pub image_url: Option<String>,
}

impl CreateRecipeRequest {
    /// Trim text fields, drop blank ingredients and reject incomplete recipes.
    pub fn validate(self) -> Result<Self, AppError> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let instructions = required("instructions", &self.instructions)?;
        let ingredients = clean_ingredients(self.ingredients)?;
        check_cooking_time(self.cooking_time)?;
        Ok(Self {
            title,
            description,
            ingredients,
            instructions,
            cooking_time: self.cooking_time,
            is_veg: self.is_veg,
            image_url: clean_optional(self.image_url),
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub cooking_time: Option<i32>,
    pub is_veg: Option<bool>,
    pub image_url: Option<String>,
}

impl UpdateRecipeRequest {
    /// Same rules as creation, applied only to the fields being changed.
    pub fn validate(self) -> Result<Self, AppError> {
        let title = self.title.map(|t| required("title", &t)).transpose()?;
        let description = self
            .description
            .map(|d| required("description", &d))
            .transpose()?;
        let instructions = self
            .instructions
            .map(|i| required("instructions", &i))
            .transpose()?;
        let ingredients = self.ingredients.map(clean_ingredients).transpose()?;
        if let Some(minutes) = self.cooking_time {
            check_cooking_time(minutes)?;
        }
        Ok(Self {
            title,
            description,
            ingredients,
            instructions,
            cooking_time: self.cooking_time,
            is_veg: self.is_veg,
            image_url: self.image_url,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn clean_ingredients(ingredients: Vec<String>) -> Result<Vec<String>, AppError> {
    let cleaned: Vec<String> = ingredients
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(AppError::BadRequest(
            "at least one ingredient is required".into(),
        ));
    }
    Ok(cleaned)
}

fn check_cooking_time(minutes: i32) -> Result<(), AppError> {
    if minutes <= 0 {
        return Err(AppError::BadRequest(
            "cooking_time must be a positive number of minutes".into(),
        ));
    }
    Ok(())
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkApprovalRequest {
    pub recipe_ids: Vec<Uuid>,
    pub approved: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkApprovalResponse {
    pub updated: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecipeList {
    #[schema(value_type = Vec<CrazyRecipe>)]
    pub items: Vec<CrazyRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: "  Pickle Ice Cream ".into(),
            description: "Sweet and sour".into(),
            ingredients: vec!["pickles".into(), "  ".into(), " cream ".into()],
            instructions: "Churn.".into(),
            cooking_time: 30,
            is_veg: true,
            image_url: Some("   ".into()),
        }
    }

    #[test]
    fn create_request_is_trimmed_and_cleaned() {
        let req = draft().validate().expect("valid recipe");
        assert_eq!(req.title, "Pickle Ice Cream");
        assert_eq!(req.ingredients, vec!["pickles", "cream"]);
        assert_eq!(req.image_url, None);
    }

    #[test]
    fn create_request_rejects_blank_title() {
        let mut req = draft();
        req.title = "   ".into();
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn create_request_requires_an_ingredient() {
        let mut req = draft();
        req.ingredients = vec!["".into(), " ".into()];
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn create_request_rejects_non_positive_cooking_time() {
        let mut req = draft();
        req.cooking_time = 0;
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn update_request_only_checks_present_fields() {
        let req = UpdateRecipeRequest {
            is_veg: Some(false),
            ..Default::default()
        };
        let req = req.validate().expect("nothing to reject");
        assert_eq!(req.title, None);

        let bad = UpdateRecipeRequest {
            instructions: Some(" ".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
