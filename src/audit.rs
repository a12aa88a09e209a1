use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    AccountDelete,
    RecipeCreate,
    RecipeUpdate,
    RecipeDelete,
    RecipeApprove,
    RecipeBulkApproval,
    ReviewSubmit,
    FavoriteAdd,
    FavoriteRemove,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::AccountDelete => "account_delete",
            AuditAction::RecipeCreate => "recipe_create",
            AuditAction::RecipeUpdate => "recipe_update",
            AuditAction::RecipeDelete => "recipe_delete",
            AuditAction::RecipeApprove => "recipe_approve",
            AuditAction::RecipeBulkApproval => "recipe_bulk_approval",
            AuditAction::ReviewSubmit => "review_submit",
            AuditAction::FavoriteAdd => "favorite_add",
            AuditAction::FavoriteRemove => "favorite_remove",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::UserRegister | AuditAction::UserLogin | AuditAction::AccountDelete => {
                "users"
            }
            AuditAction::RecipeCreate
            | AuditAction::RecipeUpdate
            | AuditAction::RecipeDelete
            | AuditAction::RecipeApprove
            | AuditAction::RecipeBulkApproval => "crazy_recipes",
            AuditAction::ReviewSubmit => "crazy_recipe_reviews",
            AuditAction::FavoriteAdd | AuditAction::FavoriteRemove => "favorites",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Best-effort audit write: failures are logged, never returned.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
