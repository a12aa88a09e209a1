use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipeFilterType {
    #[default]
    All,
    Veg,
    NonVeg,
}

impl RecipeFilterType {
    /// Required value of `is_veg`, if any.
    pub fn is_veg(&self) -> Option<bool> {
        match self {
            RecipeFilterType::All => None,
            RecipeFilterType::Veg => Some(true),
            RecipeFilterType::NonVeg => Some(false),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSortBy {
    #[default]
    Newest,
    Popular,
    Views,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    pub filter_type: Option<RecipeFilterType>,
    pub sort_by: Option<RecipeSortBy>,
    pub approved_only: Option<bool>,
}

impl RecipeQuery {
    // Pagination is not flattened: query-string deserialization loses
    // numeric types through `#[serde(flatten)]`.
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// Search term with surrounding whitespace removed; blank means no search.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorRecipesQuery {
    pub include_unapproved: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Count this author's recipes in `user_recipes`.
    pub author_id: Option<uuid::Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewerQuery {
    /// Comma separated reviewer names.
    pub reviewers: Option<String>,
}

impl ReviewerQuery {
    pub fn names(&self) -> Vec<String> {
        self.reviewers
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteAccountQuery {
    /// Optional free-text reason, kept in the audit log.
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));

        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.normalize(), (3, 10, 20));
    }

    #[test]
    fn huge_page_saturates_offset() {
        let query = RecipeQuery {
            page: Some(i64::MAX),
            per_page: Some(100),
            ..Default::default()
        };
        let (page, per_page, offset) = query.pagination().normalize();
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);

        let p = Pagination {
            page: Some(i64::MIN),
            per_page: Some(i64::MIN),
        };
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn filter_type_maps_to_is_veg() {
        assert_eq!(RecipeFilterType::All.is_veg(), None);
        assert_eq!(RecipeFilterType::Veg.is_veg(), Some(true));
        assert_eq!(RecipeFilterType::NonVeg.is_veg(), Some(false));
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let query = RecipeQuery {
            q: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), None);

        let query = RecipeQuery {
            q: Some(" tofu ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), Some("tofu"));
    }

    #[test]
    fn reviewer_names_are_split_and_trimmed() {
        let query = ReviewerQuery {
            reviewers: Some("ana, bo,,  ".into()),
        };
        assert_eq!(query.names(), vec!["ana", "bo"]);
        assert!(ReviewerQuery::default().names().is_empty());
    }
}
