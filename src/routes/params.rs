use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A validated sort target. Built from `field` / `-field` tokens, with
/// unknown fields falling back to the caller's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }

    pub fn as_sql(&self) -> String {
        format!("{} {}", self.field, self.order.as_sql())
    }
}

pub fn parse_sort(token: Option<&str>, default: Sort, allowed: &[&str]) -> Sort {
    let Some(raw) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return default;
    };
    let (field, order) = match raw.strip_prefix('-') {
        Some(rest) => (rest, SortOrder::Desc),
        None => (raw, SortOrder::Asc),
    };
    if allowed.contains(&field) {
        Sort {
            field: field.to_string(),
            order,
        }
    } else {
        default
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendGranularity {
    #[default]
    Weekly,
    Monthly,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListOutletQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub sort: Option<String>,
}

impl ListOutletQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListCustomerQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub outlet_id: Option<Uuid>,
    pub sort: Option<String>,
}

impl ListCustomerQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListServiceCategoryQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
}

impl ListServiceCategoryQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListServiceQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub outlet_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub sort: Option<String>,
}

impl ListServiceQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListPerfumeQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
}

impl ListPerfumeQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListPaymentMethodQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
}

impl ListPaymentMethodQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListOrderQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub keyword: Option<String>,
    pub outlet_id: Option<Uuid>,
    pub status: Option<String>,
    pub paid: Option<bool>,
    pub sort: Option<String>,
}

impl ListOrderQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderSummaryQuery {
    pub outlet_id: Option<Uuid>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderTrendQuery {
    pub outlet_id: Option<Uuid>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub granularity: TrendGranularity,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CustomerSummaryQuery {
    pub outlet_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_defaults_and_offsets() {
        let (page, per_page, offset) = Pagination::default().normalize();
        assert_eq!((page, per_page, offset), (1, 20, 0));

        let (page, per_page, offset) = Pagination {
            page: Some(3),
            per_page: Some(20),
        }
        .normalize();
        assert_eq!((page, per_page, offset), (3, 20, 40));
    }

    #[test]
    fn normalize_guards_bad_input() {
        let (page, per_page, offset) = Pagination {
            page: Some(0),
            per_page: Some(0),
        }
        .normalize();
        assert_eq!(page, 1);
        assert_eq!(per_page, 1);
        assert_eq!(offset, 0);

        let (_, per_page, _) = Pagination {
            page: Some(-5),
            per_page: Some(1000),
        }
        .normalize();
        assert_eq!(per_page, 100);
    }

    #[test]
    fn sort_token_parses_direction_prefix() {
        let allowed = &["created_at", "name", "total_amount"];
        let default = Sort::desc("created_at");

        assert_eq!(
            parse_sort(Some("name"), default.clone(), allowed),
            Sort::asc("name")
        );
        assert_eq!(
            parse_sort(Some("-total_amount"), default.clone(), allowed),
            Sort::desc("total_amount")
        );
        assert_eq!(parse_sort(None, default.clone(), allowed), default);
        assert_eq!(parse_sort(Some("  "), default.clone(), allowed), default);
    }

    #[test]
    fn sort_token_rejects_unknown_fields() {
        let allowed = &["created_at", "name"];
        let default = Sort::desc("created_at");
        assert_eq!(
            parse_sort(Some("password_hash"), default.clone(), allowed),
            default
        );
        assert_eq!(
            parse_sort(Some("name; DROP TABLE orders"), default.clone(), allowed),
            default
        );
    }

    #[test]
    fn sort_renders_sql_fragment() {
        assert_eq!(Sort::desc("created_at").as_sql(), "created_at DESC");
        assert_eq!(Sort::asc("name").as_sql(), "name ASC");
    }
}
