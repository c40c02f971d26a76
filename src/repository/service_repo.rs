use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::service_categories::{
    ActiveModel as CategoryActive, Column as CategoryCol, Entity as ServiceCategories,
    Model as CategoryModel,
};
use crate::entity::services::{ActiveModel, Column, Entity as Services, Model};
use crate::routes::params::{Pagination, Sort, SortOrder};

pub const SORTABLE: &[&str] = &["created_at", "name", "price"];

#[derive(Debug)]
pub struct NewServiceCategory {
    pub name: String,
}

#[derive(Debug)]
pub struct NewService {
    pub outlet_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub price: i64,
    pub unit: String,
}

#[derive(Debug, Default)]
pub struct ServiceFilter {
    pub outlet_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub keyword: Option<String>,
}

#[derive(Debug, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

impl ServicePatch {
    pub fn into_active(self, id: Uuid) -> ActiveModel {
        let mut active = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(unit) = self.unit {
            active.unit = Set(unit);
        }
        if let Some(category_id) = self.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(Utc::now().into());
        active
    }
}

fn sort_column(field: &str) -> Column {
    match field {
        "name" => Column::Name,
        "price" => Column::Price,
        _ => Column::CreatedAt,
    }
}

pub async fn create_category<C: ConnectionTrait>(
    conn: &C,
    new: NewServiceCategory,
) -> Result<CategoryModel, DbErr> {
    CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        created_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_category_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<CategoryModel>, DbErr> {
    ServiceCategories::find_by_id(id).one(conn).await
}

pub async fn find_and_count_categories<C: ConnectionTrait>(
    conn: &C,
    keyword: Option<&str>,
    pagination: &Pagination,
) -> Result<(Vec<CategoryModel>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(keyword) = keyword.filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(CategoryCol::Name).ilike(format!("%{keyword}%")));
    }

    let finder = ServiceCategories::find()
        .filter(condition)
        .order_by_asc(CategoryCol::Name);

    let total = finder.clone().count(conn).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;

    Ok((items, total))
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewService) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(new.outlet_id),
        category_id: Set(new.category_id),
        name: Set(new.name),
        price: Set(new.price),
        unit: Set(new.unit),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_and_count<C: ConnectionTrait>(
    conn: &C,
    filter: &ServiceFilter,
    sort: &Sort,
    pagination: &Pagination,
) -> Result<(Vec<Model>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(outlet_id) = filter.outlet_id {
        condition = condition.add(Column::OutletId.eq(outlet_id));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(keyword) = filter.keyword.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Name).ilike(format!("%{keyword}%")));
    }

    let mut finder = Services::find().filter(condition);
    let column = sort_column(&sort.field);
    finder = match sort.order {
        SortOrder::Asc => finder.order_by_asc(column),
        SortOrder::Desc => finder.order_by_desc(column),
    };

    let total = finder.clone().count(conn).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;

    Ok((items, total))
}

/// Single service together with its category.
pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<(Model, Option<CategoryModel>)>, DbErr> {
    Services::find_by_id(id)
        .find_also_related(ServiceCategories)
        .one(conn)
        .await
}

/// Services referenced by order line items, keyed by id.
pub async fn find_by_ids<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<Uuid>,
) -> Result<Vec<Model>, DbErr> {
    Services::find()
        .filter(Column::Id.is_in(ids))
        .all(conn)
        .await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    patch: ServicePatch,
) -> Result<Model, DbErr> {
    patch.into_active(id).update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    let result = Services::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_sets_only_supplied_fields() {
        let active = ServicePatch {
            price: Some(15000),
            ..Default::default()
        }
        .into_active(Uuid::new_v4());

        assert!(active.price.is_set());
        assert!(active.name.is_not_set());
        assert!(active.unit.is_not_set());
        assert!(active.category_id.is_not_set());
        assert!(active.outlet_id.is_not_set());
    }
}
