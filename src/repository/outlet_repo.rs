use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::outlets::{ActiveModel, Column, Entity as Outlets, Model};
use crate::routes::params::{Pagination, Sort, SortOrder};

pub const SORTABLE: &[&str] = &["created_at", "name", "code"];

#[derive(Debug)]
pub struct NewOutlet {
    pub name: String,
    pub code: String,
    pub address: String,
}

#[derive(Debug, Default)]
pub struct OutletFilter {
    pub keyword: Option<String>,
}

#[derive(Debug, Default)]
pub struct OutletPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub address: Option<String>,
}

impl OutletPatch {
    pub fn into_active(self, id: Uuid) -> ActiveModel {
        let mut active = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(code) = self.code {
            active.code = Set(code);
        }
        if let Some(address) = self.address {
            active.address = Set(address);
        }
        active.updated_at = Set(Utc::now().into());
        active
    }
}

fn sort_column(field: &str) -> Column {
    match field {
        "name" => Column::Name,
        "code" => Column::Code,
        _ => Column::CreatedAt,
    }
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewOutlet) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        code: Set(new.code),
        address: Set(new.address),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_and_count<C: ConnectionTrait>(
    conn: &C,
    filter: &OutletFilter,
    sort: &Sort,
    pagination: &Pagination,
) -> Result<(Vec<Model>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(keyword) = filter.keyword.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{keyword}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Code).ilike(pattern)),
        );
    }

    let mut finder = Outlets::find().filter(condition);
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

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Outlets::find_by_id(id).one(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    patch: OutletPatch,
) -> Result<Model, DbErr> {
    patch.into_active(id).update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    let result = Outlets::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_sets_only_supplied_fields() {
        let id = Uuid::new_v4();
        let active = OutletPatch {
            name: Some("Main Branch".into()),
            ..Default::default()
        }
        .into_active(id);

        assert!(active.name.is_set());
        assert!(active.code.is_not_set());
        assert!(active.address.is_not_set());
        assert!(active.created_at.is_not_set());
        assert!(active.updated_at.is_set());
    }

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        assert!(matches!(sort_column("nonsense"), Column::CreatedAt));
        assert!(matches!(sort_column("name"), Column::Name));
    }
}
