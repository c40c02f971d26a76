use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::customers::{ActiveModel, Column, Entity as Customers, Model};
use crate::routes::params::{Pagination, Sort, SortOrder};

pub const SORTABLE: &[&str] = &["created_at", "name", "phone_number"];

#[derive(Debug)]
pub struct NewCustomer {
    pub outlet_id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub address: Option<String>,
}

#[derive(Debug, Default)]
pub struct CustomerFilter {
    pub outlet_id: Option<Uuid>,
    pub keyword: Option<String>,
}

#[derive(Debug, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl CustomerPatch {
    pub fn into_active(self, id: Uuid) -> ActiveModel {
        let mut active = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(phone_number) = self.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(address) = self.address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(Utc::now().into());
        active
    }
}

fn sort_column(field: &str) -> Column {
    match field {
        "name" => Column::Name,
        "phone_number" => Column::PhoneNumber,
        _ => Column::CreatedAt,
    }
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewCustomer) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        outlet_id: Set(new.outlet_id),
        name: Set(new.name),
        phone_number: Set(new.phone_number),
        address: Set(new.address),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_and_count<C: ConnectionTrait>(
    conn: &C,
    filter: &CustomerFilter,
    sort: &Sort,
    pagination: &Pagination,
) -> Result<(Vec<Model>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(outlet_id) = filter.outlet_id {
        condition = condition.add(Column::OutletId.eq(outlet_id));
    }
    if let Some(keyword) = filter.keyword.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{keyword}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::PhoneNumber).ilike(pattern)),
        );
    }

    let mut finder = Customers::find().filter(condition);
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
    Customers::find_by_id(id).one(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    patch: CustomerPatch,
) -> Result<Model, DbErr> {
    patch.into_active(id).update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DbErr> {
    let result = Customers::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_leaves_unsupplied_fields_untouched() {
        let active = CustomerPatch {
            phone_number: Some("0812000111".into()),
            ..Default::default()
        }
        .into_active(Uuid::new_v4());

        assert!(active.phone_number.is_set());
        assert!(active.name.is_not_set());
        assert!(active.address.is_not_set());
        assert!(active.outlet_id.is_not_set());
    }
}
