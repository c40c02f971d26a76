use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entity::perfumes::{Column, Entity as Perfumes, Model};
use crate::routes::params::Pagination;

pub async fn find_and_count<C: ConnectionTrait>(
    conn: &C,
    keyword: Option<&str>,
    pagination: &Pagination,
) -> Result<(Vec<Model>, i64), DbErr> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(keyword) = keyword.filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Name).ilike(format!("%{keyword}%")));
    }

    let finder = Perfumes::find()
        .filter(condition)
        .order_by_asc(Column::Name);

    let total = finder.clone().count(conn).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?;

    Ok((items, total))
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Perfumes::find_by_id(id).one(conn).await
}
