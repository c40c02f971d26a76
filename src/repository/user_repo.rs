use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::users::{ActiveModel, Column, Entity as Users, Model};

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

pub async fn create<C: ConnectionTrait>(conn: &C, new: NewUser) -> Result<Model, DbErr> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        email: Set(new.email),
        phone_number: Set(new.phone_number),
        password_hash: Set(new.password_hash),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<Model>, DbErr> {
    Users::find()
        .filter(Column::Email.eq(email))
        .one(conn)
        .await
}
