//! SeaORM implementation of AdminRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use crate::domain::admin::{Admin, AdminRepository, NewAdmin};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::admin;

pub struct SeaOrmAdminRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdminRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: admin::Model) -> Admin {
    Admin {
        id: m.id,
        username: m.username,
        password_hash: m.password_hash,
        name: m.name,
        email: m.email,
        created_at: m.created_at,
    }
}

fn insert_err(e: sea_orm::DbErr) -> DomainError {
    if matches!(e.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))) {
        DomainError::Conflict("Email or username already exists".to_string())
    } else {
        DomainError::from(e)
    }
}

#[async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn create(&self, new: NewAdmin) -> DomainResult<Admin> {
        let model = admin::ActiveModel {
            username: Set(new.username),
            password_hash: Set(new.password_hash),
            name: Set(new.name),
            email: Set(new.email),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(insert_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Admin>> {
        let model = admin::Entity::find()
            .filter(admin::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Admin>> {
        let model = admin::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(admin::Entity::find().count(&self.db).await?)
    }
}
