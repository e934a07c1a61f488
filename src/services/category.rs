use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use tracing::instrument;

use crate::database::Database;
use crate::entities;
use crate::error::{AppError, AppResult};
use crate::services::validation::Validator;

/// Categories the trivia game ships with.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

pub struct CategoryService {
    db: Arc<Database>,
}

impl CategoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<entities::category::Model>> {
        let categories = entities::category::Entity::find()
            .order_by_asc(entities::category::Column::Id)
            .all(&self.db.conn)
            .await?;
        Ok(categories)
    }

    pub async fn get(&self, category_id: i64) -> AppResult<entities::category::Model> {
        entities::category::Entity::find_by_id(category_id)
            .one(&self.db.conn)
            .await?
            .ok_or(AppError::not_found("Category", category_id))
    }

    pub async fn create(&self, kind: &str) -> AppResult<entities::category::Model> {
        let kind = validated_kind(kind)?;

        let txn = self.db.conn.begin().await?;
        ensure_unique(&txn, &kind, None).await?;
        let model = entities::category::ActiveModel {
            id: NotSet,
            kind: Set(kind),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!("Category created: '{}' (ID: {})", model.kind, model.id);
        Ok(model)
    }

    pub async fn update(&self, category_id: i64, kind: &str) -> AppResult<entities::category::Model> {
        let kind = validated_kind(kind)?;

        let txn = self.db.conn.begin().await?;
        let existing = entities::category::Entity::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or(AppError::not_found("Category", category_id))?;
        ensure_unique(&txn, &kind, Some(category_id)).await?;

        let mut active: entities::category::ActiveModel = existing.into();
        active.kind = Set(kind);
        let model = active.update(&txn).await?;
        txn.commit().await?;

        log::info!("Category updated: '{}' (ID: {})", model.kind, model.id);
        Ok(model)
    }

    /// Delete an unused category. Categories that still hold questions are kept.
    pub async fn delete(&self, category_id: i64) -> AppResult<()> {
        let txn = self.db.conn.begin().await?;

        let category = entities::category::Entity::find_by_id(category_id)
            .one(&txn)
            .await?
            .ok_or(AppError::not_found("Category", category_id))?;

        let in_use = entities::question::Entity::find()
            .filter(entities::question::Column::CategoryId.eq(category_id))
            .count(&txn)
            .await?;
        if in_use > 0 {
            return Err(AppError::Referential(format!(
                "Category '{}' still has {in_use} questions",
                category.kind
            )));
        }

        entities::category::Entity::delete_by_id(category_id)
            .exec(&txn)
            .await?;
        txn.commit().await?;
        log::info!("Category deleted (ID: {})", category_id);
        Ok(())
    }

    /// Insert any missing default category. Returns how many were added.
    #[instrument(skip(self))]
    pub async fn seed_defaults(&self) -> AppResult<usize> {
        let txn = self.db.conn.begin().await?;

        let existing: Vec<String> = entities::category::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|category| category.kind)
            .collect();

        let mut added = 0;
        for kind in DEFAULT_CATEGORIES
            .iter()
            .filter(|kind| !existing.iter().any(|e| e == *kind))
        {
            entities::category::ActiveModel {
                id: NotSet,
                kind: Set(kind.to_string()),
            }
            .insert(&txn)
            .await?;
            added += 1;
        }

        txn.commit().await?;
        log::info!("Seeded {} default categories", added);
        Ok(added)
    }
}

fn validated_kind(kind: &str) -> AppResult<String> {
    let mut v = Validator::new();
    let kind = v.required("type", kind);
    v.finish()?;
    Ok(kind)
}

async fn ensure_unique(
    txn: &impl sea_orm::ConnectionTrait,
    kind: &str,
    except_id: Option<i64>,
) -> AppResult<()> {
    let clash = entities::category::Entity::find()
        .filter(entities::category::Column::Kind.eq(kind))
        .one(txn)
        .await?;
    match clash {
        Some(other) if Some(other.id) != except_id => Err(AppError::Validation(format!(
            "category '{kind}' already exists"
        ))),
        _ => Ok(()),
    }
}
