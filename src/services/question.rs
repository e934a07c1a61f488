use std::sync::Arc;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::error::{AppError, AppResult};
use crate::query_builder::{apply_pagination, apply_text_search, page_window, text_matches};
use crate::services::PaginatedResult;
use crate::services::validation::Validator;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

#[derive(Debug, Clone)]
pub struct QuestionForm {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i32,
}

impl QuestionForm {
    /// Field checks plus the category lookup, run against `conn` so callers can
    /// keep both inside their transaction.
    async fn apply_to<C: ConnectionTrait>(
        self,
        conn: &C,
        mut active: entities::question::ActiveModel,
    ) -> AppResult<entities::question::ActiveModel> {
        let mut v = Validator::new();
        let question = v.required("question", &self.question);
        let answer = v.required("answer", &self.answer);
        let difficulty = v.range("difficulty", self.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY);
        v.finish()?;

        let category = entities::category::Entity::find_by_id(self.category)
            .one(conn)
            .await?;
        if category.is_none() {
            return Err(AppError::Referential(format!(
                "No such category id {}. Question could not be saved.",
                self.category
            )));
        }

        active.question = Set(question);
        active.answer = Set(answer);
        active.category_id = Set(self.category);
        active.difficulty = Set(difficulty);
        Ok(active)
    }
}

pub struct QuestionService {
    db: Arc<Database>,
}

impl QuestionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> AppResult<u64> {
        let total = entities::question::Entity::find()
            .count(&self.db.conn)
            .await?;
        Ok(total)
    }

    /// One page of all questions, ordered by id.
    pub async fn list_page(
        &self,
        page: Option<u64>,
        page_size: u64,
    ) -> AppResult<PaginatedResult<entities::question::Model>> {
        let query = entities::question::Entity::find();
        self.paginate(query, page, page_size).await
    }

    /// Case-insensitive substring search on the question text.
    pub async fn search(
        &self,
        search_term: &str,
        page: Option<u64>,
        page_size: u64,
    ) -> AppResult<PaginatedResult<entities::question::Model>> {
        let matches: Vec<_> = apply_text_search(
            entities::question::Entity::find().order_by_asc(entities::question::Column::Id),
            entities::question::Column::Question,
            search_term,
        )
        .all(&self.db.conn)
        .await?
        .into_iter()
        .filter(|question| text_matches(&question.question, search_term))
        .collect();

        let (offset, limit) = page_window(page, page_size);
        let result = PaginatedResult {
            total_count: matches.len() as u64,
            page: offset / limit + 1,
            page_size,
            items: matches
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
        };

        log::debug!(
            "Question search '{}' matched {} questions",
            search_term,
            result.total_count
        );
        Ok(result)
    }

    /// Questions of one category. An unknown category is a not-found.
    pub async fn by_category(
        &self,
        category_id: i64,
        page: Option<u64>,
        page_size: u64,
    ) -> AppResult<(entities::category::Model, PaginatedResult<entities::question::Model>)> {
        let category = entities::category::Entity::find_by_id(category_id)
            .one(&self.db.conn)
            .await?
            .ok_or(AppError::not_found("Category", category_id))?;

        let query = entities::question::Entity::find()
            .filter(entities::question::Column::CategoryId.eq(category_id));
        let result = self.paginate(query, page, page_size).await?;
        Ok((category, result))
    }

    pub async fn create(&self, form: QuestionForm) -> AppResult<entities::question::Model> {
        let txn = self.db.conn.begin().await?;

        let model = form
            .apply_to(&txn, entities::question::ActiveModel::new())
            .await?
            .insert(&txn)
            .await?;
        txn.commit().await?;

        log::info!(
            "Question created (ID: {}, category: {}, difficulty: {})",
            model.id,
            model.category_id,
            model.difficulty
        );
        Ok(model)
    }

    pub async fn update(
        &self,
        question_id: i64,
        form: QuestionForm,
    ) -> AppResult<entities::question::Model> {
        let txn = self.db.conn.begin().await?;

        let existing = entities::question::Entity::find_by_id(question_id)
            .one(&txn)
            .await?
            .ok_or(AppError::not_found("Question", question_id))?;

        let model = form
            .apply_to(&txn, existing.into())
            .await?
            .update(&txn)
            .await?;
        txn.commit().await?;

        log::info!("Question updated (ID: {})", model.id);
        Ok(model)
    }

    pub async fn delete(&self, question_id: i64) -> AppResult<()> {
        let txn = self.db.conn.begin().await?;

        let result = entities::question::Entity::delete_by_id(question_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Question", question_id));
        }

        txn.commit().await?;
        log::info!("Question deleted (ID: {})", question_id);
        Ok(())
    }

    async fn paginate(
        &self,
        query: sea_orm::Select<entities::question::Entity>,
        page: Option<u64>,
        page_size: u64,
    ) -> AppResult<PaginatedResult<entities::question::Model>> {
        let total_count = query.clone().count(&self.db.conn).await?;

        let query = query.order_by_asc(entities::question::Column::Id);
        let (query, page) = apply_pagination(query, page, page_size);
        let items = query.all(&self.db.conn).await?;

        Ok(PaginatedResult {
            items,
            total_count,
            page,
            page_size,
        })
    }
}
