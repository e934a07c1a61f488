use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::database::Database;
use crate::entities;
use crate::error::AppResult;

/// Which questions a quiz draws from. Category id 0 on the wire means any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCategory {
    Any,
    Category(i64),
}

impl From<i64> for QuizCategory {
    fn from(id: i64) -> Self {
        if id == 0 {
            QuizCategory::Any
        } else {
            QuizCategory::Category(id)
        }
    }
}

/// Uniformly pick one candidate whose id has not been presented yet.
pub fn pick_unseen<R: Rng + ?Sized>(
    candidates: Vec<entities::question::Model>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Option<entities::question::Model> {
    let unseen: Vec<_> = candidates
        .into_iter()
        .filter(|question| !previous.contains(&question.id))
        .collect();
    unseen.choose(rng).cloned()
}

pub struct QuizService {
    db: Arc<Database>,
}

impl QuizService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Next question for a session, or `None` once every candidate has been seen.
    #[instrument(skip(self, previous), fields(num_previous = previous.len()))]
    pub async fn next_question(
        &self,
        category: QuizCategory,
        previous: &HashSet<i64>,
    ) -> AppResult<Option<entities::question::Model>> {
        let mut query = entities::question::Entity::find();
        if let QuizCategory::Category(category_id) = category {
            query = query.filter(entities::question::Column::CategoryId.eq(category_id));
        }
        let candidates = query.all(&self.db.conn).await?;

        let picked = pick_unseen(candidates, previous, &mut rand::thread_rng());
        match &picked {
            Some(question) => log::debug!(
                "Quiz ({:?}) picked question {} after {} previous",
                category,
                question.id,
                previous.len()
            ),
            None => log::debug!("Quiz ({:?}) exhausted after {} questions", category, previous.len()),
        }
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::category::CategoryService;
    use crate::services::question::QuestionService;
    use crate::services::question::tests::question_form;
    use crate::test_utils::test_db;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(id: i64, category_id: i64) -> entities::question::Model {
        entities::question::Model {
            id,
            question: format!("Question {id}"),
            answer: "Answer".to_string(),
            category_id,
            difficulty: 1,
        }
    }

    #[test]
    fn test_category_sentinel() {
        assert_eq!(QuizCategory::from(0), QuizCategory::Any);
        assert_eq!(QuizCategory::from(4), QuizCategory::Category(4));
    }

    #[test]
    fn test_pick_unseen_never_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let previous: HashSet<i64> = [1, 3, 5].into_iter().collect();

        for _ in 0..100 {
            let candidates = (1..=6).map(|id| question(id, 1)).collect();
            let picked = pick_unseen(candidates, &previous, &mut rng).unwrap();
            assert!(!previous.contains(&picked.id));
        }
    }

    #[test]
    fn test_pick_unseen_reaches_every_candidate() {
        let mut rng = StdRng::seed_from_u64(42);
        let previous = HashSet::new();

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let candidates = (1..=4).map(|id| question(id, 1)).collect();
            seen.insert(pick_unseen(candidates, &previous, &mut rng).unwrap().id);
        }
        assert_eq!(seen, (1..=4).collect());
    }

    #[test]
    fn test_pick_unseen_exhausted_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let previous: HashSet<i64> = [1, 2, 3].into_iter().collect();
        let candidates = (1..=3).map(|id| question(id, 1)).collect();

        assert!(pick_unseen(candidates, &previous, &mut rng).is_none());
        assert!(pick_unseen(Vec::new(), &HashSet::new(), &mut rng).is_none());
    }

    #[tokio::test]
    async fn test_next_question_by_category() {
        let db = test_db().await;
        let categories = CategoryService::new(db.clone());
        categories.seed_defaults().await.unwrap();
        let all = categories.list().await.unwrap();
        let (science, art) = (all[0].id, all[1].id);

        let questions = QuestionService::new(db.clone());
        let mut science_ids = HashSet::new();
        for i in 0..3 {
            let q = questions
                .create(question_form(&format!("Science {i}"), science))
                .await
                .unwrap();
            science_ids.insert(q.id);
        }
        questions
            .create(question_form("Art 0", art))
            .await
            .unwrap();

        let quiz = QuizService::new(db);
        let mut previous = HashSet::new();
        for _ in 0..3 {
            let next = quiz
                .next_question(QuizCategory::Category(science), &previous)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(next.category_id, science);
            assert!(previous.insert(next.id));
        }
        assert_eq!(previous, science_ids);

        let done = quiz
            .next_question(QuizCategory::Category(science), &previous)
            .await
            .unwrap();
        assert!(done.is_none());

        let any = quiz
            .next_question(QuizCategory::Any, &previous)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(any.category_id, art);
    }

    #[tokio::test]
    async fn test_next_question_with_long_history() {
        let db = test_db().await;
        let categories = CategoryService::new(db.clone());
        categories.seed_defaults().await.unwrap();
        let science = categories.list().await.unwrap()[0].id;
        let stored = QuestionService::new(db.clone())
            .create(question_form("Science 0", science))
            .await
            .unwrap();

        let quiz = QuizService::new(db);
        let mut previous: HashSet<i64> = (100_000..140_000).collect();

        let next = quiz
            .next_question(QuizCategory::Any, &previous)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(next.id, stored.id);

        previous.insert(stored.id);
        let done = quiz.next_question(QuizCategory::Any, &previous).await.unwrap();
        assert!(done.is_none());
    }

    #[tokio::test]
    async fn test_next_question_unknown_category_is_none() {
        let db = test_db().await;
        let quiz = QuizService::new(db);

        let next = quiz
            .next_question(QuizCategory::Category(99), &HashSet::new())
            .await
            .unwrap();
        assert!(next.is_none());
    }
}
