use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::entities;

pub mod categories;
pub mod questions;
pub mod quizzes;

/// A question as the trivia frontend reads it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QuestionJson {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i32,
}

impl From<entities::question::Model> for QuestionJson {
    fn from(model: entities::question::Model) -> Self {
        Self {
            id: model.id,
            question: model.question,
            answer: model.answer,
            category: model.category_id,
            difficulty: model.difficulty,
        }
    }
}

/// `{"<id>": "<type>"}`, ordered by id.
pub fn category_map(categories: Vec<entities::category::Model>) -> BTreeMap<i64, String> {
    categories
        .into_iter()
        .map(|category| (category.id, category.kind))
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Text(String),
}

/// Accepts `3` as well as `"3"`; the trivia frontend posts select values as strings.
pub fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: std::fmt::Display,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Value(value) => Ok(value),
        Lenient::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
