use async_graphql::SimpleObject;

use crate::services;

/// A venue or artist with how many shows it still has coming up.
#[derive(Debug, Clone, SimpleObject)]
pub struct ListingSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

impl From<services::ListingSummary> for ListingSummary {
    fn from(summary: services::ListingSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            num_upcoming_shows: summary.num_upcoming_shows as i64,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct SearchResults {
    pub count: i64,
    pub data: Vec<ListingSummary>,
}

impl From<services::SearchResult> for SearchResults {
    fn from(result: services::SearchResult) -> Self {
        Self {
            count: result.count as i64,
            data: result.data.into_iter().map(Into::into).collect(),
        }
    }
}
