pub mod artist;
pub mod category;
pub mod question;
pub mod quiz;
pub mod schedule;
pub mod show;
pub mod validation;
pub mod venue;

#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

/// One venue or artist as it appears in listings and search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub count: usize,
    pub data: Vec<ListingSummary>,
}

impl From<Vec<ListingSummary>> for SearchResult {
    fn from(data: Vec<ListingSummary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}
