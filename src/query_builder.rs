use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

/// Offset and limit for a 1-indexed page. Pages below 1 are read as page 1.
pub fn page_window(page: Option<u64>, page_size: u64) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.max(1);
    ((page - 1).saturating_mul(page_size), page_size)
}

/// Apply pagination to a pre-ordered query.
/// Returns the modified query along with the page number actually used.
/// A page past the end simply selects nothing.
pub fn apply_pagination<T: EntityTrait>(
    query: sea_orm::Select<T>,
    page: Option<u64>,
    page_size: u64,
) -> (sea_orm::Select<T>, u64) {
    let (offset, limit) = page_window(page, page_size);
    let page = offset / limit + 1;

    (query.limit(limit).offset(offset), page)
}

/// Narrow a query to rows whose column contains `search_term`.
///
/// SQLite's LIKE only folds ASCII case, so a term with non-ASCII characters is
/// left unfiltered here. Callers confirm every row with [`text_matches`].
pub fn apply_text_search<T, C>(
    query: sea_orm::Select<T>,
    column: C,
    search_term: &str,
) -> sea_orm::Select<T>
where
    T: EntityTrait,
    C: ColumnTrait,
{
    if search_term.is_empty() || !search_term.is_ascii() {
        return query;
    }

    let pattern = format!("%{}%", escape_like(search_term));
    query.filter(column.like(LikeExpr::new(pattern).escape('\\')))
}

/// Case-insensitive substring test, Unicode aware.
pub fn text_matches(haystack: &str, search_term: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&search_term.to_lowercase())
}

/// Escape LIKE metacharacters so the term only matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
