use async_graphql::{Context, InputObject, Object};
use chrono::{DateTime, Utc};

use crate::http_server::graphql::context::get_app_state;
use crate::http_server::graphql::show_queries::ShowRecord;
use crate::http_server::graphql_error::GraphqlResult;
use crate::services::show::ShowService;

#[derive(InputObject, Clone, Debug)]
pub struct ShowInput {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

#[derive(Default)]
pub struct ShowMutation;

#[Object]
impl ShowMutation {
    /// Fails with code REFERENTIAL when the venue or artist does not exist.
    async fn create_show(&self, ctx: &Context<'_>, input: ShowInput) -> GraphqlResult<ShowRecord> {
        let app_state = get_app_state(ctx)?;
        let show = ShowService::new(app_state.db.clone())
            .create(input.venue_id, input.artist_id, input.start_time)
            .await?;

        Ok(show.into())
    }

    async fn delete_show(&self, ctx: &Context<'_>, id: i64) -> GraphqlResult<i64> {
        let app_state = get_app_state(ctx)?;
        ShowService::new(app_state.db.clone()).delete(id).await?;

        Ok(id)
    }
}
