use async_graphql::{Context, InputObject, Object};

use crate::http_server::graphql::artist_queries::Artist;
use crate::http_server::graphql::context::get_app_state;
use crate::http_server::graphql_error::GraphqlResult;
use crate::services::artist::{ArtistForm, ArtistService};

#[derive(InputObject, Clone, Debug)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    #[graphql(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<ArtistInput> for ArtistForm {
    fn from(input: ArtistInput) -> Self {
        Self {
            name: input.name,
            city: input.city,
            state: input.state,
            phone: input.phone,
            image_link: input.image_link,
            facebook_link: input.facebook_link,
            website: input.website,
            genres: input.genres,
            seeking_venue: input.seeking_venue,
            seeking_description: input.seeking_description,
        }
    }
}

#[derive(Default)]
pub struct ArtistMutation;

#[Object]
impl ArtistMutation {
    async fn create_artist(&self, ctx: &Context<'_>, input: ArtistInput) -> GraphqlResult<Artist> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.create(input.into()).await?.into())
    }

    async fn update_artist(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: ArtistInput,
    ) -> GraphqlResult<Artist> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.update(id, input.into()).await?.into())
    }

    async fn delete_artist(&self, ctx: &Context<'_>, id: i64) -> GraphqlResult<i64> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        service.delete(id).await?;
        Ok(id)
    }
}
