use async_graphql::{Context, InputObject, Object};

use crate::http_server::graphql::context::get_app_state;
use crate::http_server::graphql::venue_queries::Venue;
use crate::http_server::graphql_error::GraphqlResult;
use crate::services::venue::{VenueForm, VenueService};

#[derive(InputObject, Clone, Debug)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    #[graphql(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<VenueInput> for VenueForm {
    fn from(input: VenueInput) -> Self {
        Self {
            name: input.name,
            city: input.city,
            state: input.state,
            address: input.address,
            phone: input.phone,
            image_link: input.image_link,
            facebook_link: input.facebook_link,
            website: input.website,
            genres: input.genres,
            seeking_talent: input.seeking_talent,
            seeking_description: input.seeking_description,
        }
    }
}

#[derive(Default)]
pub struct VenueMutation;

#[Object]
impl VenueMutation {
    async fn create_venue(&self, ctx: &Context<'_>, input: VenueInput) -> GraphqlResult<Venue> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.create(input.into()).await?.into())
    }

    /// Replaces every field of the venue.
    async fn update_venue(
        &self,
        ctx: &Context<'_>,
        id: i64,
        input: VenueInput,
    ) -> GraphqlResult<Venue> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.update(id, input.into()).await?.into())
    }

    /// Deletes the venue and its shows. Returns the deleted id.
    async fn delete_venue(&self, ctx: &Context<'_>, id: i64) -> GraphqlResult<i64> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        service.delete(id).await?;
        Ok(id)
    }
}
