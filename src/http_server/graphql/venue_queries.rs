use async_graphql::{Context, Object, SimpleObject};

use crate::entities;
use crate::http_server::graphql::context::get_app_state;
use crate::http_server::graphql::listing_types::{ListingSummary, SearchResults};
use crate::http_server::graphql_error::GraphqlResult;
use crate::services::schedule::{BookedShow, format_start_time};
use crate::services::venue::{VenueArea, VenueDetail, VenueService};

#[derive(Debug, Clone, SimpleObject)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl From<entities::venue::Model> for Venue {
    fn from(model: entities::venue::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            address: model.address,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website: model.website,
            genres: model.genres.into_inner(),
            seeking_talent: model.seeking_talent,
            seeking_description: model.seeking_description,
        }
    }
}

/// An artist booked at the venue being viewed.
#[derive(Debug, Clone, SimpleObject)]
pub struct ArtistBooking {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<BookedShow> for ArtistBooking {
    fn from(show: BookedShow) -> Self {
        Self {
            artist_id: show.counterpart_id,
            artist_name: show.counterpart_name,
            artist_image_link: show.counterpart_image_link,
            start_time: format_start_time(show.start_time),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct VenueDetails {
    pub venue: Venue,
    pub past_shows: Vec<ArtistBooking>,
    pub upcoming_shows: Vec<ArtistBooking>,
    pub past_shows_count: i64,
    pub upcoming_shows_count: i64,
}

impl From<VenueDetail> for VenueDetails {
    fn from(detail: VenueDetail) -> Self {
        let past_shows_count = detail.schedule.past_shows_count() as i64;
        let upcoming_shows_count = detail.schedule.upcoming_shows_count() as i64;
        Self {
            venue: detail.venue.into(),
            past_shows: detail.schedule.past_shows.into_iter().map(Into::into).collect(),
            upcoming_shows: detail
                .schedule
                .upcoming_shows
                .into_iter()
                .map(Into::into)
                .collect(),
            past_shows_count,
            upcoming_shows_count,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct VenueAreaGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingSummary>,
}

impl From<VenueArea> for VenueAreaGroup {
    fn from(area: VenueArea) -> Self {
        Self {
            city: area.city,
            state: area.state,
            venues: area.venues.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Default)]
pub struct VenueQuery;

#[Object]
impl VenueQuery {
    /// Venues grouped by city and state.
    async fn venue_areas(&self, ctx: &Context<'_>) -> GraphqlResult<Vec<VenueAreaGroup>> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        let areas = service.list_areas().await?;
        Ok(areas.into_iter().map(Into::into).collect())
    }

    async fn search_venues(
        &self,
        ctx: &Context<'_>,
        search_term: String,
    ) -> GraphqlResult<SearchResults> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.search(&search_term).await?.into())
    }

    async fn venue(&self, ctx: &Context<'_>, id: i64) -> GraphqlResult<VenueDetails> {
        let app_state = get_app_state(ctx)?;
        let service = VenueService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.get_detail(id).await?.into())
    }
}
