use async_graphql::{Context, Object, SimpleObject};

use crate::entities;
use crate::http_server::graphql::context::get_app_state;
use crate::http_server::graphql::listing_types::SearchResults;
use crate::http_server::graphql_error::GraphqlResult;
use crate::services::artist::{ArtistDetail, ArtistService};
use crate::services::schedule::{BookedShow, format_start_time};

#[derive(Debug, Clone, SimpleObject)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl From<entities::artist::Model> for Artist {
    fn from(model: entities::artist::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            phone: model.phone,
            image_link: model.image_link,
            facebook_link: model.facebook_link,
            website: model.website,
            genres: model.genres.into_inner(),
            seeking_venue: model.seeking_venue,
            seeking_description: model.seeking_description,
        }
    }
}

/// A venue the artist being viewed is booked at.
#[derive(Debug, Clone, SimpleObject)]
pub struct VenueBooking {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

impl From<BookedShow> for VenueBooking {
    fn from(show: BookedShow) -> Self {
        Self {
            venue_id: show.counterpart_id,
            venue_name: show.counterpart_name,
            venue_image_link: show.counterpart_image_link,
            start_time: format_start_time(show.start_time),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ArtistDetails {
    pub artist: Artist,
    pub past_shows: Vec<VenueBooking>,
    pub upcoming_shows: Vec<VenueBooking>,
    pub past_shows_count: i64,
    pub upcoming_shows_count: i64,
}

impl From<ArtistDetail> for ArtistDetails {
    fn from(detail: ArtistDetail) -> Self {
        let past_shows_count = detail.schedule.past_shows_count() as i64;
        let upcoming_shows_count = detail.schedule.upcoming_shows_count() as i64;
        Self {
            artist: detail.artist.into(),
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

#[derive(Default)]
pub struct ArtistQuery;

#[Object]
impl ArtistQuery {
    async fn artists(&self, ctx: &Context<'_>) -> GraphqlResult<Vec<Artist>> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        let artists = service.list().await?;
        Ok(artists.into_iter().map(Into::into).collect())
    }

    async fn search_artists(
        &self,
        ctx: &Context<'_>,
        search_term: String,
    ) -> GraphqlResult<SearchResults> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.search(&search_term).await?.into())
    }

    async fn artist(&self, ctx: &Context<'_>, id: i64) -> GraphqlResult<ArtistDetails> {
        let app_state = get_app_state(ctx)?;
        let service = ArtistService::new(app_state.db.clone(), app_state.clock.clone());

        Ok(service.get_detail(id).await?.into())
    }
}
