use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::instrument;

use crate::database::Database;
use crate::entities;
use crate::error::{AppError, AppResult};
use crate::ports::clock::Clock;
use crate::query_builder::{apply_text_search, text_matches};
use crate::services::schedule::{BookedShow, ShowSchedule, UpcomingBoundary, count_upcoming_by};
use crate::services::validation::{Validator, optional};
use crate::services::{ListingSummary, SearchResult};

/// Every mutable artist field. Updates replace all of them at once.
#[derive(Debug, Clone, Default)]
pub struct ArtistForm {
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

impl ArtistForm {
    fn apply_to(
        self,
        mut active: entities::artist::ActiveModel,
    ) -> AppResult<entities::artist::ActiveModel> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name);
        let city = v.required("city", &self.city);
        let state = v.state(&self.state);
        let phone = v.phone(self.phone);
        let image_link = v.link("image_link", self.image_link);
        let facebook_link = v.link("facebook_link", self.facebook_link);
        let website = v.link("website", self.website);
        let genres = v.genres(self.genres);
        v.finish()?;

        active.name = Set(name);
        active.city = Set(city);
        active.state = Set(state);
        active.phone = Set(phone);
        active.image_link = Set(image_link);
        active.facebook_link = Set(facebook_link);
        active.website = Set(website);
        active.genres = Set(genres);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(optional(self.seeking_description));
        Ok(active)
    }
}

/// Read-only projection of an artist and its derived show lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistDetail {
    pub artist: entities::artist::Model,
    pub schedule: ShowSchedule,
}

pub struct ArtistService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl ArtistService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub async fn list(&self) -> AppResult<Vec<entities::artist::Model>> {
        let artists = entities::artist::Entity::find()
            .order_by_asc(entities::artist::Column::Name)
            .all(&self.db.conn)
            .await?;
        Ok(artists)
    }

    /// Case-insensitive substring search on the artist name.
    pub async fn search(&self, search_term: &str) -> AppResult<SearchResult> {
        let now = self.clock.now();

        let query =
            entities::artist::Entity::find().order_by_asc(entities::artist::Column::Name);
        let artists = apply_text_search(query, entities::artist::Column::Name, search_term)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|artist| text_matches(&artist.name, search_term))
            .collect::<Vec<_>>();

        let ids = artists.iter().map(|artist| artist.id).collect();
        let counts = self
            .upcoming_counts(ids, now, UpcomingBoundary::Exclusive)
            .await?;

        log::debug!(
            "Artist search '{}' matched {} artists",
            search_term,
            artists.len()
        );

        Ok(artists
            .into_iter()
            .map(|artist| ListingSummary {
                id: artist.id,
                num_upcoming_shows: counts.get(&artist.id).copied().unwrap_or(0),
                name: artist.name,
            })
            .collect::<Vec<_>>()
            .into())
    }

    pub async fn get_detail(&self, artist_id: i64) -> AppResult<ArtistDetail> {
        let now = self.clock.now();

        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&self.db.conn)
            .await?
            .ok_or(AppError::not_found("Artist", artist_id))?;

        let shows = artist
            .find_related(entities::show::Entity)
            .find_also_related(entities::venue::Entity)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter_map(|(show, venue)| {
                venue.map(|venue| BookedShow {
                    show_id: show.id,
                    counterpart_id: venue.id,
                    counterpart_name: venue.name,
                    counterpart_image_link: venue.image_link,
                    start_time: show.start_time,
                })
            })
            .collect();

        Ok(ArtistDetail {
            artist,
            schedule: ShowSchedule::build(shows, now),
        })
    }

    pub async fn create(&self, form: ArtistForm) -> AppResult<entities::artist::Model> {
        let artist = form.apply_to(entities::artist::ActiveModel::new())?;

        let txn = self.db.conn.begin().await?;
        let model = artist.insert(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Artist created: '{}' (ID: {}, genres: {})",
            model.name,
            model.id,
            model.genres
        );
        Ok(model)
    }

    pub async fn update(
        &self,
        artist_id: i64,
        form: ArtistForm,
    ) -> AppResult<entities::artist::Model> {
        let txn = self.db.conn.begin().await?;

        let existing = entities::artist::Entity::find_by_id(artist_id)
            .one(&txn)
            .await?
            .ok_or(AppError::not_found("Artist", artist_id))?;

        let model = form.apply_to(existing.into())?.update(&txn).await?;
        txn.commit().await?;

        log::info!("Artist updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Delete an artist together with every show they are booked for.
    #[instrument(skip(self))]
    pub async fn delete(&self, artist_id: i64) -> AppResult<()> {
        let txn = self.db.conn.begin().await?;

        let shows = entities::show::Entity::delete_many()
            .filter(entities::show::Column::ArtistId.eq(artist_id))
            .exec(&txn)
            .await?;

        let result = entities::artist::Entity::delete_by_id(artist_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Artist", artist_id));
        }

        txn.commit().await?;

        log::info!(
            "Artist deleted (ID: {}) along with {} shows",
            artist_id,
            shows.rows_affected
        );
        Ok(())
    }

    async fn upcoming_counts(
        &self,
        artist_ids: Vec<i64>,
        now: DateTime<Utc>,
        boundary: UpcomingBoundary,
    ) -> AppResult<HashMap<i64, usize>> {
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::ArtistId.is_in(artist_ids))
            .all(&self.db.conn)
            .await?;

        Ok(count_upcoming_by(
            shows.into_iter().map(|show| (show.artist_id, show.start_time)),
            now,
            boundary,
        ))
    }
}
