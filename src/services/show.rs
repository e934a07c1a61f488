use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::instrument;

use crate::database::Database;
use crate::entities;
use crate::error::{AppError, AppResult};

/// A show with both parties resolved, as listed on the shows page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowListing {
    pub show_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub struct ShowService {
    db: Arc<Database>,
}

impl ShowService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Every show, ordered by start time.
    pub async fn list(&self) -> AppResult<Vec<ShowListing>> {
        let shows = entities::show::Entity::find()
            .order_by_asc(entities::show::Column::StartTime)
            .order_by_asc(entities::show::Column::Id)
            .all(&self.db.conn)
            .await?;

        let venue_ids: Vec<i64> = shows.iter().map(|show| show.venue_id).collect();
        let artist_ids: Vec<i64> = shows.iter().map(|show| show.artist_id).collect();

        let venues: HashMap<i64, entities::venue::Model> = entities::venue::Entity::find()
            .filter(entities::venue::Column::Id.is_in(venue_ids))
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|venue| (venue.id, venue))
            .collect();
        let artists: HashMap<i64, entities::artist::Model> = entities::artist::Entity::find()
            .filter(entities::artist::Column::Id.is_in(artist_ids))
            .all(&self.db.conn)
            .await?
            .into_iter()
            .map(|artist| (artist.id, artist))
            .collect();

        Ok(shows
            .into_iter()
            .filter_map(|show| {
                let venue = venues.get(&show.venue_id)?;
                let artist = artists.get(&show.artist_id)?;
                Some(ShowListing {
                    show_id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name.clone(),
                    artist_id: artist.id,
                    artist_name: artist.name.clone(),
                    artist_image_link: artist.image_link.clone(),
                    start_time: show.start_time,
                })
            })
            .collect())
    }

    /// Book `artist_id` at `venue_id`. Both must exist; nothing is written otherwise.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        venue_id: i64,
        artist_id: i64,
        start_time: DateTime<Utc>,
    ) -> AppResult<entities::show::Model> {
        let txn = self.db.conn.begin().await?;

        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&txn)
            .await?;
        let artist = entities::artist::Entity::find_by_id(artist_id)
            .one(&txn)
            .await?;

        let (venue, artist) = match (venue, artist) {
            (Some(venue), Some(artist)) => (venue, artist),
            (None, _) => {
                return Err(AppError::Referential(format!(
                    "No such venue id {venue_id}. Show could not be listed."
                )));
            }
            (_, None) => {
                return Err(AppError::Referential(format!(
                    "No such artist id {artist_id}. Show could not be listed."
                )));
            }
        };

        let duplicate = entities::show::Entity::find()
            .filter(
                Condition::all()
                    .add(entities::show::Column::VenueId.eq(venue_id))
                    .add(entities::show::Column::ArtistId.eq(artist_id))
                    .add(entities::show::Column::StartTime.eq(start_time)),
            )
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Validation(format!(
                "'{}' is already booked at '{}' for that start time",
                artist.name, venue.name
            )));
        }

        let show = entities::show::ActiveModel {
            venue_id: Set(venue_id),
            artist_id: Set(artist_id),
            start_time: Set(start_time),
            ..entities::show::ActiveModel::new()
        };
        let model = show.insert(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Show created: '{}' at '{}' on {} (ID: {})",
            artist.name,
            venue.name,
            start_time,
            model.id
        );
        Ok(model)
    }

    pub async fn delete(&self, show_id: i64) -> AppResult<()> {
        let txn = self.db.conn.begin().await?;

        let result = entities::show::Entity::delete_by_id(show_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Show", show_id));
        }

        txn.commit().await?;
        log::info!("Show deleted (ID: {})", show_id);
        Ok(())
    }
}
