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

/// Every mutable venue field. Updates replace all of them at once.
#[derive(Debug, Clone, Default)]
pub struct VenueForm {
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

impl VenueForm {
    /// Validate every field and write them onto `active`. Nothing is written on failure.
    fn apply_to(self, mut active: entities::venue::ActiveModel) -> AppResult<entities::venue::ActiveModel> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name);
        let city = v.required("city", &self.city);
        let state = v.state(&self.state);
        let address = v.required("address", &self.address);
        let phone = v.phone(self.phone);
        let image_link = v.link("image_link", self.image_link);
        let facebook_link = v.link("facebook_link", self.facebook_link);
        let website = v.link("website", self.website);
        let genres = v.genres(self.genres);
        v.finish()?;

        active.name = Set(name);
        active.city = Set(city);
        active.state = Set(state);
        active.address = Set(address);
        active.phone = Set(phone);
        active.image_link = Set(image_link);
        active.facebook_link = Set(facebook_link);
        active.website = Set(website);
        active.genres = Set(genres);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(optional(self.seeking_description));
        Ok(active)
    }
}

/// Venues sharing one city and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<ListingSummary>,
}

/// Read-only projection of a venue and its derived show lists.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueDetail {
    pub venue: entities::venue::Model,
    pub schedule: ShowSchedule,
}

pub struct VenueService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl VenueService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// All venues grouped by (city, state), areas ordered by state then city.
    pub async fn list_areas(&self) -> AppResult<Vec<VenueArea>> {
        let now = self.clock.now();

        let venues = entities::venue::Entity::find()
            .order_by_asc(entities::venue::Column::State)
            .order_by_asc(entities::venue::Column::City)
            .order_by_asc(entities::venue::Column::Name)
            .all(&self.db.conn)
            .await?;

        let ids = venues.iter().map(|venue| venue.id).collect();
        let counts = self
            .upcoming_counts(ids, now, UpcomingBoundary::Inclusive)
            .await?;

        let mut areas: Vec<VenueArea> = Vec::new();
        for venue in venues {
            let summary = ListingSummary {
                id: venue.id,
                num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            };
            match areas.last_mut() {
                Some(area) if area.city == venue.city && area.state == venue.state => {
                    area.venues.push(summary)
                }
                _ => areas.push(VenueArea {
                    city: venue.city,
                    state: venue.state,
                    venues: vec![summary],
                }),
            }
        }

        Ok(areas)
    }

    /// Case-insensitive substring search on the venue name.
    pub async fn search(&self, search_term: &str) -> AppResult<SearchResult> {
        let now = self.clock.now();

        let query = entities::venue::Entity::find().order_by_asc(entities::venue::Column::Name);
        let venues = apply_text_search(query, entities::venue::Column::Name, search_term)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter(|venue| text_matches(&venue.name, search_term))
            .collect::<Vec<_>>();

        let ids = venues.iter().map(|venue| venue.id).collect();
        let counts = self
            .upcoming_counts(ids, now, UpcomingBoundary::Exclusive)
            .await?;

        log::debug!(
            "Venue search '{}' matched {} venues",
            search_term,
            venues.len()
        );

        Ok(venues
            .into_iter()
            .map(|venue| ListingSummary {
                id: venue.id,
                num_upcoming_shows: counts.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            })
            .collect::<Vec<_>>()
            .into())
    }

    pub async fn get_detail(&self, venue_id: i64) -> AppResult<VenueDetail> {
        let now = self.clock.now();

        let venue = entities::venue::Entity::find_by_id(venue_id)
            .one(&self.db.conn)
            .await?
            .ok_or(AppError::not_found("Venue", venue_id))?;

        let shows = venue
            .find_related(entities::show::Entity)
            .find_also_related(entities::artist::Entity)
            .all(&self.db.conn)
            .await?
            .into_iter()
            .filter_map(|(show, artist)| {
                artist.map(|artist| BookedShow {
                    show_id: show.id,
                    counterpart_id: artist.id,
                    counterpart_name: artist.name,
                    counterpart_image_link: artist.image_link,
                    start_time: show.start_time,
                })
            })
            .collect();

        Ok(VenueDetail {
            venue,
            schedule: ShowSchedule::build(shows, now),
        })
    }

    pub async fn create(&self, form: VenueForm) -> AppResult<entities::venue::Model> {
        let venue = form.apply_to(entities::venue::ActiveModel::new())?;

        let txn = self.db.conn.begin().await?;
        let model = venue.insert(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Venue created: '{}' (ID: {}, genres: {})",
            model.name,
            model.id,
            model.genres
        );
        Ok(model)
    }

    pub async fn update(&self, venue_id: i64, form: VenueForm) -> AppResult<entities::venue::Model> {
        let txn = self.db.conn.begin().await?;

        let existing = entities::venue::Entity::find_by_id(venue_id)
            .one(&txn)
            .await?
            .ok_or(AppError::not_found("Venue", venue_id))?;

        let model = form.apply_to(existing.into())?.update(&txn).await?;
        txn.commit().await?;

        log::info!("Venue updated: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Delete a venue together with every show booked there.
    #[instrument(skip(self))]
    pub async fn delete(&self, venue_id: i64) -> AppResult<()> {
        let txn = self.db.conn.begin().await?;

        let shows = entities::show::Entity::delete_many()
            .filter(entities::show::Column::VenueId.eq(venue_id))
            .exec(&txn)
            .await?;

        let result = entities::venue::Entity::delete_by_id(venue_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Venue", venue_id));
        }

        txn.commit().await?;

        log::info!(
            "Venue deleted (ID: {}) along with {} shows",
            venue_id,
            shows.rows_affected
        );
        Ok(())
    }

    async fn upcoming_counts(
        &self,
        venue_ids: Vec<i64>,
        now: DateTime<Utc>,
        boundary: UpcomingBoundary,
    ) -> AppResult<HashMap<i64, usize>> {
        let shows = entities::show::Entity::find()
            .filter(entities::show::Column::VenueId.is_in(venue_ids))
            .all(&self.db.conn)
            .await?;

        Ok(count_upcoming_by(
            shows.into_iter().map(|show| (show.venue_id, show.start_time)),
            now,
            boundary,
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::artist::tests::artist_form;
    use crate::services::artist::ArtistService;
    use crate::services::show::ShowService;
    use crate::test_utils::{fixed_clock, test_db};
    use chrono::{Duration, TimeZone};
    use sea_orm::PaginatorTrait;

    pub(crate) fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
        VenueForm {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            image_link: Some("https://images.example.com/venue.jpg".to_string()),
            facebook_link: None,
            website: Some("https://www.themusicalhop.com".to_string()),
            genres: vec!["Jazz".to_string(), "Reggae".to_string()],
            seeking_talent: true,
            seeking_description: Some("Looking for local artists".to_string()),
        }
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_detail() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let detail = service.get_detail(venue.id).await.unwrap();

        assert_eq!(detail.venue.name, "The Musical Hop");
        assert_eq!(detail.venue.genres.as_slice(), ["Jazz", "Reggae"]);
        assert_eq!(detail.schedule.past_shows_count(), 0);
        assert_eq!(detail.schedule.upcoming_shows_count(), 0);
    }

    #[tokio::test]
    async fn test_create_invalid_stores_nothing() {
        let db = test_db().await;
        let service = VenueService::new(db.clone(), fixed_clock(instant()));

        let mut form = venue_form("", "San Francisco", "CA");
        form.genres = vec![];
        let err = service.create(form).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        let count = entities::venue::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_get_detail_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let err = service.get_detail(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Venue", id: 42 }));
    }

    #[tokio::test]
    async fn test_detail_partitions_shows() {
        let db = test_db().await;
        let now = instant();
        let clock = fixed_clock(now);
        let venues = VenueService::new(db.clone(), clock.clone());
        let artists = ArtistService::new(db.clone(), clock.clone());
        let shows = ShowService::new(db.clone());

        let venue = venues
            .create(venue_form("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();
        let artist = artists.create(artist_form("Guns N Petals")).await.unwrap();

        for offset in [Duration::days(-10), Duration::days(-1), Duration::days(5)] {
            shows
                .create(venue.id, artist.id, now + offset)
                .await
                .unwrap();
        }

        let detail = venues.get_detail(venue.id).await.unwrap();

        assert_eq!(detail.schedule.past_shows_count(), 2);
        assert_eq!(detail.schedule.upcoming_shows_count(), 1);
        let upcoming = &detail.schedule.upcoming_shows[0];
        assert_eq!(upcoming.counterpart_id, artist.id);
        assert_eq!(upcoming.counterpart_name, "Guns N Petals");
        assert_eq!(upcoming.start_time, now + Duration::days(5));
    }

    #[tokio::test]
    async fn test_list_areas_groups_by_city_and_state() {
        let db = test_db().await;
        let now = instant();
        let clock = fixed_clock(now);
        let venues = VenueService::new(db.clone(), clock.clone());
        let artists = ArtistService::new(db.clone(), clock);
        let shows = ShowService::new(db.clone());

        let hop = venues
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        venues
            .create(venue_form("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .await
            .unwrap();
        venues
            .create(venue_form("The Dueling Pianos Bar", "New York", "NY"))
            .await
            .unwrap();

        let artist = artists.create(artist_form("Matt Quevedo")).await.unwrap();
        shows.create(hop.id, artist.id, now).await.unwrap();
        shows
            .create(hop.id, artist.id, now - Duration::days(3))
            .await
            .unwrap();

        let areas = venues.list_areas().await.unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!((areas[0].city.as_str(), areas[0].state.as_str()), ("San Francisco", "CA"));
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!((areas[1].city.as_str(), areas[1].state.as_str()), ("New York", "NY"));

        let hop_summary = areas[0]
            .venues
            .iter()
            .find(|summary| summary.id == hop.id)
            .unwrap();
        // A show starting exactly now counts as upcoming in listings
        assert_eq!(hop_summary.num_upcoming_shows, 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let now = instant();
        let clock = fixed_clock(now);
        let venues = VenueService::new(db.clone(), clock.clone());
        let artists = ArtistService::new(db.clone(), clock);
        let shows = ShowService::new(db.clone());

        let club = venues
            .create(venue_form("Rock Club", "Austin", "TX"))
            .await
            .unwrap();
        venues
            .create(venue_form("Jazz Cellar", "Austin", "TX"))
            .await
            .unwrap();
        let artist = artists.create(artist_form("The Wild Sax Band")).await.unwrap();
        shows.create(club.id, artist.id, now).await.unwrap();
        shows
            .create(club.id, artist.id, now + Duration::hours(1))
            .await
            .unwrap();

        let result = venues.search("ROCK").await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].name, "Rock Club");
        // Search counts strictly-later shows only
        assert_eq!(result.data[0].num_upcoming_shows, 1);

        let everything = venues.search("").await.unwrap();
        assert_eq!(everything.count, 2);

        let nothing = venues.search("polka").await.unwrap();
        assert_eq!(nothing.count, 0);
        assert!(nothing.data.is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let db = test_db().await;
        let venues = VenueService::new(db, fixed_clock(instant()));

        venues
            .create(venue_form("Park Square Live", "San Francisco", "CA"))
            .await
            .unwrap();
        venues
            .create(venue_form("Ópera Hall", "Austin", "TX"))
            .await
            .unwrap();

        assert_eq!(venues.search("_").await.unwrap().count, 0);
        assert_eq!(venues.search("%").await.unwrap().count, 0);

        let result = venues.search("óPERA").await.unwrap();
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].name, "Ópera Hall");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let mut form = venue_form("The Musical Hop II", "Oakland", "ca");
        form.website = None;
        form.genres = vec!["Blues".to_string()];
        let updated = service.update(venue.id, form).await.unwrap();

        assert_eq!(updated.name, "The Musical Hop II");
        assert_eq!(updated.city, "Oakland");
        assert_eq!(updated.state, "CA");
        assert!(updated.website.is_none());
        assert_eq!(updated.genres.as_slice(), ["Blues"]);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_venue_unchanged() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let venue = service
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();

        let mut form = venue_form("Renamed", "Oakland", "CA");
        form.website = Some("not a url".to_string());
        let err = service.update(venue.id, form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let stored = service.get_detail(venue.id).await.unwrap().venue;
        assert_eq!(stored, venue);
    }

    #[tokio::test]
    async fn test_update_missing_venue() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let err = service
            .update(7, venue_form("Nowhere", "Austin", "TX"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascades_shows() {
        let db = test_db().await;
        let now = instant();
        let clock = fixed_clock(now);
        let venues = VenueService::new(db.clone(), clock.clone());
        let artists = ArtistService::new(db.clone(), clock);
        let shows = ShowService::new(db.clone());

        let venue = venues
            .create(venue_form("The Musical Hop", "San Francisco", "CA"))
            .await
            .unwrap();
        let artist = artists.create(artist_form("Guns N Petals")).await.unwrap();
        shows.create(venue.id, artist.id, now).await.unwrap();

        venues.delete(venue.id).await.unwrap();

        let remaining = entities::show::Entity::find()
            .count(&db.conn)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(matches!(
            venues.get_detail(venue.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_venue_is_not_found() {
        let db = test_db().await;
        let service = VenueService::new(db, fixed_clock(instant()));

        let err = service.delete(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Venue", id: 99 }));
    }
}
