use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, MergedObject, Schema};
use axum::response::{Html, IntoResponse};

use crate::http_server::graphql::artist_mutations::ArtistMutation;
use crate::http_server::graphql::artist_queries::ArtistQuery;
use crate::http_server::graphql::show_mutations::ShowMutation;
use crate::http_server::graphql::show_queries::ShowQuery;
use crate::http_server::graphql::venue_mutations::VenueMutation;
use crate::http_server::graphql::venue_queries::VenueQuery;
use crate::http_server::state::AppState;

pub mod artist_mutations;
pub mod artist_queries;
pub mod context;
pub mod listing_types;
pub mod show_mutations;
pub mod show_queries;
pub mod venue_mutations;
pub mod venue_queries;

#[derive(Default, MergedObject)]
pub struct Query(VenueQuery, ArtistQuery, ShowQuery);

#[derive(Default, MergedObject)]
pub struct Mutation(VenueMutation, ArtistMutation, ShowMutation);

pub type ListingSchema = Schema<Query, Mutation, EmptySubscription>;

pub async fn graphql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn create_schema(app_state: Arc<AppState>) -> ListingSchema {
    Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(app_state)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixed_clock, test_db};
    use async_graphql::Request;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    async fn schema() -> ListingSchema {
        let app_state = Arc::new(AppState {
            db: test_db().await,
            clock: fixed_clock(Utc.with_ymd_and_hms(2026, 10, 19, 20, 0, 0).unwrap()),
            questions_per_page: 10,
        });
        create_schema(app_state)
    }

    async fn execute(schema: &ListingSchema, query: &str) -> async_graphql::Response {
        schema.execute(Request::new(query)).await
    }

    fn data(response: async_graphql::Response) -> Value {
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        response.data.into_json().unwrap()
    }

    const CREATE_VENUE: &str = r#"
        mutation {
            createVenue(input: {
                name: "The Musical Hop",
                city: "San Francisco",
                state: "CA",
                address: "1015 Folsom Street",
                genres: ["Jazz", "Reggae"],
                seekingTalent: true
            }) { id genres }
        }
    "#;

    const CREATE_ARTIST: &str = r#"
        mutation {
            createArtist(input: {
                name: "Guns N Petals",
                city: "San Francisco",
                state: "CA",
                genres: ["Rock n Roll"]
            }) { id }
        }
    "#;

    #[tokio::test]
    async fn test_venue_detail_partitions_shows() {
        let schema = schema().await;
        let venue = data(execute(&schema, CREATE_VENUE).await);
        let artist = data(execute(&schema, CREATE_ARTIST).await);
        let venue_id = venue["createVenue"]["id"].as_i64().unwrap();
        let artist_id = artist["createArtist"]["id"].as_i64().unwrap();
        assert_eq!(venue["createVenue"]["genres"], json!(["Jazz", "Reggae"]));

        for start in [
            "2026-10-09T20:00:00Z",
            "2026-10-19T19:00:00Z",
            "2026-10-24T20:00:00Z",
        ] {
            let mutation = format!(
                r#"mutation {{ createShow(input: {{ venueId: {venue_id}, artistId: {artist_id}, startTime: "{start}" }}) {{ id }} }}"#
            );
            data(execute(&schema, &mutation).await);
        }

        let query = format!(
            r#"{{ venue(id: {venue_id}) {{
                venue {{ name }}
                pastShowsCount
                upcomingShowsCount
                upcomingShows {{ artistName startTime }}
            }} }}"#
        );
        let detail = data(execute(&schema, &query).await);

        assert_eq!(detail["venue"]["pastShowsCount"], 2);
        assert_eq!(detail["venue"]["upcomingShowsCount"], 1);
        assert_eq!(
            detail["venue"]["upcomingShows"][0],
            json!({"artistName": "Guns N Petals", "startTime": "2026-10-24T20:00:00.000Z"})
        );
    }

    #[tokio::test]
    async fn test_create_show_for_missing_venue_is_referential() {
        let schema = schema().await;
        let artist = data(execute(&schema, CREATE_ARTIST).await);
        let artist_id = artist["createArtist"]["id"].as_i64().unwrap();

        let mutation = format!(
            r#"mutation {{ createShow(input: {{ venueId: 404, artistId: {artist_id}, startTime: "2026-11-01T20:00:00Z" }}) {{ id }} }}"#
        );
        let response = execute(&schema, &mutation).await;

        assert_eq!(response.errors.len(), 1);
        let extensions = response.errors[0].extensions.as_ref().unwrap();
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("REFERENTIAL"))
        );

        let shows = data(execute(&schema, "{ shows { id } }").await);
        assert_eq!(shows["shows"], json!([]));
    }

    #[tokio::test]
    async fn test_missing_venue_is_not_found() {
        let schema = schema().await;

        let response = execute(&schema, "{ venue(id: 7) { pastShowsCount } }").await;

        let extensions = response.errors[0].extensions.as_ref().unwrap();
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("NOT_FOUND"))
        );
    }

    #[tokio::test]
    async fn test_invalid_venue_is_validation_error() {
        let schema = schema().await;

        let response = execute(
            &schema,
            r#"mutation { createVenue(input: {
                name: "", city: "Nowhere", state: "ZZ", address: "1 Main St", genres: []
            }) { id } }"#,
        )
        .await;

        let extensions = response.errors[0].extensions.as_ref().unwrap();
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("VALIDATION"))
        );
        let areas = data(execute(&schema, "{ venueAreas { city } }").await);
        assert_eq!(areas["venueAreas"], json!([]));
    }

    #[tokio::test]
    async fn test_search_artists_is_case_insensitive() {
        let schema = schema().await;
        data(execute(&schema, CREATE_ARTIST).await);

        let result = data(
            execute(
                &schema,
                r#"{ searchArtists(searchTerm: "PETAL") { count data { name numUpcomingShows } } }"#,
            )
            .await,
        );

        assert_eq!(result["searchArtists"]["count"], 1);
        assert_eq!(
            result["searchArtists"]["data"][0],
            json!({"name": "Guns N Petals", "numUpcomingShows": 0})
        );
    }
}
