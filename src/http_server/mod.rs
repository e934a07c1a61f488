pub mod app;
pub mod error;
pub mod extract;
pub mod graphql;
pub mod graphql_error;
pub mod http_routes;
pub mod state;
