pub mod artist;
pub mod category;
pub mod genres;
pub mod question;
pub mod show;
pub mod venue;
