//! Client for the MapQuest radius search used to find places near a site.

pub mod models;
pub mod places;

pub use models::PlaceFact;
pub use places::NearbyPlacesClient;
