pub mod auth;

pub mod users;

pub mod venues;

pub mod classes;

pub mod occurrences;

pub mod enrollments;

pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use enrollments::configure_enrollments_routes;
pub use occurrences::configure_occurrences_routes;
pub use users::configure_user_routes;
pub use venues::configure_venues_routes;
