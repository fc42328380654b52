pub mod auth;

pub mod users;

pub mod essays;

pub mod results;

pub mod social;

pub mod variants;

pub mod system;

#[cfg(test)]
mod tests;

pub use auth::configure_auth_routes;
pub use essays::configure_essay_routes;
pub use results::configure_result_routes;
pub use social::configure_social_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
pub use variants::configure_variant_routes;
