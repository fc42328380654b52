pub mod auth;
pub mod essays;
pub mod grading;
pub mod results;
pub mod social;
pub mod system;
pub mod users;
pub mod variants;

pub use auth::AuthService;
pub use essays::EssayService;
pub use grading::{GradingDispatcher, create_dispatcher};
pub use results::ResultService;
pub use social::SocialService;
pub use system::SystemService;
pub use users::UserService;
pub use variants::VariantService;
