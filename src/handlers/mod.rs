pub mod admin;
pub mod auth;
pub mod course;
pub mod lesson;
pub mod payment;
pub mod subscription;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use course::course_config;
pub use lesson::lesson_config;
pub use payment::payment_config;
pub use subscription::subscription_config;
pub use user::user_config;
