pub mod auth_service;
pub mod course_service;
pub mod lesson_service;
pub mod notification_service;
pub mod payment_service;
pub mod subscription_service;
pub mod user_service;

pub use auth_service::*;
pub use course_service::*;
pub use lesson_service::*;
pub use notification_service::*;
pub use payment_service::*;
pub use subscription_service::*;
pub use user_service::*;
