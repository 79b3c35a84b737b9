pub mod common;
pub mod course;
pub mod lesson;
pub mod pagination;
pub mod payment;
pub mod subscription;
pub mod user;

pub use common::*;
pub use course::*;
pub use lesson::*;
pub use pagination::*;
pub use payment::*;
pub use subscription::*;
pub use user::*;
