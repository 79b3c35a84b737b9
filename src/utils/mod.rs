pub mod email;
pub mod jwt;
pub mod password;
pub mod youtube;

pub use email::*;
pub use jwt::*;
pub use password::*;
pub use youtube::*;
