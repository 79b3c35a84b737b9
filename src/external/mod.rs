pub mod mailer;
pub mod stripe;

pub use mailer::Mailer;
pub use stripe::StripeService;
