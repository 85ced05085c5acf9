mod err;
mod mail;

pub use err::Error;
pub use mail::Mailer;
