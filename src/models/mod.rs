//! Data models for the content gateway.
//!
//! Records mirror rows of the content store; the shaped types are what the frontend receives.

mod content;
mod fields;
mod media;
mod menu;
mod settings;
mod taxonomy;
mod user;

pub use content::*;
pub use fields::*;
pub use media::*;
pub use menu::*;
pub use settings::*;
pub use taxonomy::*;
pub use user::*;
