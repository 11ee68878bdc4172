//! Data-transfer objects deserialized from broker responses.

mod application;
mod cartridge;
mod domain;
mod gear_group;
mod response;
mod user;

pub use application::*;
pub use cartridge::*;
pub use domain::*;
pub use gear_group::*;
pub use response::*;
pub use user::*;
