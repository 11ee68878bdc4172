//! Client-side proxies for broker entities.
//!
//! Resources are built only from server responses. Mutating operations
//! follow the links the server sent and replace local state with the
//! server's answer.

mod application;
mod cartridge;
mod domain;
mod gear_group;
mod user;

pub use application::ApplicationResource;
pub use cartridge::{
    Cartridge, CartridgeAttributes, EmbeddedCartridgeResource, StandaloneCartridgeResource,
    PROPERTY_ADDITIONAL_GEAR_STORAGE,
};
pub use domain::DomainResource;
pub use gear_group::{Gear, GearGroupResource};
pub use user::UserResource;
