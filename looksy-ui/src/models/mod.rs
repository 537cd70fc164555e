//! Domain models for looksy-ui

pub mod hair_profile;
pub mod session;

pub use hair_profile::{
    HairDensity, HairLength, HairProfile, HairThickness, HairType, HairlineCondition,
    ScalpVisibility,
};
pub use session::{CustomerSession, GeneratedPreview, PhotoSlot, SessionError, SessionStep};
