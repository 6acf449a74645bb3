pub mod acquirer;
pub mod checker;
pub mod engine;
pub mod reporter;
pub mod resolver;

pub use crate::domain::model::{Coordinate, FixStatus, GeoRecord, Permission, Position, PrerequisiteReport};
pub use crate::domain::ports::{LocationProvider, NetworkProbe, PolicyReader, ReverseGeocoder};
pub use crate::utils::error::Result;
