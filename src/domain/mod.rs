// Domain layer: data model and the collaborator traits the stages depend on.

pub mod model;
pub mod ports;
