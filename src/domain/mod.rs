// Domain layer: survey data model and ports. No I/O here.

pub mod model;
pub mod ports;
