// Domain layer: entities, values and ports. No I/O here.

pub mod model;
pub mod ports;
