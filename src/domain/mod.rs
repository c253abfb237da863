// Domain layer: record/result models and the ports the sources and outputs implement.

pub mod model;
pub mod ports;
