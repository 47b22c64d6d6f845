// Domain layer: core models and ports (interfaces). No HTTP or web concerns here.

pub mod model;
pub mod ports;
