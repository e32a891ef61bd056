// Domain layer: shared types and ports (interfaces) used by the printer and the adapters.

pub mod model;
pub mod ports;
