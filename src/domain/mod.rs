// Domain layer: document model and ports (interfaces). No transport concerns here.

pub mod model;
pub mod ports;
