// Domain layer: records, the normalizer and ports (interfaces). No I/O here.

pub mod model;
pub mod normalizer;
pub mod ports;
