// Domain layer: tokens, reports and the ports the lint pipeline is built on.

pub mod model;
pub mod ports;
