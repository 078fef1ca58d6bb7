// Domain layer: inventory records, their contract checks and the ports the health check is built on.

pub mod contract;
pub mod model;
pub mod ports;
