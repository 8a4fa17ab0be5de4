// Domain layer: value types and the collaborator ports the engine and its callers depend on.

pub mod model;
pub mod ports;
