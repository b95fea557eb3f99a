// Domain layer: record models and ports (interfaces). No knowledge of HTTP,
// Socrata or Elasticsearch specifics.

pub mod model;
pub mod ports;
