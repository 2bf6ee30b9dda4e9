// Domain layer module exports
// Domain is independent of infrastructure concerns

pub mod car;
pub mod repositories;
