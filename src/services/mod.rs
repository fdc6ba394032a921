// Service exports
pub mod distance_matrix;
pub mod rate_limit;
pub mod routing;
pub mod snapshot;

pub use distance_matrix::{DistanceMatrixProvider, GoogleDistanceMatrix, RoutingError, DEFAULT_ENDPOINT};
pub use rate_limit::{Clock, RateLimiter, TokioClock, DEFAULT_MIN_INTERVAL};
pub use routing::RoutingClient;
pub use snapshot::SnapshotError;
