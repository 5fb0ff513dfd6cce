// ABOUTME: Post-reload health verification against the public endpoint.
// ABOUTME: Bounded HTTP polling with a fixed set of accepted status codes.

mod probe;
mod verifier;

pub use probe::{HttpProbe, HyperProbe, NO_RESPONSE};
pub use verifier::{HealthCheckFailure, HealthVerifier};
