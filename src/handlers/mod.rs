// Two security tiers:
// public (no token) and protected (valid access token via the `AuthUser` extractor).
// Both tiers share paths such as /posts, so the tier is decided per handler.
pub mod protected;
pub mod public;
pub mod validate;
