// Two route tiers: public endpoints and the session-gated admin surface.
pub mod admin;
pub mod public;
