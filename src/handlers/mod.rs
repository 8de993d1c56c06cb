// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (auth-token required)
pub mod public; // account creation, login, liveness
pub mod protected; // per-user cart operations
