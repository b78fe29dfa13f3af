// --- File: crates/services/saas_backend/src/lib.rs ---

pub mod app; // Router assembly
pub mod merchant_host; // In-memory Stripe Connect host
