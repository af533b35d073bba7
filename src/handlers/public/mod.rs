// handlers/public/mod.rs - Handlers reachable without a signed-in session
//
// Catalog browsing and the JSON export are read-only. The login handlers
// mint and consume the anti-forgery state that guards the code exchange.

pub mod catalog;
pub mod health;
pub mod login;
