//! Cross-subsystem integration scenarios.

#[cfg(test)]
mod harness;

mod actions;
mod admin;
mod reconciliation;
mod sweep;
