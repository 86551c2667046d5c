//! moplan: a template-driven configuration compiler for the ACI management
//! plane. Templates render to policy documents, documents dispatch into a
//! shared construction plan, and the plan is committed to the controller in
//! a single REST transaction.

#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod deploy;
pub mod dispatch;
pub mod plan;
pub mod render;
