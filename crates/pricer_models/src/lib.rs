//! # Pricer Models (L2: Business Logic)
//!
//! Return-innovation laws and conditional volatility models.
//!
//! This crate provides:
//! - Model parameter types (`ModelParameters`, `NtsShape`, `GarchParams`)
//! - The standard normal tempered stable (stdNTS) law: random variates and
//!   characteristic function
//! - The asymmetric GARCH(1,1) volatility recursion
//!
//! ## Design Principles
//!
//! - **Static dispatch**: laws are plugged in through generic trait bounds,
//!   never `Box<dyn Trait>`
//! - **Fail fast**: invalid parameters are rejected with
//!   [`PricingError::InvalidParameter`](pricer_core::types::PricingError)
//!   instead of being clamped
//! - **Seeded randomness**: every sampler takes the caller's RNG so paths are
//!   reproducible

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod models;
