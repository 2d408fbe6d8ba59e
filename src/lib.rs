//! Rail customer profile resolver
//!
//! Resolves a customer's profile by consulting a volatile cache first,
//! falling back to the partner customer web service, and normalizing the
//! partner's loosely-typed response into a strongly-typed [`data::Customer`].
//! Also carries the customer preferences create/list service.

pub mod cache;
pub mod cli;
pub mod data;
pub mod normalizer;
pub mod partner;
pub mod preferences;
pub mod resolver;
