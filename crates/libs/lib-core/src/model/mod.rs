//! # Model Layer
//!
//! Row types and repositories over the relational store.

pub mod store;
