#![doc = "release-sync-core: core logic library for release-sync."]

//! This crate contains the release publishing pipeline: data model, the remote API
//! contract, and the resolve / write / upload stages. It performs no HTTP itself;
//! concrete platform clients implement [`contract::ReleaseApi`].
//!
//! # Usage
//! Build a [`config::ReleaseRequest`], pick a [`config::LookupStrategy`] and call
//! [`publish::publish`] with a `ReleaseApi` implementation.

pub mod assets;
pub mod config;
pub mod contract;
pub mod error;
pub mod publish;
pub mod resolve;
pub mod write;
