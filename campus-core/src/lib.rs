#![doc = "campus-core: core packaging and publish pipeline for campus."]

//! This crate contains the packaging routine, the collaborator seams and the
//! publish pipeline for campus. Transport, configuration files and CLI glue
//! live in the `campus` application crate.
//!
//! # Usage
//! Add this as a dependency for the packaging, contract and pipeline code.

pub mod archive;
pub mod config;
pub mod contract;
pub mod package;
pub mod publish;
pub mod render;
