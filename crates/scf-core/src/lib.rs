//! # scf-core
//!
//! Core types, configuration input model, and text synthesis for SCF project
//! bootstrapping.
//!
//! This crate provides the foundational types shared across all crates:
//! - The SCF configuration document accepted by the bootstrap endpoint
//! - Entity structs for persisted pages, relations, and derived artifacts
//! - Page kind, status, and relation enums with their SQL string forms
//! - Stable page key construction and page kind inference
//! - Pure description and markdown synthesis
//! - Response types for the HTTP surface
//! - Cross-cutting error types

pub mod describe;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod input;
pub mod keys;
pub mod responses;
