//! Core types and definitions for the hippo thruster and range sensor models.
//!
//! This crate defines the vocabulary shared by the simulation crate:
//! poses, ECS components, plugin configuration, published messages,
//! constants and errors. It has no dependency on the ECS or RNG runtime.

pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod messages;
pub mod types;
