//! Documentation comment generation.
//!
//! Given the lines following a freshly typed `/**`, [`Engine::generate`]
//! recognises the declaration there (function, method or variable) in one of
//! the supported [`Language`]s and builds a tagged doc block with editor
//! tab-stops for every field left to fill in. The engine also rewraps,
//! reparses, decorates and joins existing comments.

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::{AlignMode, NotationRule, Settings, SpacerMode};
pub use crate::core::{Engine, GenerateRequest, Language, Outcome};
pub use crate::error::{DocblockError, Result};
