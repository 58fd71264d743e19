//! The parsed document root.

use serde::{Deserialize, Serialize};

use crate::block::AirBlock;

/// AIR language version stamped into every parsed tree.
pub const AIR_VERSION: &str = "1";

/// The application declaration: name plus ordered block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirApp {
    pub name: String,
    pub blocks: Vec<AirBlock>,
}

/// Root of a parsed AIR document.
///
/// Created once per parse call and never mutated afterwards; context
/// extraction only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirAst {
    pub version: String,
    pub app: AirApp,
}

impl AirAst {
    pub fn new(name: impl Into<String>, blocks: Vec<AirBlock>) -> Self {
        Self {
            version: AIR_VERSION.to_string(),
            app: AirApp {
                name: name.into(),
                blocks,
            },
        }
    }
}
