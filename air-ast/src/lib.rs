//! AST and data-model types for the AIR compiler.
//!
//! This crate defines the typed tree produced by the parser and consumed
//! by context extraction and code generation. It holds no logic beyond
//! small accessors; every stage downstream of the parser treats these
//! types as immutable data.
//!
//! # Architecture
//!
//! ```text
//! source → Token[] (lexing) → AirAst (parsing) → TranspileContext (extraction)
//! ```

mod app;
mod block;
mod token;
mod types;
mod ui;

pub use app::{AIR_VERSION, AirApp, AirAst};
pub use block::{
    AirBlock, ApiBlock, ApiRoute, AuthBlock, CronBlock, CronJob, DbBlock, DbIndex, DbModel,
    DbRelation, DeployBlock, EmailBlock, EmailTemplate, EnvBlock, EnvVar, HandlerBlock, HandlerDef,
    Hook, HookBlock, HttpMethod, NavBlock, NavRoute, PersistBlock, QueueBlock, QueueDef,
    StateBlock, StyleBlock, UiBlock, Webhook, WebhookBlock,
};
pub use token::{Token, TokenKind};
pub use types::{AirDbField, AirField, AirType};
pub use ui::{AirUiNode, ScopeKind, UiOp, UiPrefixOp};
