//! Top-level block declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{AirDbField, AirField};
use crate::ui::AirUiNode;

/// One top-level `@keyword(...)` / `@keyword{...}` declaration.
///
/// A closed tagged union: every recognized block keyword has exactly one
/// variant here, so adding a block kind is a compile-checked change at
/// every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AirBlock {
    State(StateBlock),
    Style(StyleBlock),
    Ui(UiBlock),
    Api(ApiBlock),
    Auth(AuthBlock),
    Nav(NavBlock),
    Persist(PersistBlock),
    Hook(HookBlock),
    Db(DbBlock),
    Cron(CronBlock),
    Webhook(WebhookBlock),
    Queue(QueueBlock),
    Email(EmailBlock),
    Env(EnvBlock),
    Handler(HandlerBlock),
    Deploy(DeployBlock),
}

impl AirBlock {
    /// The `@keyword` this block was declared with.
    pub fn keyword(&self) -> &'static str {
        match self {
            AirBlock::State(_) => "state",
            AirBlock::Style(_) => "style",
            AirBlock::Ui(_) => "ui",
            AirBlock::Api(_) => "api",
            AirBlock::Auth(_) => "auth",
            AirBlock::Nav(_) => "nav",
            AirBlock::Persist(_) => "persist",
            AirBlock::Hook(_) => "hook",
            AirBlock::Db(_) => "db",
            AirBlock::Cron(_) => "cron",
            AirBlock::Webhook(_) => "webhook",
            AirBlock::Queue(_) => "queue",
            AirBlock::Email(_) => "email",
            AirBlock::Env(_) => "env",
            AirBlock::Handler(_) => "handler",
            AirBlock::Deploy(_) => "deploy",
        }
    }
}

/// `@state{...}`: application state fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateBlock {
    pub fields: Vec<AirField>,
}

/// `@style(...)`: style property map, declaration order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleBlock {
    pub properties: IndexMap<String, String>,
}

/// `@ui(...)`: ordered list of UI expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiBlock {
    pub nodes: Vec<AirUiNode>,
}

/// HTTP method of an API route. `Crud` is shorthand expanded during
/// context extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Crud,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Crud => "CRUD",
        }
    }

    /// Parse a method keyword, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "CRUD" => Some(HttpMethod::Crud),
            _ => None,
        }
    }
}

/// A single API route declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRoute {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<AirField>,
    /// Handler expression, captured verbatim from the source.
    pub handler: String,
}

/// `@api(...)`: REST route declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiBlock {
    pub routes: Vec<ApiRoute>,
}

/// `@auth(...)`: authentication policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthBlock {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// One navigation route: a bare path/anchor or a conditional redirect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRoute {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl NavRoute {
    /// Bare path route with no condition.
    pub fn bare(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            condition: None,
            target: None,
            fallback: None,
        }
    }

    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }
}

/// `@nav(...)`: navigation routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavBlock {
    pub routes: Vec<NavRoute>,
}

/// `@persist(...)`: persisted state keys plus storage options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistBlock {
    pub keys: Vec<String>,
    pub options: Vec<String>,
}

/// One lifecycle hook: an event name and a handler expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub event: String,
    pub action: String,
}

/// `@hook(...)`: lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookBlock {
    pub hooks: Vec<Hook>,
}

/// One database model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbModel {
    pub name: String,
    pub fields: Vec<AirDbField>,
}

/// A relation between two models, declared inside `@db{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbRelation {
    pub from_model: String,
    pub from_field: String,
    pub to_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
}

/// An index declaration inside `@db{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbIndex {
    pub model: String,
    pub fields: Vec<String>,
}

/// `@db{...}`: models, relations, and indexes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DbBlock {
    pub models: Vec<DbModel>,
    #[serde(default)]
    pub relations: Vec<DbRelation>,
    #[serde(default)]
    pub indexes: Vec<DbIndex>,
}

impl DbBlock {
    pub fn model(&self, name: &str) -> Option<&DbModel> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// One scheduled job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CronJob {
    /// Schedule expression, captured verbatim (e.g. `daily@9:00`).
    pub schedule: String,
    pub action: String,
}

/// `@cron(...)`: scheduled jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CronBlock {
    pub jobs: Vec<CronJob>,
}

/// One inbound webhook endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub source: String,
    pub path: String,
    pub action: String,
}

/// `@webhook(...)`: inbound webhook endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookBlock {
    pub hooks: Vec<Webhook>,
}

/// One background queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueDef {
    pub name: String,
    pub worker: String,
}

/// `@queue(...)`: background queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueBlock {
    pub queues: Vec<QueueDef>,
}

/// One transactional email template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

/// `@email(...)`: transactional email templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailBlock {
    pub templates: Vec<EmailTemplate>,
}

/// One environment variable, optionally with a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// `@env(...)`: required environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvBlock {
    pub vars: Vec<EnvVar>,
}

/// One named handler with verbatim code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerDef {
    pub name: String,
    pub code: String,
}

/// `@handler(...)`: custom handler definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerBlock {
    pub handlers: Vec<HandlerDef>,
}

/// `@deploy(...)`: deployment target and raw options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployBlock {
    pub provider: String,
    #[serde(default)]
    pub options: Vec<String>,
}
