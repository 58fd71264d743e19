//! Server target: service bootstrap, route table, schema, seed data,
//! and stubs for the declared backend services.

use air_core::{OutputFile, to_camel_case};
use eyre::Result;

use crate::analyze::UiAnalysis;
use crate::context::TranspileContext;
use crate::generator::{Generator, Target};
use crate::generators::js_default;

pub struct ServerGenerator;

impl Generator for ServerGenerator {
    fn name(&self) -> &'static str {
        "server"
    }

    fn target(&self) -> Target {
        Target::Server
    }

    fn generate(&self, ctx: &TranspileContext, _ui: &UiAnalysis) -> Result<Vec<OutputFile>> {
        if !ctx.has_backend {
            return Ok(Vec::new());
        }
        let mut files = vec![index_js(ctx)];
        if ctx.db.is_some() {
            files.push(db_js(ctx));
            files.push(seed_js(ctx));
        }
        if ctx.cron.is_some() || ctx.queues.is_some() {
            files.push(jobs_js(ctx));
        }
        if let Some(webhooks) = &ctx.webhooks {
            files.push(webhooks_js(webhooks));
        }
        if let Some(email) = &ctx.email {
            files.push(email_js(email));
        }
        if let Some(env) = &ctx.env {
            files.push(env_example(env));
        }
        Ok(files)
    }
}

fn index_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("import express from 'express';\n");
    if ctx.db.is_some() {
        out.push_str("import { db } from './db.js';\n");
    }
    if ctx.webhooks.is_some() {
        out.push_str("import { registerWebhooks } from './webhooks.js';\n");
    }
    if ctx.cron.is_some() || ctx.queues.is_some() {
        out.push_str("import { startJobs } from './jobs.js';\n");
    }
    out.push_str("\nconst app = express();\napp.use(express.json());\n\n");

    for route in &ctx.routes {
        let method = route.method.as_str().to_lowercase();
        let handler = to_camel_case(&route.handler.replace(['.', '/'], "_"));
        out.push_str(&format!(
            "app.{method}('/api{}', (req, res) => handlers.{handler}(req, res));\n",
            route.path
        ));
    }
    if !ctx.routes.is_empty() {
        out.push_str("\nconst handlers = new Proxy({}, {\n  get: (_, name) => (req, res) => res.status(501).json({ error: `${String(name)} not implemented` }),\n});\n");
    }

    if let Some(auth) = &ctx.auth {
        if auth.required {
            out.push_str("\napp.use((req, res, next) => {\n  if (!req.headers.authorization) return res.status(401).end();\n  next();\n});\n");
        }
    }
    if ctx.webhooks.is_some() {
        out.push_str("\nregisterWebhooks(app);\n");
    }
    if ctx.cron.is_some() || ctx.queues.is_some() {
        out.push_str("startJobs();\n");
    }
    out.push_str("\nconst port = process.env.PORT ?? 3000;\napp.listen(port, () => console.log(`listening on ${port}`));\n");
    OutputFile::new("server/index.js", out)
}

fn db_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("// In-memory tables; swap for a real driver in production.\n");
    out.push_str("export const db = {\n");
    if let Some(db) = &ctx.db {
        for model in &db.models {
            out.push_str(&format!("  {}: [],\n", to_camel_case(&model.name)));
        }
    }
    out.push_str("};\n\nexport const schema = {\n");
    if let Some(db) = &ctx.db {
        for model in &db.models {
            out.push_str(&format!("  {}: {{\n", model.name));
            for field in &model.fields {
                let mut flags = Vec::new();
                if field.primary {
                    flags.push("primary".to_string());
                }
                if field.required {
                    flags.push("required".to_string());
                }
                if field.auto {
                    flags.push("auto".to_string());
                }
                if let Some(default) = &field.default {
                    flags.push(format!("default({default})"));
                }
                out.push_str(&format!(
                    "    {}: {{ default: {}, flags: {:?} }},\n",
                    field.name,
                    js_default(&field.ty),
                    flags
                ));
            }
            out.push_str("  },\n");
        }
        for relation in &db.relations {
            out.push_str(&format!(
                "  // relation: {}.{} -> {}{}\n",
                relation.from_model,
                relation.from_field,
                relation.to_model,
                relation
                    .to_field
                    .as_ref()
                    .map(|f| format!(".{f}"))
                    .unwrap_or_default()
            ));
        }
    }
    out.push_str("};\n");
    OutputFile::new("server/db.js", out)
}

fn seed_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("import { db } from './db.js';\n\n");
    if let Some(db) = &ctx.db {
        for model in &db.models {
            out.push_str(&format!("db.{}.length = 0;\n", to_camel_case(&model.name)));
        }
    }
    out.push_str("\nconsole.log('database seeded');\n");
    OutputFile::new("server/seed.js", out)
}

fn jobs_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("export function startJobs() {\n");
    if let Some(cron) = &ctx.cron {
        for job in &cron.jobs {
            out.push_str(&format!(
                "  schedule('{}', () => run('{}'));\n",
                job.schedule, job.action
            ));
        }
    }
    if let Some(queues) = &ctx.queues {
        for queue in &queues.queues {
            out.push_str(&format!(
                "  consume('{}', (msg) => run('{}', msg));\n",
                queue.name, queue.worker
            ));
        }
    }
    out.push_str("}\n\nfunction schedule(spec, fn) {\n  // TODO: wire to a real scheduler; spec strings pass through verbatim.\n  void spec;\n  void fn;\n}\n\nfunction consume(queue, fn) {\n  void queue;\n  void fn;\n}\n\nfunction run(action, payload) {\n  console.log('job', action, payload ?? '');\n}\n");
    OutputFile::new("server/jobs.js", out)
}

fn webhooks_js(webhooks: &air_ast::WebhookBlock) -> OutputFile {
    let mut out = String::new();
    out.push_str("export function registerWebhooks(app) {\n");
    for hook in &webhooks.hooks {
        out.push_str(&format!(
            "  app.post('{}', (req, res) => {{\n    console.log('webhook from {}:', '{}');\n    res.status(202).end();\n  }});\n",
            hook.path, hook.source, hook.action
        ));
    }
    out.push_str("}\n");
    OutputFile::new("server/webhooks.js", out)
}

fn email_js(email: &air_ast::EmailBlock) -> OutputFile {
    let mut out = String::new();
    out.push_str("export const templates = {\n");
    for template in &email.templates {
        out.push_str(&format!(
            "  {}: {{ subject: '{}', body: {} }},\n",
            template.name,
            template.subject.replace('\'', "\\'"),
            template
                .template
                .as_ref()
                .map(|t| format!("'{t}'"))
                .unwrap_or_else(|| "null".to_string())
        ));
    }
    out.push_str("};\n");
    OutputFile::new("server/email.js", out)
}

fn env_example(env: &air_ast::EnvBlock) -> OutputFile {
    let mut out = String::new();
    for var in &env.vars {
        out.push_str(&format!(
            "{}={}\n",
            var.name,
            var.default.as_deref().unwrap_or("")
        ));
    }
    OutputFile::new("server/.env.example", out)
}
