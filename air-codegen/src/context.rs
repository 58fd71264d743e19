//! Context extraction: the flattened semantic model consumed by every
//! generator.

use air_ast::{
    AirAst, AirField, AirUiNode, ApiRoute, AuthBlock, AirBlock, CronBlock, DbBlock, DeployBlock,
    EmailBlock, EnvBlock, HandlerBlock, Hook, HttpMethod, NavRoute, QueueBlock, PersistBlock,
    ScopeKind, WebhookBlock,
};
use indexmap::IndexMap;

/// Page names that belong to the auth flow and are never public.
const AUTH_PAGES: &[&str] = &["login", "signup", "register"];

/// Denormalized view of an AIR document.
///
/// Built once at the start of a transpile call and read-only from then
/// on. Later blocks of the same kind overwrite earlier ones ("last
/// wins", not a merge).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranspileContext {
    pub app_name: String,
    pub state: Vec<AirField>,
    pub style: IndexMap<String, String>,
    pub ui: Vec<AirUiNode>,
    /// API routes with CRUD shorthand already expanded.
    pub routes: Vec<ApiRoute>,
    pub nav: Vec<NavRoute>,
    pub hooks: Vec<Hook>,
    pub auth: Option<AuthBlock>,
    pub persist: Option<PersistBlock>,
    pub db: Option<DbBlock>,
    pub cron: Option<CronBlock>,
    pub webhooks: Option<WebhookBlock>,
    pub queues: Option<QueueBlock>,
    pub email: Option<EmailBlock>,
    pub env: Option<EnvBlock>,
    pub handlers: Option<HandlerBlock>,
    pub deploy: Option<DeployBlock>,
    pub has_backend: bool,
    pub public_page_names: Vec<String>,
    pub is_ecommerce: bool,
}

impl TranspileContext {
    /// Flatten a parsed document into a transpile context.
    pub fn extract(ast: &AirAst) -> Self {
        let mut ctx = Self {
            app_name: ast.app.name.clone(),
            ..Self::default()
        };

        let mut has_api = false;
        for block in &ast.app.blocks {
            match block {
                AirBlock::State(b) => ctx.state = b.fields.clone(),
                AirBlock::Style(b) => ctx.style = b.properties.clone(),
                AirBlock::Ui(b) => ctx.ui = b.nodes.clone(),
                AirBlock::Api(b) => {
                    has_api = true;
                    ctx.routes = b.routes.clone();
                }
                AirBlock::Auth(b) => ctx.auth = Some(b.clone()),
                AirBlock::Nav(b) => ctx.nav = b.routes.clone(),
                AirBlock::Persist(b) => ctx.persist = Some(b.clone()),
                AirBlock::Hook(b) => ctx.hooks = b.hooks.clone(),
                AirBlock::Db(b) => ctx.db = Some(b.clone()),
                AirBlock::Cron(b) => ctx.cron = Some(b.clone()),
                AirBlock::Webhook(b) => ctx.webhooks = Some(b.clone()),
                AirBlock::Queue(b) => ctx.queues = Some(b.clone()),
                AirBlock::Email(b) => ctx.email = Some(b.clone()),
                AirBlock::Env(b) => ctx.env = Some(b.clone()),
                AirBlock::Handler(b) => ctx.handlers = Some(b.clone()),
                AirBlock::Deploy(b) => ctx.deploy = Some(b.clone()),
            }
        }

        ctx.routes = expand_crud(&ctx.routes);
        ctx.has_backend = ctx.db.is_some()
            || has_api
            || ctx.webhooks.is_some()
            || ctx.cron.is_some()
            || ctx.queues.is_some()
            || ctx.email.is_some()
            || ctx.env.is_some()
            || ctx.deploy.is_some();
        ctx.public_page_names = derive_public_pages(&ctx.nav, ctx.auth.as_ref());
        ctx.is_ecommerce = derive_ecommerce(&ctx);
        ctx
    }

    /// Names of `@page:` scopes declared in the UI tree.
    pub fn page_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for node in &self.ui {
            node.walk(&mut |n| {
                if let AirUiNode::Scoped {
                    scope: ScopeKind::Page,
                    name,
                    ..
                } = n
                {
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
            });
        }
        names
    }
}

/// Expand `crud:` shorthand routes into explicit verb routes.
///
/// Idempotent: explicit routes pass through, and an expansion that
/// would collide with an existing (method, path) pair is dropped.
pub fn expand_crud(routes: &[ApiRoute]) -> Vec<ApiRoute> {
    let mut out: Vec<ApiRoute> = Vec::new();
    for route in routes {
        if route.method != HttpMethod::Crud {
            push_unique(&mut out, route.clone());
            continue;
        }
        let base = route.path.trim_end_matches('/');
        let item = format!("{base}/:id");
        let handler = &route.handler;
        let expanded = [
            (HttpMethod::Get, base.to_string(), format!("{handler}.list")),
            (HttpMethod::Get, item.clone(), format!("{handler}.get")),
            (HttpMethod::Post, base.to_string(), format!("{handler}.create")),
            (HttpMethod::Put, item.clone(), format!("{handler}.update")),
            (HttpMethod::Delete, item, format!("{handler}.remove")),
        ];
        for (method, path, handler) in expanded {
            push_unique(
                &mut out,
                ApiRoute {
                    method,
                    path,
                    params: route.params.clone(),
                    handler,
                },
            );
        }
    }
    out
}

fn push_unique(routes: &mut Vec<ApiRoute>, route: ApiRoute) {
    let exists = routes
        .iter()
        .any(|r| r.method == route.method && r.path == route.path);
    if !exists {
        routes.push(route);
    }
}

/// Page name a nav path resolves to: `/` is home, anchors and leading
/// slashes are stripped.
pub fn page_name(path: &str) -> String {
    let name = path.trim_start_matches('/').trim_start_matches('#');
    if name.is_empty() {
        "home".to_string()
    } else {
        name.to_string()
    }
}

fn derive_public_pages(nav: &[NavRoute], auth: Option<&AuthBlock>) -> Vec<String> {
    let mut excluded: Vec<String> = AUTH_PAGES.iter().map(|s| s.to_string()).collect();
    if let Some(redirect) = auth.and_then(|a| a.redirect.as_deref()) {
        excluded.push(page_name(redirect));
    }

    let mut pages = Vec::new();
    for route in nav.iter().filter(|r| !r.is_conditional()) {
        let name = page_name(&route.path);
        if !excluded.contains(&name) && !pages.contains(&name) {
            pages.push(name);
        }
    }
    pages
}

fn derive_ecommerce(ctx: &TranspileContext) -> bool {
    let Some(db) = &ctx.db else {
        return false;
    };
    if db.model("Product").is_none() || db.model("Category").is_none() {
        return false;
    }
    let mut pages = ctx.page_names();
    for route in &ctx.nav {
        let name = page_name(&route.path);
        if !pages.contains(&name) {
            pages.push(name);
        }
    }
    pages.iter().any(|p| p == "shop") && pages.iter().any(|p| p == "cart")
}

#[cfg(test)]
mod tests {
    use super::*;
    use air_parser::parse;

    fn ctx(source: &str) -> TranspileContext {
        TranspileContext::extract(&parse(source).unwrap())
    }

    #[test]
    fn test_last_block_wins() {
        let ctx = ctx("@app:t\n@state{a:int}\n@state{b:str,c:str}");
        assert_eq!(ctx.state.len(), 2);
        assert_eq!(ctx.state[0].name, "b");
    }

    #[test]
    fn test_crud_expansion() {
        let ctx = ctx("@app:t\n@api(crud:/todos > todos)");
        let routes: Vec<_> = ctx
            .routes
            .iter()
            .map(|r| (r.method, r.path.as_str(), r.handler.as_str()))
            .collect();
        assert_eq!(
            routes,
            vec![
                (HttpMethod::Get, "/todos", "todos.list"),
                (HttpMethod::Get, "/todos/:id", "todos.get"),
                (HttpMethod::Post, "/todos", "todos.create"),
                (HttpMethod::Put, "/todos/:id", "todos.update"),
                (HttpMethod::Delete, "/todos/:id", "todos.remove"),
            ]
        );
    }

    #[test]
    fn test_crud_expansion_is_idempotent() {
        let ctx = ctx("@app:t\n@api(crud:/todos > todos)");
        let again = expand_crud(&ctx.routes);
        assert_eq!(again, ctx.routes);
    }

    #[test]
    fn test_crud_does_not_duplicate_explicit_routes() {
        let ctx = ctx("@app:t\n@api(GET:/todos > custom.list, crud:/todos > todos)");
        let gets: Vec<_> = ctx
            .routes
            .iter()
            .filter(|r| r.method == HttpMethod::Get && r.path == "/todos")
            .collect();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].handler, "custom.list");
    }

    #[test]
    fn test_has_backend() {
        assert!(!ctx("@app:t\n@state{x:int}\n@ui(header)").has_backend);
        assert!(ctx("@app:t\n@db{ T{id:int:primary} }").has_backend);
        assert!(ctx("@app:t\n@cron(30m > jobs.tick)").has_backend);
        assert!(ctx("@app:t\n@env(API_KEY)").has_backend);
        // An @api block counts even when it declares no routes.
        assert!(ctx("@app:t\n@api()").has_backend);
        // @handler alone is client-side logic, not a backend signal.
        assert!(!ctx("@app:t\n@handler(notify > push.send(user))").has_backend);
    }

    #[test]
    fn test_public_pages_exclude_auth() {
        let ctx = ctx(
            "@app:t\n@nav(/, /shop, /login, /account>?logged_in>account)\n@auth(required, redirect:/account)",
        );
        assert_eq!(ctx.public_page_names, vec!["home", "shop"]);
    }

    #[test]
    fn test_ecommerce_derivation() {
        let full = "@app:t\n@ui(@page:shop(grid), @page:cart(list))\n@db{ Product{id:int:primary} \n Category{id:int:primary} }";
        assert!(ctx(full).is_ecommerce);

        let no_category = "@app:t\n@ui(@page:shop(grid), @page:cart(list))\n@db{ Product{id:int:primary} }";
        assert!(!ctx(no_category).is_ecommerce);

        let no_cart = "@app:t\n@ui(@page:shop(grid))\n@db{ Product{id:int:primary} \n Category{id:int:primary} }";
        assert!(!ctx(no_cart).is_ecommerce);
    }

    #[test]
    fn test_ecommerce_pages_may_come_from_nav() {
        let source = "@app:t\n@nav(/shop, /cart)\n@db{ Product{id:int:primary} \n Category{id:int:primary} }";
        assert!(ctx(source).is_ecommerce);
    }
}
