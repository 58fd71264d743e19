//! Check operation: summarize a parsed document without generating
//! code.

use air_ast::AirAst;
use air_codegen::{TranspileContext, analyze_ui};

use crate::reports::CheckReport;

/// Execute the check operation.
pub fn check(ast: &AirAst, filename: &str) -> CheckReport {
    let ctx = TranspileContext::extract(ast);
    let ui = analyze_ui(&ctx.ui);

    CheckReport {
        filename: filename.to_string(),
        app_name: ctx.app_name.clone(),
        blocks: ast.app.blocks.len(),
        state_fields: ctx.state.len(),
        routes: ctx.routes.len(),
        models: ctx.db.as_ref().map_or(0, |db| db.models.len()),
        pages: ui.pages.len(),
        components: ui.components.len(),
        has_backend: ctx.has_backend,
        is_ecommerce: ctx.is_ecommerce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_counts() {
        let ast = air_parser::parse(
            "@app:t\n@state{a:int,b:str}\n@ui(@page:home(list))\n@api(crud:/items > items)\n@db{ Item{id:int:primary} }",
        )
        .unwrap();
        let report = check(&ast, "app.air");

        assert_eq!(report.app_name, "t");
        assert_eq!(report.blocks, 4);
        assert_eq!(report.state_fields, 2);
        assert_eq!(report.routes, 5);
        assert_eq!(report.models, 1);
        assert_eq!(report.pages, 1);
        assert!(report.has_backend);
        assert!(!report.is_ecommerce);
    }
}
