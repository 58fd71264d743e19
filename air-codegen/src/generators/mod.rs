//! Built-in generators for the client, server, and docs targets.

mod client;
mod docs;
mod server;

pub use client::ClientGenerator;
pub use docs::DocsGenerator;
pub use server::ServerGenerator;

use air_ast::AirType;

use crate::generator::Generator;

/// The generators a default transpile call runs, in output order.
pub fn builtin_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(ClientGenerator),
        Box::new(ServerGenerator),
        Box::new(DocsGenerator),
    ]
}

/// JavaScript initializer literal for a state field's type.
pub(crate) fn js_default(ty: &AirType) -> String {
    match ty {
        AirType::Str { default } => match default {
            Some(value) => format!("'{value}'"),
            None => "''".to_string(),
        },
        AirType::Int { default } => default.unwrap_or(0).to_string(),
        AirType::Float { default } => default.unwrap_or(0.0).to_string(),
        AirType::Bool { default } => default.unwrap_or(false).to_string(),
        AirType::Enum { values } => values
            .first()
            .map(|v| format!("'{v}'"))
            .unwrap_or_else(|| "null".to_string()),
        AirType::Array { .. } => "[]".to_string(),
        AirType::Object { .. } => "{}".to_string(),
        AirType::Optional { .. } | AirType::Ref { .. } | AirType::Date | AirType::Datetime => {
            "null".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_default() {
        assert_eq!(js_default(&AirType::str()), "''");
        assert_eq!(
            js_default(&AirType::Str {
                default: Some("draft".into())
            }),
            "'draft'"
        );
        assert_eq!(js_default(&AirType::Int { default: Some(3) }), "3");
        assert_eq!(
            js_default(&AirType::Enum {
                values: vec!["all".into(), "done".into()]
            }),
            "'all'"
        );
        assert_eq!(
            js_default(&AirType::Array {
                of: Box::new(AirType::str())
            }),
            "[]"
        );
    }
}
