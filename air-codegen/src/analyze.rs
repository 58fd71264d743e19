//! UI tree analysis: classify pages, components, mutations, and
//! interaction patterns ahead of code generation.

use air_ast::{AirUiNode, ScopeKind, UiPrefixOp};

/// Structural HTML-ish names that never become standalone components.
const LAYOUT_ELEMENTS: &[&str] = &[
    "div", "span", "header", "footer", "main", "nav", "section", "aside", "group", "input",
    "button", "form", "a", "img", "ul", "li", "h1", "h2", "h3", "p",
];

/// What the UI tree asks of the generated application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiAnalysis {
    /// `@page:` scope names, in declaration order.
    pub pages: Vec<String>,
    /// `@section:` scope names.
    pub sections: Vec<String>,
    /// Custom element names that become components.
    pub components: Vec<String>,
    /// Targets of `!` action prefixes.
    pub mutations: Vec<String>,
    /// State fields referenced through `$` bindings.
    pub bindings: Vec<String>,
    /// Detected interaction patterns: `list`, `form`, `stream`,
    /// `conditional`.
    pub patterns: Vec<String>,
}

impl UiAnalysis {
    pub fn has_pattern(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p == name)
    }
}

/// Single pass over the UI tree. Purely structural; never consults
/// state or routes.
pub fn analyze_ui(nodes: &[AirUiNode]) -> UiAnalysis {
    let mut analysis = UiAnalysis::default();
    for node in nodes {
        node.walk(&mut |n| visit(n, &mut analysis));
    }
    analysis
}

fn visit(node: &AirUiNode, analysis: &mut UiAnalysis) {
    match node {
        AirUiNode::Scoped { scope, name, .. } => {
            let list = match scope {
                ScopeKind::Page => &mut analysis.pages,
                ScopeKind::Section => &mut analysis.sections,
            };
            push_unique(list, name);
        }
        AirUiNode::Element { name, .. } => {
            // Path atoms (`/signup`, `/#hero`) are link targets, not
            // component names.
            if !LAYOUT_ELEMENTS.contains(&name.as_str())
                && !name.contains('.')
                && !name.starts_with('/')
            {
                push_unique(&mut analysis.components, name);
            }
        }
        AirUiNode::Unary { op, operand } => {
            let target = leaf_name(operand);
            match op {
                UiPrefixOp::Action => {
                    if let Some(target) = target {
                        push_unique(&mut analysis.mutations, target);
                    }
                    push_pattern(analysis, "form");
                }
                UiPrefixOp::Binding => {
                    if let Some(target) = target {
                        push_unique(&mut analysis.bindings, target);
                    }
                }
                UiPrefixOp::Repeat => push_pattern(analysis, "list"),
                UiPrefixOp::Stream => push_pattern(analysis, "stream"),
                UiPrefixOp::Conditional => push_pattern(analysis, "conditional"),
                UiPrefixOp::Hoist | UiPrefixOp::Ref => {}
            }
        }
        _ => {}
    }
}

/// The element name at the head of an operand expression, e.g. the
/// `add` of `!add:todo`.
fn leaf_name(node: &AirUiNode) -> Option<&str> {
    match node {
        AirUiNode::Element { name, .. } => Some(name),
        AirUiNode::Binary { left, .. } => leaf_name(left),
        AirUiNode::Unary { operand, .. } => leaf_name(operand),
        _ => None,
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn push_pattern(analysis: &mut UiAnalysis, pattern: &str) {
    push_unique(&mut analysis.patterns, pattern);
}
