//! The UI expression tree.

use serde::{Deserialize, Serialize};

/// Binary operators of the UI grammar, lowest to highest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiOp {
    /// `+`: sibling composition.
    Compose,
    /// `>`: containment / flow.
    Flow,
    /// `|`: pipe / alternation.
    Pipe,
    /// `:`: modifier binding.
    Bind,
}

impl UiOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UiOp::Compose => "+",
            UiOp::Flow => ">",
            UiOp::Pipe => "|",
            UiOp::Bind => ":",
        }
    }
}

/// Prefix operators of the UI grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiPrefixOp {
    /// `*`: repetition over a collection.
    Repeat,
    /// `!`: action trigger.
    Action,
    /// `~`: live/streamed value.
    Stream,
    /// `^`: hoist to layout level.
    Hoist,
    /// `?`: conditional presence.
    Conditional,
    /// `#`: entity/anchor reference.
    Ref,
    /// `$`: state binding (right-associative).
    Binding,
}

impl UiPrefixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UiPrefixOp::Repeat => "*",
            UiPrefixOp::Action => "!",
            UiPrefixOp::Stream => "~",
            UiPrefixOp::Hoist => "^",
            UiPrefixOp::Conditional => "?",
            UiPrefixOp::Ref => "#",
            UiPrefixOp::Binding => "$",
        }
    }
}

/// Scope kind for named UI sub-trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Page,
    Section,
}

/// A node in the UI expression tree.
///
/// `scoped` nodes always carry a name and a (possibly empty) child list;
/// every `binary`/`unary` operator comes from the fixed symbolic set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AirUiNode {
    Element {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<AirUiNode>,
    },
    Text {
        value: String,
    },
    Value {
        value: String,
    },
    Binary {
        op: UiOp,
        left: Box<AirUiNode>,
        right: Box<AirUiNode>,
    },
    Unary {
        op: UiPrefixOp,
        operand: Box<AirUiNode>,
    },
    Scoped {
        scope: ScopeKind,
        name: String,
        children: Vec<AirUiNode>,
    },
}

impl AirUiNode {
    /// Bare element with no children.
    pub fn element(name: impl Into<String>) -> Self {
        AirUiNode::Element {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Element name, when this node is a plain element.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            AirUiNode::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Visit this node and every descendant, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a AirUiNode)) {
        visit(self);
        match self {
            AirUiNode::Element { children, .. } | AirUiNode::Scoped { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            AirUiNode::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            AirUiNode::Unary { operand, .. } => operand.walk(visit),
            AirUiNode::Text { .. } | AirUiNode::Value { .. } => {}
        }
    }
}
