//! Name-shape conversions for generated identifiers.
//!
//! AIR names arrive in kebab-case (`todo-app`), snake_case
//! (`new_todo`), or PascalCase (model names); generated code needs all
//! three shapes.

/// Convert to PascalCase (e.g. "todo-list" -> "TodoList").
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert to camelCase (e.g. "new-todo" -> "newTodo").
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert to snake_case (e.g. "TodoList" -> "todo_list").
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result.replace('-', "_")
}
