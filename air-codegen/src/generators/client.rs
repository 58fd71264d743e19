//! Client target: entry point, app shell, state store, styles, and one
//! component per custom element.

use air_core::{OutputFile, to_camel_case, to_pascal_case};
use eyre::Result;

use crate::analyze::UiAnalysis;
use crate::context::TranspileContext;
use crate::generator::{Generator, Target};
use crate::generators::js_default;

pub struct ClientGenerator;

impl Generator for ClientGenerator {
    fn name(&self) -> &'static str {
        "client"
    }

    fn target(&self) -> Target {
        Target::Client
    }

    fn generate(&self, ctx: &TranspileContext, ui: &UiAnalysis) -> Result<Vec<OutputFile>> {
        let mut files = vec![
            index_html(ctx),
            main_jsx(),
            app_jsx(ctx, ui),
            store_js(ctx),
            styles_css(ctx),
        ];
        for component in &ui.components {
            files.push(component_jsx(component, ui));
        }
        if ctx.has_backend {
            files.push(api_js(ctx));
        }
        Ok(files)
    }
}

fn index_html(ctx: &TranspileContext) -> OutputFile {
    let content = format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"UTF-8\" />\n    <title>{}</title>\n  </head>\n  <body>\n    <div id=\"root\"></div>\n    <script type=\"module\" src=\"/src/main.jsx\"></script>\n  </body>\n</html>\n",
        ctx.app_name
    );
    OutputFile::new("index.html", content)
}

fn main_jsx() -> OutputFile {
    let content = "\
import { createRoot } from 'react-dom/client';
import App from './App.jsx';

createRoot(document.getElementById('root')).render(<App />);
";
    OutputFile::new("src/main.jsx", content)
}

fn app_jsx(ctx: &TranspileContext, ui: &UiAnalysis) -> OutputFile {
    let mut out = String::new();
    out.push_str("import { useStore } from './store.js';\n");
    for component in &ui.components {
        let name = to_pascal_case(component);
        out.push_str(&format!(
            "import {name} from './components/{name}.jsx';\n"
        ));
    }
    if ctx.has_backend {
        out.push_str("import * as api from './api.js';\n");
    }
    out.push_str("import './styles.css';\n\n");

    out.push_str("export default function App() {\n");
    out.push_str("  const store = useStore();\n");
    if !ui.pages.is_empty() {
        out.push_str("  const page = store.page;\n");
    }
    out.push_str("  return (\n    <div className=\"app\">\n");
    if ui.pages.is_empty() {
        for component in &ui.components {
            let name = to_pascal_case(component);
            out.push_str(&format!("      <{name} store={{store}} />\n"));
        }
    } else {
        for page in &ui.pages {
            out.push_str(&format!(
                "      {{page === '{page}' && <section className=\"page-{page}\" />}}\n"
            ));
        }
        for component in &ui.components {
            let name = to_pascal_case(component);
            out.push_str(&format!("      <{name} store={{store}} />\n"));
        }
    }
    out.push_str("    </div>\n  );\n}\n");
    OutputFile::new("src/App.jsx", out)
}

fn store_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("import { useState } from 'react';\n\n");
    out.push_str("const initialState = {\n");
    for field in &ctx.state {
        out.push_str(&format!(
            "  {}: {},\n",
            to_camel_case(&field.name),
            js_default(&field.ty)
        ));
    }
    if !ctx.public_page_names.is_empty() {
        out.push_str(&format!(
            "  page: '{}',\n",
            ctx.public_page_names
                .first()
                .map(String::as_str)
                .unwrap_or("home")
        ));
    }
    out.push_str("};\n\n");

    if let Some(persist) = &ctx.persist {
        let storage = if persist.options.iter().any(|o| o == "session") {
            "sessionStorage"
        } else {
            "localStorage"
        };
        out.push_str(&format!("const PERSISTED = {:?};\n", persist.keys));
        out.push_str(&format!("const storage = window.{storage};\n\n"));
        out.push_str(
            "function load() {\n  const state = { ...initialState };\n  for (const key of PERSISTED) {\n    const raw = storage.getItem(key);\n    if (raw !== null) state[key] = JSON.parse(raw);\n  }\n  return state;\n}\n\nfunction persist(state) {\n  for (const key of PERSISTED) {\n    storage.setItem(key, JSON.stringify(state[key]));\n  }\n}\n\n",
        );
        out.push_str(
            "export function useStore() {\n  const [state, setState] = useState(load);\n  const update = (patch) => {\n    setState((prev) => {\n      const next = { ...prev, ...patch };\n      persist(next);\n      return next;\n    });\n  };\n  return { ...state, update };\n}\n",
        );
    } else {
        out.push_str(
            "export function useStore() {\n  const [state, setState] = useState(initialState);\n  const update = (patch) => setState((prev) => ({ ...prev, ...patch }));\n  return { ...state, update };\n}\n",
        );
    }
    OutputFile::new("src/store.js", out)
}

fn styles_css(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str(":root {\n");
    for (name, value) in &ctx.style {
        out.push_str(&format!("  --{name}: {value};\n"));
    }
    out.push_str("}\n\n.app {\n  margin: 0 auto;\n  max-width: 60rem;\n}\n");
    OutputFile::new("src/styles.css", out)
}

fn component_jsx(component: &str, ui: &UiAnalysis) -> OutputFile {
    let name = to_pascal_case(component);
    let mut out = String::new();
    out.push_str(&format!("export default function {name}({{ store }}) {{\n"));
    if ui.mutations.iter().any(|m| m == component) {
        out.push_str(&format!(
            "  const on{name} = () => store.update({{}});\n"
        ));
        out.push_str(&format!(
            "  return <button className=\"{component}\" onClick={{on{name}}}>{name}</button>;\n"
        ));
    } else {
        out.push_str(&format!(
            "  return <div className=\"{component}\" />;\n"
        ));
    }
    out.push_str("}\n");
    OutputFile::new(format!("src/components/{name}.jsx"), out)
}

fn api_js(ctx: &TranspileContext) -> OutputFile {
    let mut out = String::new();
    out.push_str("const BASE = import.meta.env.VITE_API_URL ?? '/api';\n\n");
    out.push_str(
        "async function request(method, path, body) {\n  const res = await fetch(`${BASE}${path}`, {\n    method,\n    headers: { 'Content-Type': 'application/json' },\n    body: body === undefined ? undefined : JSON.stringify(body),\n  });\n  if (!res.ok) throw new Error(`${method} ${path} failed: ${res.status}`);\n  return res.json();\n}\n\n",
    );
    for route in &ctx.routes {
        let fn_name = to_camel_case(&route.handler.replace(['.', '/'], "_"));
        let method = route.method.as_str();
        if route.path.contains(':') {
            let path = route.path.replace(":id", "${id}");
            let takes_body = matches!(method, "POST" | "PUT" | "PATCH");
            let args = if takes_body { "id, body" } else { "id" };
            let body = if takes_body { ", body" } else { "" };
            out.push_str(&format!(
                "export const {fn_name} = ({args}) => request('{method}', `{path}`{body});\n"
            ));
        } else if matches!(method, "POST" | "PUT" | "PATCH") {
            out.push_str(&format!(
                "export const {fn_name} = (body) => request('{method}', '{}', body);\n",
                route.path
            ));
        } else {
            out.push_str(&format!(
                "export const {fn_name} = () => request('{method}', '{}');\n",
                route.path
            ));
        }
    }
    OutputFile::new("src/api.js", out)
}
