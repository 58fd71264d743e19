//! Check command report data structures.

use super::output::{Output, Report};

/// Summary of a validated document.
#[derive(Debug)]
pub struct CheckReport {
    pub filename: String,
    pub app_name: String,
    pub blocks: usize,
    pub state_fields: usize,
    pub routes: usize,
    pub models: usize,
    pub pages: usize,
    pub components: usize,
    pub has_backend: bool,
    pub is_ecommerce: bool,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.filename));
        out.newline();

        out.key_value("App", &self.app_name);
        out.key_value("Blocks", &self.blocks.to_string());
        out.key_value("State fields", &self.state_fields.to_string());
        out.key_value("Routes", &self.routes.to_string());
        out.key_value("Models", &self.models.to_string());
        out.key_value("Pages", &self.pages.to_string());
        out.key_value("Components", &self.components.to_string());
        out.key_value("Backend", if self.has_backend { "yes" } else { "no" });
        if self.is_ecommerce {
            out.key_value("Profile", "ecommerce");
        }
    }
}
