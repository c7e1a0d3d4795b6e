use std::collections::HashMap;

pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");
pub const DEFAULT_CSS: &str = include_str!("../templates/default.css");
pub const MAIN_JS: &str = include_str!("../templates/main.js");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("default.html", DEFAULT_TEMPLATE);
  templates.insert("default.css", DEFAULT_CSS);
  templates.insert("main.js", MAIN_JS);
  templates
}
