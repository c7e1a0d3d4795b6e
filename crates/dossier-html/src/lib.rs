pub mod render;
pub mod site;
pub mod template;

pub use render::{render_node, render_nodes, render_outline};
pub use site::generate_site;
pub use template::render_page;
