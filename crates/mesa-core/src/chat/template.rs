//! Text templates evaluated against the current restaurant context.

use std::fmt;
use std::sync::Arc;

use mesa_types::chat::ChatContext;

/// Placeholder marker replaced by the restaurant display name.
pub const RESTAURANT_NAME: &str = "{restaurant_name}";

/// A string that may depend on the current context.
#[derive(Clone)]
pub enum Template {
    /// Used verbatim.
    Static(String),
    /// `{restaurant_name}` is replaced by the context's display name.
    Interpolated(String),
    Dynamic(Arc<dyn Fn(&ChatContext) -> String + Send + Sync>),
}

impl Template {
    pub fn dynamic(f: impl Fn(&ChatContext) -> String + Send + Sync + 'static) -> Self {
        Template::Dynamic(Arc::new(f))
    }

    pub fn render(&self, context: &ChatContext) -> String {
        match self {
            Template::Static(text) => text.clone(),
            Template::Interpolated(pattern) => {
                pattern.replace(RESTAURANT_NAME, context.display_name())
            }
            Template::Dynamic(f) => f(context),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Template::Interpolated(pattern) => f.debug_tuple("Interpolated").field(pattern).finish(),
            Template::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::Static(text.to_string())
    }
}
