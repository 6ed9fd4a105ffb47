//! Template types for typed variable injection.

use std::borrow::Cow;
use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
///
/// Content is either embedded at compile time or loaded at runtime
/// (e.g. the page shell read back from the cache directory).
#[derive(Debug, Clone)]
pub struct Template<V> {
    content: Cow<'static, str>,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content: Cow::Borrowed(content),
            _marker: PhantomData,
        }
    }

    /// Template from runtime content.
    pub fn from_string(content: String) -> Self {
        Self {
            content: Cow::Owned(content),
            _marker: PhantomData,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(&self.content)
    }
}
