use std::collections::BTreeMap;

use crate::question::Question;
use crate::signal::RenderResult;

/// A type-specific capability that performs the actual interaction for one
/// fully-resolved question and returns a raw answer or a navigation signal.
///
/// The engine never reads terminal input itself; it only dispatches here.
pub trait Renderer {
    fn render(&self, question: &Question) -> RenderResult;
}

impl<F> Renderer for F
where
    F: Fn(&Question) -> RenderResult,
{
    fn render(&self, question: &Question) -> RenderResult {
        self(question)
    }
}

/// Mapping from type tag to renderer. Dispatching a tag with no registered
/// renderer is a fatal configuration error.
#[derive(Default)]
pub struct Registry {
    renderers: BTreeMap<String, Box<dyn Renderer>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, tag: impl Into<String>, renderer: impl Renderer + 'static) {
        self.renderers.insert(tag.into(), Box::new(renderer));
    }

    pub fn get(&self, tag: &str) -> Option<&dyn Renderer> {
        self.renderers.get(tag).map(Box::as_ref)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }
}
