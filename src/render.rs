//! View rendering collaborators.
//!
//! The cache facade only needs something that turns a view name and two data
//! mappings into a string. [`ViewRegistry`] is the bundled implementation:
//! views are closures or askama templates looked up by name.

use std::collections::HashMap;
use std::fmt;

use askama::Template;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::RenderError;

/// Data handed to a view, keyed by variable name.
pub type ViewData = Map<String, Value>;

/// Renders a named view.
pub trait ViewRenderer: Send + Sync {
    fn render(
        &self,
        view: &str,
        data: &ViewData,
        merge_data: &ViewData,
    ) -> Result<String, RenderError>;
}

/// Merge `merge_data` into `data`. Keys present in `data` win.
pub fn merge_view_data(data: &ViewData, merge_data: &ViewData) -> ViewData {
    let mut merged = merge_data.clone();
    for (name, value) in data {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

type ViewFn = Box<dyn Fn(&ViewData) -> Result<String, RenderError> + Send + Sync>;

/// Named views backed by closures or askama templates.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<String, ViewFn>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view rendered by `view` from the merged data.
    ///
    /// Registering a name twice replaces the earlier view.
    pub fn register<F>(&mut self, name: impl Into<String>, view: F) -> &mut Self
    where
        F: Fn(&ViewData) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.views.insert(name.into(), Box::new(view));
        self
    }

    /// Register an askama template. The merged data is deserialized into `T`
    /// before rendering.
    pub fn register_template<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: Template + DeserializeOwned + 'static,
    {
        let name = name.into();
        let view = name.clone();
        self.register(name, move |data: &ViewData| {
            let template: T =
                serde_json::from_value(Value::Object(data.clone())).map_err(|source| {
                    RenderError::Data {
                        view: view.clone(),
                        source,
                    }
                })?;
            template.render().map_err(|source| RenderError::Template {
                view: view.clone(),
                source,
            })
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.views.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ViewRegistry").field("views", &names).finish()
    }
}

impl ViewRenderer for ViewRegistry {
    fn render(
        &self,
        view: &str,
        data: &ViewData,
        merge_data: &ViewData,
    ) -> Result<String, RenderError> {
        let render = self
            .views
            .get(view)
            .ok_or_else(|| RenderError::missing_view(view))?;
        render(&merge_view_data(data, merge_data))
    }
}
