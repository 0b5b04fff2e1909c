use thiserror::Error;

/// Failure raised by a [`ViewRenderer`](crate::render::ViewRenderer).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view `{view}` is not registered")]
    MissingView { view: String },
    #[error("view `{view}` received data it cannot use: {source}")]
    Data {
        view: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("view `{view}` failed to render: {source}")]
    Template {
        view: String,
        #[source]
        source: askama::Error,
    },
    #[error("view `{view}` failed to render: {message}")]
    Other { view: String, message: String },
}

impl RenderError {
    pub fn missing_view(view: impl Into<String>) -> Self {
        Self::MissingView { view: view.into() }
    }

    pub fn other(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            view: view.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by [`CacheFacade`](crate::cache::CacheFacade) and cache stores.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("cache store error: {message}")]
    Store { message: String },
    #[error("`{method}` is not supported by the configured cache store")]
    MethodNotSupported { method: &'static str },
}

impl CacheError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn method_not_supported(method: &'static str) -> Self {
        Self::MethodNotSupported { method }
    }
}
