//! Loading / error / ready switch for page view-models

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Error(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Error(message) => ViewState::Error(message),
            ViewState::Ready(value) => ViewState::Ready(f(value)),
        }
    }
}
