/// Outcome of one asynchronous backend operation.
///
/// A value is only reachable through [`LazyValue::Success`]; while an operation
/// is `Loading` nothing authoritative can be read. Each new operation replaces
/// the whole value instead of editing a terminal one in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LazyValue<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

pub type LazyVoid = LazyValue<()>;

impl<T> LazyValue<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> LazyStatus {
        match self {
            Self::Idle => LazyStatus::Idle,
            Self::Loading => LazyStatus::Loading,
            Self::Success(_) => LazyStatus::Success,
            Self::Error(_) => LazyStatus::Error,
        }
    }

    pub fn map<U, F>(self, f: F) -> LazyValue<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Idle => LazyValue::Idle,
            Self::Loading => LazyValue::Loading,
            Self::Success(value) => LazyValue::Success(f(value)),
            Self::Error(message) => LazyValue::Error(message),
        }
    }

    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(message) => Self::Error(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_hidden_unless_success() {
        let loading: LazyValue<u32> = LazyValue::Loading;
        assert_eq!(loading.value(), None);
        assert_eq!(loading.status(), LazyStatus::Loading);

        let done = LazyValue::Success(7);
        assert_eq!(done.value(), Some(&7));
        assert!(done.error().is_none());
    }

    #[test]
    fn from_result_maps_errors_to_messages() {
        let failed: LazyValue<u32> = LazyValue::from_result(Err("boom".to_string()));
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.is_error());

        let mapped = LazyValue::Success(2).map(|value| value * 10);
        assert_eq!(mapped, LazyValue::Success(20));
    }

    #[test]
    fn default_is_idle() {
        let value: LazyVoid = LazyValue::default();
        assert!(value.is_idle());
    }
}
