/// Lifecycle of one remotely fetched value.
///
/// `Idle → Loading` when a fetch starts, then `Loading → Loaded` or `Loading → Failed`
/// when it resolves. A terminal state may go back to `Loading` on a refetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState::Idle
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    /// The loaded value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            ResourceState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure reason, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            ResourceState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Moves to `Loading`. Returns `false` (and changes nothing) if already loading.
    pub fn begin_load(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        *self = ResourceState::Loading;
        true
    }

    /// Moves a loading resource to `Loaded`. Returns `false` if it was not loading.
    pub fn succeed(&mut self, value: T) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = ResourceState::Loaded(value);
        true
    }

    /// Moves a loading resource to `Failed`. Returns `false` if it was not loading.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = ResourceState::Failed(reason.into());
        true
    }
}
