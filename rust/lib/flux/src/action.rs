use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A payload type with a well-known action path.
///
/// Usually implemented through `#[action("slice/name")]` from `flux_derive`.
pub trait Action: Any + Send + Sync {
    /// Routing path, e.g. `conversations/setSortFilter`.
    const TYPE: &'static str;
}

/// A dispatched action: the action type path plus a type-erased payload.
///
/// Clone is cheap. The payload sits behind an `Arc` so the same action can
/// be handed to every matching reducer and effect without copying.
#[derive(Clone)]
pub struct AnyAction {
    kind: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl AnyAction {
    /// Wrap a typed action under its own `TYPE`.
    pub fn new<A: Action>(action: A) -> Self {
        Self::with_type(A::TYPE, action)
    }

    /// Wrap an arbitrary payload under an explicit type path.
    ///
    /// Used for async lifecycle actions, whose type is derived from the
    /// operation prefix (`{prefix}/fulfilled`) rather than the payload type.
    pub fn with_type<T: Any + Send + Sync>(kind: impl AsRef<str>, payload: T) -> Self {
        Self {
            kind: Arc::from(kind.as_ref()),
            payload: Arc::new(payload),
        }
    }

    /// Build from an already shared payload.
    pub fn from_arc(kind: impl AsRef<str>, payload: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            kind: Arc::from(kind.as_ref()),
            payload,
        }
    }

    /// The action type path.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Downcast the payload. `None` when the stored type is not `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Check the payload type without borrowing it.
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Shared handle to the raw payload.
    pub fn payload_arc(&self) -> Arc<dyn Any + Send + Sync> {
        Arc::clone(&self.payload)
    }
}

impl fmt::Debug for AnyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyAction").field("kind", &self.kind).finish()
    }
}

impl<A: Action> From<A> for AnyAction {
    fn from(action: A) -> Self {
        AnyAction::new(action)
    }
}

/// Handle returned by `Store::subscribe`, needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct SetSortFilter(&'static str);

    impl Action for SetSortFilter {
        const TYPE: &'static str = "conversations/setSortFilter";
    }

    #[test]
    fn new_uses_action_type() {
        let action = AnyAction::new(SetSortFilter("latest"));
        assert_eq!(action.kind(), "conversations/setSortFilter");
        assert_eq!(action.payload::<SetSortFilter>(), Some(&SetSortFilter("latest")));
    }

    #[test]
    fn with_type_overrides_path() {
        let action = AnyAction::with_type("conversations/fetchConversations/pending", 7u64);
        assert_eq!(action.kind(), "conversations/fetchConversations/pending");
        assert_eq!(action.payload::<u64>(), Some(&7));
    }

    #[test]
    fn wrong_payload_type_is_none() {
        let action = AnyAction::new(SetSortFilter("latest"));
        assert!(action.payload::<String>().is_none());
        assert!(!action.is::<u64>());
        assert!(action.is::<SetSortFilter>());
    }

    #[test]
    fn clone_shares_payload() {
        let action = AnyAction::with_type("a/b", vec![1u32, 2, 3]);
        let copy = action.clone();
        let a = action.payload::<Vec<u32>>().unwrap() as *const Vec<u32>;
        let b = copy.payload::<Vec<u32>>().unwrap() as *const Vec<u32>;
        assert_eq!(a, b);
    }

    #[test]
    fn from_typed_action() {
        let action: AnyAction = SetSortFilter("sort_on_priority").into();
        assert_eq!(action.kind(), SetSortFilter::TYPE);
    }

    #[test]
    fn debug_shows_kind_only() {
        let action = AnyAction::with_type("conversations/clearAllConversations", ());
        let dbg = format!("{:?}", action);
        assert!(dbg.contains("conversations/clearAllConversations"));
    }
}
