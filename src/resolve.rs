use log::warn;
use once_cell::sync::Lazy;

use crate::bindings::BindingStore;
use crate::models::{Action, BaseGesture, Gesture, SystemIntentKind};

/// Built-in actions for gestures the user has not bound yet. Enumerated
/// explicitly as data; everything absent from this table defaults to
/// [`Action::Unbound`]. The volume keys are listed so that their no-op
/// default is visible to a settings surface.
pub static DEFAULT_ACTIONS: Lazy<Vec<(Gesture, Action)>> = Lazy::new(|| {
    vec![
        (
            Gesture::new(BaseGesture::LongPress),
            Action::SystemIntent(SystemIntentKind::OpenSettings),
        ),
        (
            Gesture::new(BaseGesture::SwipeDown),
            Action::SystemIntent(SystemIntentKind::ExpandNotifications),
        ),
        (Gesture::new(BaseGesture::VolumeUp), Action::Unbound),
        (Gesture::new(BaseGesture::VolumeDown), Action::Unbound),
    ]
});

/// Resolve a gesture to its action using the built-in default table.
pub fn resolve(gesture: Gesture, store: &dyn BindingStore) -> Action {
    resolve_with_defaults(gesture, store, &DEFAULT_ACTIONS)
}

/// Resolve a gesture against an explicit default table.
///
/// Total over the gesture space: a stored, well-formed binding wins; a
/// missing or corrupt one falls back to the default table; gestures absent
/// from the table resolve to [`Action::Unbound`]. Never fails.
pub fn resolve_with_defaults(
    gesture: Gesture,
    store: &dyn BindingStore,
    defaults: &[(Gesture, Action)],
) -> Action {
    let key = gesture.key();
    if let Some(value) = store.get(&key) {
        match Action::decode(&value) {
            Some(action) => return action,
            None => warn!("corrupt binding for {key:?} ({value:?}), using default"),
        }
    }
    defaults
        .iter()
        .find(|(g, _)| *g == gesture)
        .map(|(_, action)| action.clone())
        .unwrap_or(Action::Unbound)
}
