use log::{info, warn};

use crate::classify::{classify, Point};
use crate::execute::{execute, ExecutionError, HostDispatch};
use crate::models::{Action, AppEntry, BaseGesture, Gesture, PickerIntention};
use crate::resolve::resolve;
use crate::state::LauncherState;
use crate::bindings;

/// Hardware keys the home screen intercepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareKey {
    Back,
    VolumeUp,
    VolumeDown,
}

/// What one input event turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// The classified gesture, if the event went through the binding table.
    /// The back key dispatches directly and carries no gesture.
    pub gesture: Option<Gesture>,
    pub action: Action,
    pub result: Result<(), ExecutionError>,
}

/// Feed the concurrent pointer count of a raw touch event into the
/// double-finger debounce buffer.
pub fn handle_touch_event(state: &LauncherState, pointer_count: u32) {
    state.pointer_debounce.lock().unwrap().observe(pointer_count);
}

/// Classify a completed fling trace and dispatch the bound action.
/// Returns `None` when the trace does not amount to a gesture.
pub fn handle_fling(
    state: &LauncherState,
    host: &dyn HostDispatch,
    start: Point,
    end: Point,
    width: f32,
    height: f32,
) -> Option<Dispatch> {
    let settings = state.config_snapshot().classify_settings();
    let pointer_count = state.pointer_debounce.lock().unwrap().current();
    let gesture = classify(start, end, pointer_count, settings, width, height)?;
    Some(dispatch_gesture(state, host, gesture))
}

/// Dispatch an already-classified tap gesture from the host's tap-timing
/// detector. Taps take no double-finger or edge promotion.
pub fn handle_tap(
    state: &LauncherState,
    host: &dyn HostDispatch,
    base: BaseGesture,
) -> Dispatch {
    dispatch_gesture(state, host, Gesture::new(base))
}

/// Dispatch a hardware key press. Volume keys go through the binding
/// table; the back key always opens the picker.
pub fn handle_key(state: &LauncherState, host: &dyn HostDispatch, key: HardwareKey) -> Dispatch {
    match key {
        HardwareKey::Back => {
            let action = Action::OpenPicker(PickerIntention::View);
            let result = execute(&action, host);
            Dispatch { gesture: None, action, result }
        }
        HardwareKey::VolumeUp => dispatch_gesture(state, host, Gesture::new(BaseGesture::VolumeUp)),
        HardwareKey::VolumeDown => {
            dispatch_gesture(state, host, Gesture::new(BaseGesture::VolumeDown))
        }
    }
}

/// Resolve a gesture through the binding store and execute the result.
/// Failures are reported, never propagated as panics; a stale `LaunchApp`
/// binding stays in place for the user to rebind.
pub fn dispatch_gesture(
    state: &LauncherState,
    host: &dyn HostDispatch,
    gesture: Gesture,
) -> Dispatch {
    let action = {
        let store = state.bindings.lock().unwrap();
        resolve(gesture, store.as_ref())
    };
    let result = execute(&action, host);
    match &result {
        Ok(()) => info!("{gesture} -> {}", action.encode()),
        Err(ExecutionError::AppNotFound { package }) => {
            warn!("{gesture} is bound to {package}, which is no longer installed");
        }
        Err(err) => warn!("{gesture} failed: {err}"),
    }
    Dispatch { gesture: Some(gesture), action, result }
}

/// Complete a `Pick` picker flow: bind the chosen app to the gesture being
/// configured. Re-enters the binding-write path, not the executor.
pub fn choose_app_for_gesture(state: &LauncherState, gesture: Gesture, app: &AppEntry) {
    let action = Action::LaunchApp { package: app.package.clone(), user: app.user };
    let mut store = state.bindings.lock().unwrap();
    bindings::bind(store.as_mut(), gesture, &action);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::test_host::RecordingHost;
    use crate::models::SystemIntentKind;

    const WIDTH: f32 = 1080.0;
    const HEIGHT: f32 = 2340.0;

    fn state_with_bindings(entries: &[(&str, &str)]) -> LauncherState {
        let state = LauncherState::in_memory();
        {
            let mut store = state.bindings.lock().unwrap();
            for (key, value) in entries {
                store.set(key, value);
            }
        }
        state
    }

    #[test]
    fn fling_dispatches_bound_app() {
        let state = state_with_bindings(&[("swipe_up", "app:com.example.phone")]);
        let host = RecordingHost {
            installed: vec!["com.example.phone".into()],
            ..Default::default()
        };
        let dispatch = handle_fling(
            &state,
            &host,
            Point::new(540.0, 2000.0),
            Point::new(540.0, 1000.0),
            WIDTH,
            HEIGHT,
        )
        .expect("swipe up should classify");
        assert_eq!(dispatch.gesture, Some(Gesture::new(BaseGesture::SwipeUp)));
        assert_eq!(dispatch.result, Ok(()));
        assert_eq!(host.calls.borrow().as_slice(), ["launch:com.example.phone:None"]);
    }

    #[test]
    fn short_fling_is_no_gesture() {
        let state = LauncherState::in_memory();
        let host = RecordingHost::default();
        let dispatch = handle_fling(
            &state,
            &host,
            Point::new(540.0, 1200.0),
            Point::new(540.0, 1100.0),
            WIDTH,
            HEIGHT,
        );
        assert_eq!(dispatch, None);
        assert!(host.calls.borrow().is_empty());
    }

    #[test]
    fn unbound_swipe_up_is_silent_success() {
        let state = LauncherState::in_memory();
        let host = RecordingHost::default();
        let dispatch = handle_fling(
            &state,
            &host,
            Point::new(540.0, 2000.0),
            Point::new(540.0, 1000.0),
            WIDTH,
            HEIGHT,
        )
        .expect("swipe up should classify");
        assert_eq!(dispatch.action, Action::Unbound);
        assert_eq!(dispatch.result, Ok(()));
        assert!(host.calls.borrow().is_empty(), "Unbound issues no host call");
    }

    #[test]
    fn stale_binding_surfaces_app_not_found_and_stays() {
        let state = state_with_bindings(&[("double_tap", "app:com.example.gone")]);
        let host = RecordingHost::default();
        let dispatch = handle_tap(&state, &host, BaseGesture::DoubleTap);
        assert_eq!(
            dispatch.result,
            Err(ExecutionError::AppNotFound { package: "com.example.gone".into() })
        );
        // Binding is left unmodified until the user rebinds.
        let store = state.bindings.lock().unwrap();
        assert_eq!(store.get("double_tap").as_deref(), Some("app:com.example.gone"));
    }

    #[test]
    fn double_finger_fling_uses_buffered_count() {
        let state = state_with_bindings(&[("swipe_up.double", "intent:lock_screen")]);
        state.config.lock().unwrap().double_actions_enabled = true;
        let host = RecordingHost::default();

        handle_touch_event(&state, 2);
        let dispatch = handle_fling(
            &state,
            &host,
            Point::new(540.0, 2000.0),
            Point::new(540.0, 1000.0),
            WIDTH,
            HEIGHT,
        )
        .expect("swipe should classify");
        assert_eq!(
            dispatch.gesture,
            Some(Gesture::new(BaseGesture::SwipeUp).double_variant())
        );
        assert_eq!(
            dispatch.action,
            Action::SystemIntent(SystemIntentKind::LockScreen)
        );
    }

    #[test]
    fn back_key_opens_picker_without_gesture() {
        let state = LauncherState::in_memory();
        let host = RecordingHost::default();
        let dispatch = handle_key(&state, &host, HardwareKey::Back);
        assert_eq!(dispatch.gesture, None);
        assert_eq!(dispatch.action, Action::OpenPicker(PickerIntention::View));
        assert_eq!(host.calls.borrow().as_slice(), ["picker:View"]);
    }

    #[test]
    fn volume_keys_resolve_through_bindings() {
        let state = state_with_bindings(&[("volume_up", "intent:set_wallpaper")]);
        let host = RecordingHost::default();

        let up = handle_key(&state, &host, HardwareKey::VolumeUp);
        assert_eq!(up.action, Action::SystemIntent(SystemIntentKind::SetWallpaper));

        // Volume down has no binding and defaults to a no-op.
        let down = handle_key(&state, &host, HardwareKey::VolumeDown);
        assert_eq!(down.action, Action::Unbound);
        assert_eq!(down.result, Ok(()));
    }

    #[test]
    fn pick_flow_writes_binding() {
        let state = LauncherState::in_memory();
        let gesture = Gesture::new(BaseGesture::SwipeLeft).double_variant();
        let app = AppEntry {
            label: "Phone".into(),
            package: "com.example.phone".into(),
            user: Some(10),
            icon: None,
            system_app: false,
        };
        choose_app_for_gesture(&state, gesture, &app);

        let store = state.bindings.lock().unwrap();
        assert_eq!(
            store.get("swipe_left.double").as_deref(),
            Some("app:com.example.phone:10")
        );
    }
}
