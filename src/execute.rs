use log::info;
use thiserror::Error;

use crate::models::{Action, PickerIntention, SystemIntentKind};

/// Why an action could not be carried out. None of these are fatal: a
/// stale or misconfigured binding must never take the home screen down,
/// since it is the user's only way back into the device.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The bound package is no longer installed. The binding is left in
    /// place; the caller should offer to clear it.
    #[error("app {package} is not installed")]
    AppNotFound { package: String },
    /// The host has no component that can satisfy the system intent.
    /// Surfaced to the user as a transient notice.
    #[error("no handler for system intent {0}")]
    NoHandler(SystemIntentKind),
    /// The host failed to initiate the requested action.
    #[error("host dispatch failed: {0}")]
    HostDispatch(String),
}

/// Side-effect surface the executor delegates to. The host owns all actual
/// UI and process state; the executor issues at most one dispatch request
/// per call and does not block on completion beyond the returned result.
pub trait HostDispatch {
    fn launch_app(&self, package: &str, user: Option<u32>) -> Result<(), ExecutionError>;
    fn open_picker(&self, intention: PickerIntention) -> Result<(), ExecutionError>;
    fn dispatch_system_intent(&self, kind: SystemIntentKind) -> Result<(), ExecutionError>;
}

/// Perform a resolved action. `Unbound` is a successful no-op with no host
/// call issued.
pub fn execute(action: &Action, host: &dyn HostDispatch) -> Result<(), ExecutionError> {
    match action {
        Action::LaunchApp { package, user } => {
            info!("launching {package} (user {user:?})");
            host.launch_app(package, *user)
        }
        Action::OpenPicker(intention) => {
            info!("opening picker ({intention:?})");
            host.open_picker(*intention)
        }
        Action::SystemIntent(kind) => {
            info!("dispatching system intent {kind}");
            host.dispatch_system_intent(*kind)
        }
        Action::Unbound => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod test_host {
    use std::cell::RefCell;

    use super::*;

    /// Recording fake host: remembers every dispatch request and answers
    /// from a scripted set of installed packages and intent handlers.
    #[derive(Default)]
    pub struct RecordingHost {
        pub installed: Vec<String>,
        pub unhandled_intents: Vec<SystemIntentKind>,
        pub calls: RefCell<Vec<String>>,
    }

    impl HostDispatch for RecordingHost {
        fn launch_app(&self, package: &str, user: Option<u32>) -> Result<(), ExecutionError> {
            self.calls.borrow_mut().push(format!("launch:{package}:{user:?}"));
            if self.installed.iter().any(|p| p == package) {
                Ok(())
            } else {
                Err(ExecutionError::AppNotFound { package: package.to_string() })
            }
        }

        fn open_picker(&self, intention: PickerIntention) -> Result<(), ExecutionError> {
            self.calls.borrow_mut().push(format!("picker:{intention:?}"));
            Ok(())
        }

        fn dispatch_system_intent(&self, kind: SystemIntentKind) -> Result<(), ExecutionError> {
            self.calls.borrow_mut().push(format!("intent:{kind}"));
            if self.unhandled_intents.contains(&kind) {
                Err(ExecutionError::NoHandler(kind))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_host::RecordingHost;
    use super::*;

    #[test]
    fn unbound_is_a_silent_success() {
        let host = RecordingHost::default();
        assert_eq!(execute(&Action::Unbound, &host), Ok(()));
        assert!(host.calls.borrow().is_empty(), "no host dispatch for Unbound");
    }

    #[test]
    fn launch_missing_app_reports_not_found() {
        let host = RecordingHost {
            installed: vec!["com.example.phone".into()],
            ..Default::default()
        };
        let action = Action::LaunchApp { package: "com.example.gone".into(), user: None };
        assert_eq!(
            execute(&action, &host),
            Err(ExecutionError::AppNotFound { package: "com.example.gone".into() })
        );
    }

    #[test]
    fn launch_installed_app_succeeds() {
        let host = RecordingHost {
            installed: vec!["com.example.phone".into()],
            ..Default::default()
        };
        let action = Action::LaunchApp { package: "com.example.phone".into(), user: Some(10) };
        assert_eq!(execute(&action, &host), Ok(()));
        assert_eq!(host.calls.borrow().as_slice(), ["launch:com.example.phone:Some(10)"]);
    }

    #[test]
    fn unhandled_intent_is_recoverable() {
        let host = RecordingHost {
            unhandled_intents: vec![SystemIntentKind::AppMarket],
            ..Default::default()
        };
        assert_eq!(
            execute(&Action::SystemIntent(SystemIntentKind::AppMarket), &host),
            Err(ExecutionError::NoHandler(SystemIntentKind::AppMarket))
        );
        assert_eq!(
            execute(&Action::SystemIntent(SystemIntentKind::SetWallpaper), &host),
            Ok(())
        );
    }

    #[test]
    fn exactly_one_dispatch_per_call() {
        let host = RecordingHost::default();
        execute(&Action::OpenPicker(PickerIntention::Pick), &host).unwrap();
        execute(&Action::SystemIntent(SystemIntentKind::LockScreen), &host).unwrap();
        assert_eq!(host.calls.borrow().len(), 2);
    }
}
