use std::fmt;

use serde::{Deserialize, Serialize};

/// Screen edge qualifying an edge gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    fn key_suffix(self) -> &'static str {
        match self {
            Edge::Top => "edge_top",
            Edge::Bottom => "edge_bottom",
            Edge::Left => "edge_left",
            Edge::Right => "edge_right",
        }
    }
}

/// The unmodified gesture shapes. Swipes come from the motion classifier,
/// taps and long-presses from the host's tap-timing detector, volume keys
/// from hardware key events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BaseGesture {
    TapSingle,
    DoubleTap,
    LongPress,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    VolumeUp,
    VolumeDown,
}

impl BaseGesture {
    pub const ALL: [BaseGesture; 9] = [
        BaseGesture::TapSingle,
        BaseGesture::DoubleTap,
        BaseGesture::LongPress,
        BaseGesture::SwipeUp,
        BaseGesture::SwipeDown,
        BaseGesture::SwipeLeft,
        BaseGesture::SwipeRight,
        BaseGesture::VolumeUp,
        BaseGesture::VolumeDown,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BaseGesture::TapSingle => "tap",
            BaseGesture::DoubleTap => "double_tap",
            BaseGesture::LongPress => "long_press",
            BaseGesture::SwipeUp => "swipe_up",
            BaseGesture::SwipeDown => "swipe_down",
            BaseGesture::SwipeLeft => "swipe_left",
            BaseGesture::SwipeRight => "swipe_right",
            BaseGesture::VolumeUp => "volume_up",
            BaseGesture::VolumeDown => "volume_down",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|base| base.key() == key)
    }

    /// Hardware keys carry no touch geometry, so they cannot take the
    /// double-finger or edge modifiers.
    pub fn supports_modifiers(self) -> bool {
        !matches!(self, BaseGesture::VolumeUp | BaseGesture::VolumeDown)
    }
}

/// Modifier axis of a gesture. Double-finger and edge qualification are
/// mutually exclusive per classification pass: edge promotion runs after
/// double-finger promotion and replaces it when both apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Modifier {
    Double,
    Edge(Edge),
}

/// A discrete, classified input event.
///
/// The taxonomy is a base shape plus an optional modifier rather than a flat
/// enumeration, so the addressable space stays finite and enumerable for a
/// settings surface (see [`Gesture::all`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Gesture {
    pub base: BaseGesture,
    pub modifier: Option<Modifier>,
}

impl Gesture {
    pub fn new(base: BaseGesture) -> Self {
        Self { base, modifier: None }
    }

    /// The same semantic gesture performed with two or more fingers.
    pub fn double_variant(self) -> Self {
        Self { modifier: Some(Modifier::Double), ..self }
    }

    /// The same gesture qualified by a screen edge. Replaces any previous
    /// modifier, including a double-finger one.
    pub fn edge_variant(self, edge: Edge) -> Self {
        Self { modifier: Some(Modifier::Edge(edge)), ..self }
    }

    /// Stable storage key. Must not change once shipped: persisted bindings
    /// are keyed by it.
    pub fn key(self) -> String {
        match self.modifier {
            None => self.base.key().to_string(),
            Some(Modifier::Double) => format!("{}.double", self.base.key()),
            Some(Modifier::Edge(edge)) => format!("{}.{}", self.base.key(), edge.key_suffix()),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (base_key, suffix) = match key.split_once('.') {
            Some((base, suffix)) => (base, Some(suffix)),
            None => (key, None),
        };
        let base = BaseGesture::from_key(base_key)?;
        let modifier = match suffix {
            None => None,
            Some("double") => Some(Modifier::Double),
            Some(other) => {
                let edge = Edge::ALL.into_iter().find(|e| e.key_suffix() == other)?;
                Some(Modifier::Edge(edge))
            }
        };
        if modifier.is_some() && !base.supports_modifiers() {
            return None;
        }
        Some(Self { base, modifier })
    }

    /// Every addressable gesture, in stable order. Used by settings
    /// surfaces to list all bindable slots.
    pub fn all() -> Vec<Gesture> {
        let mut gestures = Vec::new();
        for base in BaseGesture::ALL {
            gestures.push(Gesture::new(base));
            if base.supports_modifiers() {
                gestures.push(Gesture::new(base).double_variant());
                for edge in Edge::ALL {
                    gestures.push(Gesture::new(base).edge_variant(edge));
                }
            }
        }
        gestures
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Why the picker is being shown: browsing apps to launch one, or choosing
/// an app to bind to a gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerIntention {
    View,
    Pick,
}

/// Named system actions the host may be able to dispatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SystemIntentKind {
    OpenSettings,
    ExpandNotifications,
    SetWallpaper,
    AppMarket,
    LockScreen,
}

impl SystemIntentKind {
    pub const ALL: [SystemIntentKind; 5] = [
        SystemIntentKind::OpenSettings,
        SystemIntentKind::ExpandNotifications,
        SystemIntentKind::SetWallpaper,
        SystemIntentKind::AppMarket,
        SystemIntentKind::LockScreen,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SystemIntentKind::OpenSettings => "open_settings",
            SystemIntentKind::ExpandNotifications => "expand_notifications",
            SystemIntentKind::SetWallpaper => "set_wallpaper",
            SystemIntentKind::AppMarket => "app_market",
            SystemIntentKind::LockScreen => "lock_screen",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for SystemIntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What to do when a gesture fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    LaunchApp { package: String, user: Option<u32> },
    OpenPicker(PickerIntention),
    SystemIntent(SystemIntentKind),
    Unbound,
}

impl Action {
    /// String form stored in the binding store. Decoupled from the enum
    /// layout so persisted values survive reordering.
    pub fn encode(&self) -> String {
        match self {
            Action::LaunchApp { package, user: None } => format!("app:{package}"),
            Action::LaunchApp { package, user: Some(user) } => format!("app:{package}:{user}"),
            Action::OpenPicker(PickerIntention::View) => "picker:view".to_string(),
            Action::OpenPicker(PickerIntention::Pick) => "picker:pick".to_string(),
            Action::SystemIntent(kind) => format!("intent:{}", kind.key()),
            Action::Unbound => String::new(),
        }
    }

    /// Decode a stored action string. Unknown or malformed values yield
    /// `None`; callers treat that the same as an absent binding.
    pub fn decode(value: &str) -> Option<Action> {
        if value.is_empty() {
            return Some(Action::Unbound);
        }
        let (tag, rest) = value.split_once(':')?;
        match tag {
            "app" => {
                let (package, user) = match rest.rsplit_once(':') {
                    Some((package, user_str)) => match user_str.parse::<u32>() {
                        Ok(user) => (package, Some(user)),
                        // no numeric suffix: the whole rest is the package
                        Err(_) => (rest, None),
                    },
                    None => (rest, None),
                };
                if package.is_empty() {
                    return None;
                }
                Some(Action::LaunchApp { package: package.to_string(), user })
            }
            "picker" => match rest {
                "view" => Some(Action::OpenPicker(PickerIntention::View)),
                "pick" => Some(Action::OpenPicker(PickerIntention::Pick)),
                _ => None,
            },
            "intent" => SystemIntentKind::from_key(rest).map(Action::SystemIntent),
            _ => None,
        }
    }
}

/// One launchable target from the host's package enumeration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppEntry {
    pub label: String,
    pub package: String,
    /// User handle for multi-user / work-profile installs.
    pub user: Option<u32>,
    /// Opaque icon handle resolved by the UI layer.
    pub icon: Option<String>,
    pub system_app: bool,
}
