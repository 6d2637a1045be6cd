//! Platform-specific key normalization.
//!
//! Contains:
//! - The raw key identifier shared by the host and the embedded page
//! - The Control/Meta modifier table for swapping and non-swapping platforms
//! - `normalize`, the single function both sides use to turn a raw key into a token

use evidence_panel_config::KeyToken;
use winit::keyboard::{Key, NamedKey};

/// Host platform capabilities relevant to key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    /// True where the toolkit reports the Command key as Control and
    /// the Control key as Meta.
    pub apple_style: bool,
}

impl Platform {
    pub const APPLE: Platform = Platform { apple_style: true };
    pub const PORTABLE: Platform = Platform { apple_style: false };

    /// The platform this binary was built for.
    pub fn current() -> Self {
        Platform {
            apple_style: cfg!(target_os = "macos"),
        }
    }

    fn modifier_table(self) -> &'static ModifierTable {
        if self.apple_style {
            &SWAPPED_MODIFIERS
        } else {
            &PORTABLE_MODIFIERS
        }
    }
}

/// Where the two swappable modifiers land on a given platform.
struct ModifierTable {
    control: KeyToken,
    meta: KeyToken,
}

const SWAPPED_MODIFIERS: ModifierTable = ModifierTable {
    control: KeyToken::Meta,
    meta: KeyToken::Control,
};

// Both collapse to one token so a recorded chord works on any machine
const PORTABLE_MODIFIERS: ModifierTable = ModifierTable {
    control: KeyToken::ControlMeta,
    meta: KeyToken::ControlMeta,
};

/// A key as reported by the input source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKey {
    /// The key the toolkit reports as Control
    Control,
    /// The key the toolkit reports as Meta / Command / Super
    Meta,
    Shift,
    Alt,
    /// A key that produced text
    Text(String),
    /// Anything else (function keys, arrows, dead keys, ...)
    Other,
}

impl RawKey {
    /// Build from a winit logical key (host side).
    pub fn from_winit(key: &Key) -> Self {
        match key {
            Key::Named(NamedKey::Control) => RawKey::Control,
            Key::Named(NamedKey::Super | NamedKey::Meta) => RawKey::Meta,
            Key::Named(NamedKey::Shift) => RawKey::Shift,
            Key::Named(NamedKey::Alt | NamedKey::AltGraph) => RawKey::Alt,
            Key::Character(text) => RawKey::Text(text.to_string()),
            _ => RawKey::Other,
        }
    }

    /// Build from a DOM `KeyboardEvent.key` value (embedded page side).
    ///
    /// Named keys such as `"Enter"` or `"ArrowUp"` are longer than one
    /// character and map to `Other`.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Control" => RawKey::Control,
            "Meta" | "OS" | "Super" => RawKey::Meta,
            "Shift" => RawKey::Shift,
            "Alt" | "AltGraph" => RawKey::Alt,
            _ if key.chars().count() == 1 => RawKey::Text(key.to_string()),
            _ => RawKey::Other,
        }
    }
}

/// Map a raw key to its canonical token, or `None` if it has no printable form.
pub fn normalize(key: &RawKey, platform: Platform) -> Option<KeyToken> {
    let table = platform.modifier_table();
    match key {
        RawKey::Control => Some(table.control),
        RawKey::Meta => Some(table.meta),
        RawKey::Shift => Some(KeyToken::Shift),
        RawKey::Alt => Some(KeyToken::Alt),
        RawKey::Text(text) => text.chars().next().and_then(KeyToken::literal),
        RawKey::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swapping_platform_swaps_control_and_meta() {
        assert_eq!(
            normalize(&RawKey::Control, Platform::APPLE),
            Some(KeyToken::Meta)
        );
        assert_eq!(
            normalize(&RawKey::Meta, Platform::APPLE),
            Some(KeyToken::Control)
        );
    }

    #[test]
    fn test_portable_platform_collapses_control_and_meta() {
        assert_eq!(
            normalize(&RawKey::Control, Platform::PORTABLE),
            Some(KeyToken::ControlMeta)
        );
        assert_eq!(
            normalize(&RawKey::Meta, Platform::PORTABLE),
            Some(KeyToken::ControlMeta)
        );
    }

    #[test]
    fn test_shift_alt_unconditional() {
        for platform in [Platform::APPLE, Platform::PORTABLE] {
            assert_eq!(normalize(&RawKey::Shift, platform), Some(KeyToken::Shift));
            assert_eq!(normalize(&RawKey::Alt, platform), Some(KeyToken::Alt));
        }
    }

    #[test]
    fn test_text_is_uppercased() {
        let key = RawKey::Text("q".to_string());
        assert_eq!(normalize(&key, Platform::PORTABLE), Some(KeyToken::Char('Q')));
        let key = RawKey::Text("5".to_string());
        assert_eq!(normalize(&key, Platform::PORTABLE), Some(KeyToken::Char('5')));
    }

    #[test]
    fn test_unprintable_is_none() {
        for key in [
            RawKey::Other,
            RawKey::Text(String::new()),
            RawKey::Text(" ".to_string()),
            RawKey::Text("\u{7f}".to_string()),
        ] {
            assert_eq!(normalize(&key, Platform::PORTABLE), None, "{key:?}");
        }
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let key = RawKey::Control;
        let first = normalize(&key, Platform::APPLE);
        for _ in 0..10 {
            assert_eq!(normalize(&key, Platform::APPLE), first);
        }
    }

    #[test]
    fn test_dom_keys() {
        assert_eq!(RawKey::from_dom_key("Control"), RawKey::Control);
        assert_eq!(RawKey::from_dom_key("Meta"), RawKey::Meta);
        assert_eq!(RawKey::from_dom_key("a"), RawKey::Text("a".to_string()));
        assert_eq!(RawKey::from_dom_key("Enter"), RawKey::Other);
        assert_eq!(RawKey::from_dom_key("ArrowUp"), RawKey::Other);
    }

    #[test]
    fn test_winit_keys() {
        assert_eq!(
            RawKey::from_winit(&Key::Named(NamedKey::Super)),
            RawKey::Meta
        );
        assert_eq!(
            RawKey::from_winit(&Key::Named(NamedKey::Shift)),
            RawKey::Shift
        );
        assert_eq!(
            RawKey::from_winit(&Key::Character("x".into())),
            RawKey::Text("x".to_string())
        );
        assert_eq!(
            RawKey::from_winit(&Key::Named(NamedKey::Enter)),
            RawKey::Other
        );
    }
}
