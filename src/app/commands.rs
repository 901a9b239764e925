//! Inbound commands to the lighting service.
//!
//! The only command source is the push-button: a classified press maps to
//! at most one command.

use crate::config::LightingConfig;
use crate::inputs::button::PressClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// Switch dot correction between full and half current.
    ToggleHalfBrightness,

    /// Engage or release the motion lockout.
    ToggleLockout,
}

impl LightCommand {
    /// Command bound to a press class.  `NoPress` is bounce and maps to
    /// nothing; `Long` maps to nothing unless lockout is enabled.
    pub fn from_press(press: PressClass, config: &LightingConfig) -> Option<Self> {
        match press {
            PressClass::NoPress => None,
            PressClass::Short => Some(Self::ToggleHalfBrightness),
            PressClass::Long => config.long_press_locks_out.then_some(Self::ToggleLockout),
        }
    }
}
