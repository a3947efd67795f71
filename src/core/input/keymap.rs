//=========================================================================
// Key Maps
//=========================================================================
//
// Backend identifiers → logical key/button identifiers.
//
// Every mapping is partial: identifiers without a logical counterpart
// (F13-F24, media keys, exotic mouse buttons, pad-specific buttons)
// return `None` and the normalizer discards the event.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::Button as GilrsButton;
use winit::event::MouseButton as WinitMouseButton;
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState};

//=== Internal Dependencies ===============================================

use super::event::{ControllerButton, KeyCode, Modifiers, MouseButton};

//=== Modifiers ===========================================================

/// Converts Winit ModifiersState to logical Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Super, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            logo: state.super_key(),
        }
    }
}

//=== Keyboard ============================================================

/// Maps a Winit physical key code to a logical key.
pub fn key_from_winit(code: WinitKeyCode) -> Option<KeyCode> {
    use WinitKeyCode as W;
    let key = match code {
        //--- Digits -------------------------------------------------------
        W::Digit0 => KeyCode::Digit0,
        W::Digit1 => KeyCode::Digit1,
        W::Digit2 => KeyCode::Digit2,
        W::Digit3 => KeyCode::Digit3,
        W::Digit4 => KeyCode::Digit4,
        W::Digit5 => KeyCode::Digit5,
        W::Digit6 => KeyCode::Digit6,
        W::Digit7 => KeyCode::Digit7,
        W::Digit8 => KeyCode::Digit8,
        W::Digit9 => KeyCode::Digit9,

        //--- Letters ------------------------------------------------------
        W::KeyA => KeyCode::KeyA,
        W::KeyB => KeyCode::KeyB,
        W::KeyC => KeyCode::KeyC,
        W::KeyD => KeyCode::KeyD,
        W::KeyE => KeyCode::KeyE,
        W::KeyF => KeyCode::KeyF,
        W::KeyG => KeyCode::KeyG,
        W::KeyH => KeyCode::KeyH,
        W::KeyI => KeyCode::KeyI,
        W::KeyJ => KeyCode::KeyJ,
        W::KeyK => KeyCode::KeyK,
        W::KeyL => KeyCode::KeyL,
        W::KeyM => KeyCode::KeyM,
        W::KeyN => KeyCode::KeyN,
        W::KeyO => KeyCode::KeyO,
        W::KeyP => KeyCode::KeyP,
        W::KeyQ => KeyCode::KeyQ,
        W::KeyR => KeyCode::KeyR,
        W::KeyS => KeyCode::KeyS,
        W::KeyT => KeyCode::KeyT,
        W::KeyU => KeyCode::KeyU,
        W::KeyV => KeyCode::KeyV,
        W::KeyW => KeyCode::KeyW,
        W::KeyX => KeyCode::KeyX,
        W::KeyY => KeyCode::KeyY,
        W::KeyZ => KeyCode::KeyZ,

        //--- Function -----------------------------------------------------
        W::F1 => KeyCode::F1,
        W::F2 => KeyCode::F2,
        W::F3 => KeyCode::F3,
        W::F4 => KeyCode::F4,
        W::F5 => KeyCode::F5,
        W::F6 => KeyCode::F6,
        W::F7 => KeyCode::F7,
        W::F8 => KeyCode::F8,
        W::F9 => KeyCode::F9,
        W::F10 => KeyCode::F10,
        W::F11 => KeyCode::F11,
        W::F12 => KeyCode::F12,

        //--- Navigation ---------------------------------------------------
        W::ArrowUp => KeyCode::ArrowUp,
        W::ArrowDown => KeyCode::ArrowDown,
        W::ArrowLeft => KeyCode::ArrowLeft,
        W::ArrowRight => KeyCode::ArrowRight,
        W::Insert => KeyCode::Insert,
        W::Home => KeyCode::Home,
        W::End => KeyCode::End,
        W::PageUp => KeyCode::PageUp,
        W::PageDown => KeyCode::PageDown,

        //--- Special ------------------------------------------------------
        W::Space => KeyCode::Space,
        W::Enter => KeyCode::Enter,
        W::Escape => KeyCode::Escape,
        W::Tab => KeyCode::Tab,
        W::Backspace => KeyCode::Backspace,
        W::Delete => KeyCode::Delete,
        W::CapsLock => KeyCode::CapsLock,

        //--- Modifier Keys ------------------------------------------------
        W::ShiftLeft => KeyCode::ShiftLeft,
        W::ShiftRight => KeyCode::ShiftRight,
        W::ControlLeft => KeyCode::ControlLeft,
        W::ControlRight => KeyCode::ControlRight,
        W::AltLeft => KeyCode::AltLeft,
        W::AltRight => KeyCode::AltRight,
        W::SuperLeft => KeyCode::SuperLeft,
        W::SuperRight => KeyCode::SuperRight,

        //--- Punctuation --------------------------------------------------
        W::Minus => KeyCode::Minus,
        W::Equal => KeyCode::Equal,
        W::BracketLeft => KeyCode::BracketLeft,
        W::BracketRight => KeyCode::BracketRight,
        W::Backslash => KeyCode::Backslash,
        W::Semicolon => KeyCode::Semicolon,
        W::Quote => KeyCode::Quote,
        W::Comma => KeyCode::Comma,
        W::Period => KeyCode::Period,
        W::Slash => KeyCode::Slash,
        W::Backquote => KeyCode::Backquote,

        //--- Numpad -------------------------------------------------------
        W::Numpad0 => KeyCode::Numpad0,
        W::Numpad1 => KeyCode::Numpad1,
        W::Numpad2 => KeyCode::Numpad2,
        W::Numpad3 => KeyCode::Numpad3,
        W::Numpad4 => KeyCode::Numpad4,
        W::Numpad5 => KeyCode::Numpad5,
        W::Numpad6 => KeyCode::Numpad6,
        W::Numpad7 => KeyCode::Numpad7,
        W::Numpad8 => KeyCode::Numpad8,
        W::Numpad9 => KeyCode::Numpad9,
        W::NumpadAdd => KeyCode::NumpadAdd,
        W::NumpadSubtract => KeyCode::NumpadSubtract,
        W::NumpadMultiply => KeyCode::NumpadMultiply,
        W::NumpadDivide => KeyCode::NumpadDivide,
        W::NumpadEnter => KeyCode::NumpadEnter,
        W::NumpadDecimal => KeyCode::NumpadDecimal,

        _ => return None,
    };
    Some(key)
}

//=== Mouse ===============================================================

/// Maps a Winit mouse button to a logical button.
pub fn mouse_button_from_winit(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Back => Some(MouseButton::Back),
        WinitMouseButton::Forward => Some(MouseButton::Forward),
        WinitMouseButton::Other(_) => None,
    }
}

//=== Controller ==========================================================

/// Maps a gilrs button to a logical controller button.
///
/// Gilrs names face buttons by compass position; the south button is
/// `A`. Analog triggers (`LeftTrigger2` / `RightTrigger2`) are reported
/// as axes by the gamepad pump and have no button here.
pub fn controller_button_from_gilrs(button: GilrsButton) -> Option<ControllerButton> {
    let mapped = match button {
        GilrsButton::South => ControllerButton::A,
        GilrsButton::East => ControllerButton::B,
        GilrsButton::West => ControllerButton::X,
        GilrsButton::North => ControllerButton::Y,
        GilrsButton::Select => ControllerButton::Back,
        GilrsButton::Mode => ControllerButton::Guide,
        GilrsButton::Start => ControllerButton::Start,
        GilrsButton::LeftThumb => ControllerButton::LeftStick,
        GilrsButton::RightThumb => ControllerButton::RightStick,
        GilrsButton::LeftTrigger => ControllerButton::LeftShoulder,
        GilrsButton::RightTrigger => ControllerButton::RightShoulder,
        GilrsButton::DPadUp => ControllerButton::DPadUp,
        GilrsButton::DPadDown => ControllerButton::DPadDown,
        GilrsButton::DPadLeft => ControllerButton::DPadLeft,
        GilrsButton::DPadRight => ControllerButton::DPadRight,
        _ => return None,
    };
    Some(mapped)
}

//=========================================================================
// Unit Tests
//=========================================================================
