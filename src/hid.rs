use std::time::Duration;
use uinput::device::Device;
use uinput::event::keyboard;

use crate::config::KeysConfig;
use crate::segments::GesturePartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Start,
    StepRight,
    StepLeft,
}

impl GestureAction {
    /// Conversión resultado del motor → acción de teclado
    pub fn from_result(result: GesturePartResult) -> Option<Self> {
        match result {
            GesturePartResult::StartHandsUp => Some(GestureAction::Start),
            GesturePartResult::MoveToRight | GesturePartResult::GoToRight => {
                Some(GestureAction::StepRight)
            }
            GesturePartResult::MoveToLeft | GesturePartResult::GoToLeft => {
                Some(GestureAction::StepLeft)
            }
            _ => None,
        }
    }

    /// Texto que muestra la interfaz
    pub fn label(self) -> &'static str {
        match self {
            GestureAction::Start => "Empezar",
            GestureAction::StepRight => "Mover Derecha",
            GestureAction::StepLeft => "Mover Izquierda",
        }
    }
}

pub struct HidOutput {
    dev: Device,
    repeat: u32,
    hold: Duration,
}

impl HidOutput {
    pub fn new(keys: &KeysConfig) -> Result<Self, uinput::Error> {
        let dev = uinput::default()?
            .name("kinemando-hid")?
            .event(uinput::event::Keyboard::All)?
            .create()?;

        Ok(HidOutput {
            dev,
            repeat: keys.repeat,
            hold: Duration::from_millis(keys.hold_ms),
        })
    }

    fn sync(&mut self) -> Result<(), uinput::Error> {
        self.dev.synchronize()
    }

    fn key_tap(&mut self, key: keyboard::Key) -> Result<(), uinput::Error> {
        self.dev.press(&keyboard::Keyboard::Key(key))?;
        self.sync()?;
        std::thread::sleep(self.hold);
        self.dev.release(&keyboard::Keyboard::Key(key))?;
        self.sync()
    }

    /// Ctrl mantenido + `repeat` pulsaciones de `key`
    fn ctrl_repeat(&mut self, key: keyboard::Key) -> Result<(), uinput::Error> {
        self.dev
            .press(&keyboard::Keyboard::Key(keyboard::Key::LeftControl))?;
        self.sync()?;
        std::thread::sleep(self.hold);
        for _ in 0..self.repeat {
            self.key_tap(key)?;
        }
        self.dev
            .release(&keyboard::Keyboard::Key(keyboard::Key::LeftControl))?;
        self.sync()
    }

    pub fn send(&mut self, action: GestureAction) -> Result<(), uinput::Error> {
        match action {
            GestureAction::Start => self.key_tap(keyboard::Key::Enter),
            GestureAction::StepRight => self.ctrl_repeat(keyboard::Key::Right),
            GestureAction::StepLeft => self.ctrl_repeat(keyboard::Key::Left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_start_and_steps() {
        assert_eq!(
            GestureAction::from_result(GesturePartResult::StartHandsUp),
            Some(GestureAction::Start)
        );
        assert_eq!(
            GestureAction::from_result(GesturePartResult::MoveToRight),
            Some(GestureAction::StepRight)
        );
        assert_eq!(
            GestureAction::from_result(GesturePartResult::GoToLeft),
            Some(GestureAction::StepLeft)
        );
    }

    #[test]
    fn hand_gestures_and_none_have_no_action() {
        for result in [
            GesturePartResult::MoveLeftHand,
            GesturePartResult::MoveRightHand,
            GesturePartResult::None,
        ] {
            assert_eq!(GestureAction::from_result(result), None);
        }
    }

    #[test]
    fn labels_match_ui_text() {
        assert_eq!(GestureAction::Start.label(), "Empezar");
        assert_eq!(GestureAction::StepLeft.label(), "Mover Izquierda");
    }
}
