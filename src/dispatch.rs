use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::debug;

use crate::hid::GestureAction;
use crate::segments::GesturePartResult;

/// Acciones en cola como máximo mientras el hilo HID está ocupado
pub const ACTION_QUEUE_CAPACITY: usize = 1;

/// Qué pasó con el resultado de un frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Resultado sin acción de teclado
    Idle,
    Sent(GestureAction),
    /// Cola llena: la acción se descarta
    Dropped(GestureAction),
    /// El hilo HID ya no escucha
    Disconnected(GestureAction),
}

/// Envía acciones al hilo HID sin bloquear el hilo de frames. Los pasos se
/// repiten en cada frame mientras se mantiene la pose, así que lo que no cabe
/// en la cola se descarta en vez de acumularse.
pub struct ActionDispatcher {
    tx: Sender<GestureAction>,
}

impl ActionDispatcher {
    /// Crea el despachador y el extremo receptor para el hilo HID
    pub fn channel() -> (Self, Receiver<GestureAction>) {
        let (tx, rx) = bounded(ACTION_QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    pub fn dispatch(&mut self, result: GesturePartResult) -> Dispatch {
        let Some(action) = GestureAction::from_result(result) else {
            return Dispatch::Idle;
        };

        match self.tx.try_send(action) {
            Ok(()) => Dispatch::Sent(action),
            Err(TrySendError::Full(_)) => {
                debug!("HID ocupado, se descarta {:?}", action);
                Dispatch::Dropped(action)
            }
            Err(TrySendError::Disconnected(_)) => Dispatch::Disconnected(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_without_action_are_idle() {
        let (mut dispatcher, rx) = ActionDispatcher::channel();
        assert_eq!(dispatcher.dispatch(GesturePartResult::None), Dispatch::Idle);
        assert_eq!(
            dispatcher.dispatch(GesturePartResult::MoveLeftHand),
            Dispatch::Idle
        );
        assert!(rx.is_empty());
    }

    #[test]
    fn held_step_does_not_pile_up_while_hid_is_busy() {
        let (mut dispatcher, rx) = ActionDispatcher::channel();

        // 60 frames (2 s a 30 fps) con el paso mantenido y el HID sin leer
        let outcomes: Vec<Dispatch> = (0..60)
            .map(|_| dispatcher.dispatch(GesturePartResult::MoveToLeft))
            .collect();

        assert_eq!(outcomes[0], Dispatch::Sent(GestureAction::StepLeft));
        assert!(outcomes[1..]
            .iter()
            .all(|d| *d == Dispatch::Dropped(GestureAction::StepLeft)));
        assert_eq!(rx.len(), ACTION_QUEUE_CAPACITY);

        // Al volver al centro no queda nada pendiente tras vaciar la cola
        assert_eq!(rx.try_recv(), Ok(GestureAction::StepLeft));
        assert_eq!(dispatcher.dispatch(GesturePartResult::None), Dispatch::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sends_again_once_hid_drains_the_queue() {
        let (mut dispatcher, rx) = ActionDispatcher::channel();
        assert_eq!(
            dispatcher.dispatch(GesturePartResult::StartHandsUp),
            Dispatch::Sent(GestureAction::Start)
        );
        assert_eq!(rx.try_recv(), Ok(GestureAction::Start));
        assert_eq!(
            dispatcher.dispatch(GesturePartResult::MoveToRight),
            Dispatch::Sent(GestureAction::StepRight)
        );
    }

    #[test]
    fn reports_disconnected_hid_thread() {
        let (mut dispatcher, rx) = ActionDispatcher::channel();
        drop(rx);
        assert_eq!(
            dispatcher.dispatch(GesturePartResult::MoveToRight),
            Dispatch::Disconnected(GestureAction::StepRight)
        );
    }
}
