use log::{debug, info};

use crate::config::{ConfigError, EngineConfig};
use crate::segments::{GesturePartResult, SegmentKind, ShoulderRefs, Thresholds};
use crate::types::Skeleton;

/// Resultado completo de procesar un frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub result: GesturePartResult,
    /// true si este frame cerró la ventana de frames sin coincidencia
    pub window_closed: bool,
}

/// Motor de reconocimiento: segmentos ordenados + ventana de frames sin
/// coincidencia + referencias del hombro.
pub struct Gesture {
    segments: Vec<SegmentKind>,
    thresholds: Thresholds,
    window_size: usize,
    frame_count: usize,
    refs: ShoulderRefs,

    /// Callback "gesto reconocido": se ejecuta en cada frame que agota los
    /// segmentos sin coincidencia
    callback: Option<Box<dyn FnMut() + Send>>,
}

impl Gesture {
    /// Crea un motor validando la configuración una sola vez
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            segments: config.pipeline.clone(),
            thresholds: Thresholds {
                shoulder: config.shoulder_threshold,
                step: config.step_threshold,
                legacy_left_hand_head_x: config.legacy_left_hand_head_x,
            },
            window_size: config.window_size,
            frame_count: 0,
            refs: ShoulderRefs::default(),
            callback: None,
        })
    }

    /// Establece el callback de "gesto reconocido". Solo hay un consumidor:
    /// un segundo registro reemplaza al anterior.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Procesa un frame y devuelve el gesto reconocido (o `None`)
    pub fn update(&mut self, skeleton: &Skeleton) -> GesturePartResult {
        self.process(skeleton).result
    }

    /// Igual que `update` pero indicando también si se cerró la ventana
    pub fn process(&mut self, skeleton: &Skeleton) -> FrameReport {
        for segment in &self.segments {
            let result = segment.evaluate(skeleton, &mut self.refs, &self.thresholds);
            if !result.is_none() {
                self.frame_count = 0;
                if result == GesturePartResult::StartHandsUp {
                    info!(
                        "Pose de inicio: hombro en ({:.3}, {:.3})",
                        self.refs.initial.x, self.refs.initial.y
                    );
                } else {
                    debug!("Gesto {} (segmento {:?})", result.as_str(), segment);
                }
                return FrameReport {
                    result,
                    window_closed: false,
                };
            }
        }

        // Ningún segmento coincidió en este frame
        if let Some(ref mut callback) = self.callback {
            callback();
        }

        self.frame_count += 1;
        let window_closed = self.frame_count >= self.window_size;
        if window_closed {
            debug!("Ventana de {} frames sin gesto cerrada", self.window_size);
            self.frame_count = 0;
        }

        FrameReport {
            result: GesturePartResult::None,
            window_closed,
        }
    }

    /// Descarta todo el estado acumulado (referencias y contador)
    pub fn reset(&mut self) {
        info!("Reinicio del motor de gestos");
        self.refs.clear();
        self.frame_count = 0;
    }

    pub fn shoulder_refs(&self) -> &ShoulderRefs {
        &self.refs
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn segments(&self) -> &[SegmentKind] {
        &self.segments
    }
}
