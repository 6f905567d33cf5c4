//! Entrada de frames en JSON por líneas, tal como los publica el puente del
//! sensor: un esqueleto por línea o una orden de reinicio.

use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::BufRead;

use crate::types::{JointType, Skeleton, SkeletonPoint};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawMessage {
    Skeleton {
        #[serde(default = "default_tracked")]
        tracked: bool,
        joints: BTreeMap<JointType, SkeletonPoint>,
    },
    Reset,
}

fn default_tracked() -> bool {
    true
}

/// Mensaje ya interpretado
#[derive(Debug, Clone, PartialEq)]
pub enum FrameMessage {
    Skeleton(Skeleton),
    /// Usuario no seguido en este frame
    Untracked,
    Reset,
}

pub fn parse_line(line: &str) -> Result<FrameMessage, serde_json::Error> {
    let raw: RawMessage = serde_json::from_str(line)?;
    Ok(match raw {
        RawMessage::Skeleton { tracked: false, .. } => FrameMessage::Untracked,
        RawMessage::Skeleton { joints, .. } => {
            let mut skeleton = Skeleton::new();
            for (joint, point) in joints {
                skeleton.set(joint, point);
            }
            FrameMessage::Skeleton(skeleton)
        }
        RawMessage::Reset => FrameMessage::Reset,
    })
}

/// Iterador de mensajes sobre un lector de líneas. Las líneas vacías se
/// saltan y las inválidas se registran y se descartan.
pub struct FrameReader<R> {
    input: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = std::io::Result<FrameMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_no += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok(msg) => return Some(Ok(msg)),
                Err(e) => warn!("Línea {} descartada: {}", self.line_no, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_skeleton_line() {
        let msg = parse_line(
            r#"{"type":"skeleton","joints":{"head":[0.1,0.6,2.0],"shoulder_center":[0.1,0.4,2.0]}}"#,
        )
        .unwrap();
        let skel = match msg {
            FrameMessage::Skeleton(skel) => skel,
            other => panic!("esperaba esqueleto, llegó {:?}", other),
        };
        assert_eq!(
            skel.joint(JointType::ShoulderCenter),
            Some(SkeletonPoint::new(0.1, 0.4, 2.0))
        );
        assert_eq!(skel.tracked_joints(), 2);
    }

    #[test]
    fn untracked_and_reset_messages() {
        assert_eq!(
            parse_line(r#"{"type":"skeleton","tracked":false,"joints":{}}"#).unwrap(),
            FrameMessage::Untracked
        );
        assert_eq!(parse_line(r#"{"type":"reset"}"#).unwrap(), FrameMessage::Reset);
    }

    #[test]
    fn reader_skips_blank_and_malformed_lines() {
        let input = "\n{\"type\":\"reset\"}\nbasura\n{\"type\":\"skeleton\",\"joints\":{\"wing\":[0,0,0]}}\n{\"type\":\"reset\"}\n";
        let messages: Vec<FrameMessage> = FrameReader::new(Cursor::new(input))
            .collect::<std::io::Result<_>>()
            .unwrap();
        assert_eq!(messages, vec![FrameMessage::Reset, FrameMessage::Reset]);
    }
}
