use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{JointType, Skeleton, SkeletonPoint};

/// Hueco máximo entre frames grabados (~5 min a 30 fps)
pub const MAX_FRAME_GAP: usize = 10_000;

/// Carga una grabación de esqueletos desde un CSV en el formato
/// frame,joint,x,y,z ordenado por frame.
pub fn load_frames_from_csv(path: impl AsRef<Path>) -> Result<Vec<Skeleton>> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    parse_frames(reader).with_context(|| format!("CSV inválido {:?}", path))
}

/// Igual que `load_frames_from_csv` pero desde cualquier lector
pub fn load_frames_from_reader<R: std::io::Read>(input: R) -> Result<Vec<Skeleton>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    parse_frames(reader)
}

fn parse_frames<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Skeleton>> {
    let mut frames: BTreeMap<usize, Skeleton> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida", row))?;
        if record.len() < 5 {
            bail!("La fila {} no tiene 5 columnas", row);
        }

        let frame: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        let joint: JointType = record[1]
            .parse()
            .map_err(|e: String| anyhow!("{} (fila {})", e, row))?;

        let x: f32 = record[2]
            .parse()
            .with_context(|| format!("x inválido en fila {}", row))?;
        let y: f32 = record[3]
            .parse()
            .with_context(|| format!("y inválido en fila {}", row))?;
        let z: f32 = record[4]
            .parse()
            .with_context(|| format!("z inválido en fila {}", row))?;

        frames
            .entry(frame)
            .or_default()
            .set(joint, SkeletonPoint::new(x, y, z));
    }

    let Some(&max_frame) = frames.keys().next_back() else {
        bail!("El CSV no contiene datos");
    };
    let min_frame = frames.keys().next().copied().unwrap_or(0);
    ensure!(
        min_frame == 0,
        "El CSV debe iniciar en frame=0 (encontrado frame={})",
        min_frame
    );

    // Se comprueba antes de rellenar huecos para no reservar memoria sin límite
    let mut prev = 0usize;
    for &frame in frames.keys() {
        ensure!(
            frame - prev <= MAX_FRAME_GAP,
            "Hueco de {} frames entre frame={} y frame={} (máximo {})",
            frame - prev,
            prev,
            frame,
            MAX_FRAME_GAP
        );
        prev = frame;
    }

    // Los huecos son frames sin usuario seguido
    Ok((0..=max_frame)
        .map(|idx| frames.remove(&idx).unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = "\
frame,joint,x,y,z
0,shoulder_center,0.10,0.40,2.0
0,head,0.10,0.60,2.0
2,shoulder_center,-0.45,0.40,2.0
";

    #[test]
    fn groups_rows_by_frame_and_fills_gaps() {
        let frames = load_frames_from_reader(RECORDING.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].tracked_joints(), 2);
        assert!(frames[1].is_empty());
        assert_eq!(
            frames[2].joint(JointType::ShoulderCenter),
            Some(SkeletonPoint::new(-0.45, 0.40, 2.0))
        );
    }

    #[test]
    fn rejects_unknown_joint() {
        let err = load_frames_from_reader("frame,joint,x,y,z\n0,tail,0,0,0\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("tail"));
    }

    #[test]
    fn rejects_recording_not_starting_at_zero() {
        let csv = "frame,joint,x,y,z\n3,head,0,0.5,2\n";
        assert!(load_frames_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn rejects_huge_frame_gap() {
        let csv = "frame,joint,x,y,z\n0,head,0,0.5,2\n2000000000,head,0,0.5,2\n";
        let err = load_frames_from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Hueco"));
    }

    #[test]
    fn accepts_gap_at_the_limit() {
        let csv = format!(
            "frame,joint,x,y,z\n0,head,0,0.5,2\n{},head,0,0.5,2\n",
            MAX_FRAME_GAP
        );
        let frames = load_frames_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(frames.len(), MAX_FRAME_GAP + 1);
    }

    #[test]
    fn rejects_empty_recording() {
        assert!(load_frames_from_reader("frame,joint,x,y,z\n".as_bytes()).is_err());
    }
}
