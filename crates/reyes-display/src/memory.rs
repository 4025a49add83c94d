use std::sync::Mutex;

use glam::IVec2;
use reyes_varspec::{Stdvar, VarSpec};

use crate::sink::DisplaySink;

enum Storage {
    /// `z` is never quantized.
    Float(Mutex<Vec<f32>>),
    Quantized(Mutex<Vec<u8>>),
}

/// An in-process reference sink: accumulates a whole image in memory,
/// useful for tests and embedders that don't need a file-backed display
/// driver.
pub struct InMemorySink {
    variable: VarSpec,
    width: u32,
    height: u32,
    storage: Storage,
}

fn quantize(x: f32) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

impl InMemorySink {
    pub fn new(variable: VarSpec, width: u32, height: u32) -> Self {
        let n = (width * height) as usize * variable.scalar_size();
        let storage = if variable == Stdvar::z() {
            Storage::Float(Mutex::new(vec![f32::INFINITY; n]))
        } else {
            Storage::Quantized(Mutex::new(vec![0u8; n]))
        };
        Self {
            variable,
            width,
            height,
            storage,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_float(&self) -> bool {
        matches!(self.storage, Storage::Float(_))
    }

    pub fn floats(&self) -> Vec<f32> {
        match &self.storage {
            Storage::Float(m) => m.lock().expect("sink poisoned").clone(),
            Storage::Quantized(m) => m
                .lock()
                .expect("sink poisoned")
                .iter()
                .map(|&b| b as f32 / 255.0)
                .collect(),
        }
    }
}

impl DisplaySink for InMemorySink {
    fn variable(&self) -> &VarSpec {
        &self.variable
    }

    fn write_tile(&self, tile_origin: IVec2, tile_size: IVec2, data: &[f32]) {
        let ncomp = self.variable.scalar_size();
        for ty in 0..tile_size.y {
            let py = tile_origin.y + ty;
            if py < 0 || py as u32 >= self.height {
                continue;
            }
            for tx in 0..tile_size.x {
                let px = tile_origin.x + tx;
                if px < 0 || px as u32 >= self.width {
                    continue;
                }
                let src = ((ty * tile_size.x + tx) as usize) * ncomp;
                let dst_pixel = (py as u32 * self.width + px as u32) as usize * ncomp;
                match &self.storage {
                    Storage::Float(m) => {
                        let mut buf = m.lock().expect("sink poisoned");
                        buf[dst_pixel..dst_pixel + ncomp].copy_from_slice(&data[src..src + ncomp]);
                    }
                    Storage::Quantized(m) => {
                        let mut buf = m.lock().expect("sink poisoned");
                        for c in 0..ncomp {
                            buf[dst_pixel + c] = quantize(data[src + c]);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_sink_stores_raw_floats_unquantized() {
        let sink = InMemorySink::new(Stdvar::z(), 2, 2);
        assert!(sink.is_float());
        sink.write_tile(IVec2::new(0, 0), IVec2::new(2, 2), &[1.5, 2.5, 3.5, 4.5]);
        assert_eq!(sink.floats(), vec![1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn color_sink_quantizes_to_u8_range() {
        let sink = InMemorySink::new(Stdvar::ci(), 1, 1);
        assert!(!sink.is_float());
        sink.write_tile(IVec2::new(0, 0), IVec2::new(1, 1), &[2.0, 0.5, -1.0]);
        let f = sink.floats();
        assert_eq!(f[0], 1.0);
        assert!((f[1] - 0.5).abs() < 0.01);
        assert_eq!(f[2], 0.0);
    }

    #[test]
    fn out_of_bounds_tile_pixels_are_clipped_not_written() {
        let sink = InMemorySink::new(Stdvar::z(), 1, 1);
        sink.write_tile(IVec2::new(-1, -1), IVec2::new(2, 2), &[9.0, 9.0, 9.0, 1.0]);
        assert_eq!(sink.floats(), vec![1.0]);
    }
}
