use serde::Deserialize;

use crate::diagnostics::{DiagnosticSink, Severity};

/// A pixel reconstruction filter as named in an options file (§6); resolved
/// to a concrete [`reyes_filter::FilterKernel`] by [`crate::renderer::Renderer`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PixelFilter {
    Box { width: (f32, f32) },
    Disc { width: (f32, f32) },
    Gaussian { width: (f32, f32) },
    Sinc { width: (f32, f32) },
}

impl Default for PixelFilter {
    fn default() -> Self {
        PixelFilter::Gaussian { width: (2.0, 2.0) }
    }
}

/// Render-wide configuration (§6). Deserialized from TOML with every field
/// defaulted, then clamped into range by [`Options::sanitize`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    pub resolution: (u32, u32),
    pub bucket_size: (u32, u32),
    pub super_samp: (u32, u32),
    pub pixel_filter: PixelFilter,
    pub do_filter: bool,
    pub clip_near: f32,
    pub clip_far: f32,
    pub shutter_min: f32,
    pub shutter_max: f32,
    pub fstop: f32,
    pub focal_length: f32,
    pub focal_distance: f32,
    pub eye_splits: u32,
    pub grid_size: u32,
    pub interleave_width: u32,
    pub statistics_verbosity: u32,
    pub num_threads: i32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            resolution: (640, 480),
            bucket_size: (16, 16),
            super_samp: (2, 2),
            pixel_filter: PixelFilter::default(),
            do_filter: true,
            clip_near: f32::EPSILON,
            clip_far: f32::INFINITY,
            shutter_min: 0.0,
            shutter_max: 0.0,
            fstop: f32::INFINITY,
            focal_length: f32::INFINITY,
            focal_distance: f32::INFINITY,
            eye_splits: 20,
            grid_size: 16,
            interleave_width: 6,
            statistics_verbosity: 0,
            num_threads: -1,
        }
    }
}

impl Options {
    pub fn load(path: &std::path::Path) -> Result<Self, crate::error::RenderError> {
        let content = std::fs::read_to_string(path).map_err(|source| crate::error::RenderError::OptionsIo {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| crate::error::RenderError::OptionsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamp every field to its valid range, reporting a warning through
    /// `sink` for each value actually changed (§6: "out-of-range values are
    /// clamped with a warning").
    pub fn sanitize(&mut self, sink: &dyn DiagnosticSink) {
        clamp_pair(&mut self.resolution, (1, 1), sink, "resolution");
        clamp_pair(&mut self.bucket_size, (1, 1), sink, "bucket_size");
        clamp_pair(&mut self.super_samp, (1, 1), sink, "super_samp");

        if self.clip_near < f32::EPSILON {
            warn(sink, "clip_near", self.clip_near, f32::EPSILON);
            self.clip_near = f32::EPSILON;
        }
        if self.clip_far < self.clip_near {
            warn(sink, "clip_far", self.clip_far, self.clip_near);
            self.clip_far = self.clip_near;
        }
        if self.shutter_max < self.shutter_min {
            warn(sink, "shutter_max", self.shutter_max, self.shutter_min);
            self.shutter_max = self.shutter_min;
        }
        if self.eye_splits < 1 {
            warn_u32(sink, "eye_splits", self.eye_splits, 1);
            self.eye_splits = 1;
        }
        if self.grid_size < 1 {
            warn_u32(sink, "grid_size", self.grid_size, 1);
            self.grid_size = 1;
        }
        if self.interleave_width < 1 {
            warn_u32(sink, "interleave_width", self.interleave_width, 1);
            self.interleave_width = 1;
        }
    }
}

fn clamp_pair(value: &mut (u32, u32), min: (u32, u32), sink: &dyn DiagnosticSink, name: &str) {
    if value.0 < min.0 || value.1 < min.1 {
        sink.report(
            Severity::Warning,
            &format!("{name} {value:?} below minimum {min:?}, clamped"),
        );
        value.0 = value.0.max(min.0);
        value.1 = value.1.max(min.1);
    }
}

fn warn(sink: &dyn DiagnosticSink, name: &str, value: f32, clamped: f32) {
    sink.report(Severity::Warning, &format!("{name} {value} out of range, clamped to {clamped}"));
}

fn warn_u32(sink: &dyn DiagnosticSink, name: &str, value: u32, clamped: u32) {
    sink.report(Severity::Warning, &format!("{name} {value} out of range, clamped to {clamped}"));
}
