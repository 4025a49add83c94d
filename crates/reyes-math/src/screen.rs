use glam::{Mat4, Vec3};

use crate::Box2;

/// The camera's screen-space window, in the `[-1, 1]`-normalized convention
/// (before any aspect-ratio or crop-window scaling).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenWindow {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl ScreenWindow {
    pub fn square() -> Self {
        Self {
            left: -1.0,
            right: 1.0,
            bottom: -1.0,
            top: 1.0,
        }
    }

    pub fn as_box2(&self) -> Box2 {
        Box2 {
            min: glam::Vec2::new(self.left, self.bottom),
            max: glam::Vec2::new(self.right, self.top),
        }
    }
}

/// Composes the camera-to-raster transform from a camera-to-screen
/// projection and the output image resolution.
///
/// `cam_to_raster = cam_to_screen * scale(0.5, -0.5, 0) * translate(0.5, 0.5, 0) * scale(xres, yres, 1)`
///
/// The `y`-flip and half-pixel recentering account for screen space running
/// bottom-to-top in `[-1, 1]` while raster space runs top-to-bottom in
/// `[0, xres] x [0, yres]`.
pub fn cam_to_raster(cam_to_screen: Mat4, xres: u32, yres: u32) -> Mat4 {
    let to_raster = Mat4::from_scale(Vec3::new(xres as f32, yres as f32, 1.0))
        * Mat4::from_translation(Vec3::new(0.5, 0.5, 0.0))
        * Mat4::from_scale(Vec3::new(0.5, -0.5, 1.0));
    to_raster * cam_to_screen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cam_to_raster_maps_screen_center_to_image_center() {
        let m = cam_to_raster(Mat4::IDENTITY, 640, 480);
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p.x - 320.0).abs() < 1e-4);
        assert!((p.y - 240.0).abs() < 1e-4);
    }

    #[test]
    fn cam_to_raster_flips_y_so_screen_top_maps_to_raster_zero() {
        let m = cam_to_raster(Mat4::IDENTITY, 640, 480);
        let top = m.transform_point3(Vec3::new(0.0, 1.0, 0.0));
        let bottom = m.transform_point3(Vec3::new(0.0, -1.0, 0.0));
        assert!(top.y < bottom.y);
    }
}
