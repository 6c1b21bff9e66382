//! Renderer-independent side of a wireframe backdrop: which shape, how the
//! camera sees it, how it spins and which lifecycle state it is in.

use glam::{EulerRot, Mat4, Vec3};

use crate::resources::{self, WireMesh};
use crate::uniforms::WireframeUniform;

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;
pub const CAMERA_DISTANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Pyramid,
    Octahedron,
    Torus,
    Icosahedron,
    Dodecahedron,
    Sphere,
}

impl GeometryKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pyramid" => Some(Self::Pyramid),
            "octahedron" => Some(Self::Octahedron),
            "torus" => Some(Self::Torus),
            "icosahedron" => Some(Self::Icosahedron),
            "dodecahedron" => Some(Self::Dodecahedron),
            "sphere" => Some(Self::Sphere),
            _ => None,
        }
    }

    /// Like [`GeometryKind::parse`], but unknown names fall back to the pyramid.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::warn!("wireframe: unknown geometry `{}`, using pyramid", name);
            Self::Pyramid
        })
    }

    pub fn mesh(self) -> WireMesh {
        match self {
            Self::Pyramid => resources::tetrahedron(2.5),
            Self::Octahedron => resources::octahedron(2.0),
            Self::Torus => resources::torus(2.0, 0.6, 16, 100),
            Self::Icosahedron => resources::icosahedron(2.0),
            Self::Dodecahedron => resources::dodecahedron(2.0),
            Self::Sphere => resources::sphere(2.0, 32),
        }
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Backing-store size for a canvas laid out at `css_width` x `css_height`,
/// with the device pixel ratio capped at `max_ratio`. Never zero.
pub fn drawing_buffer_size(css_width: f64, css_height: f64, pixel_ratio: f64, max_ratio: f64) -> (u32, u32) {
    let ratio = pixel_ratio.clamp(1.0, max_ratio.max(1.0));
    let scale = |css: f64| ((css * ratio).round() as u32).max(1);
    (scale(css_width), scale(css_height))
}

/// One spinning shape seen by a fixed perspective camera.
#[derive(Debug, Clone)]
pub struct WireframeScene {
    kind: GeometryKind,
    aspect: f32,
    rotation: Vec3,
    spin: (f32, f32),
}

impl WireframeScene {
    pub fn new(kind: GeometryKind, width: u32, height: u32, spin: (f32, f32)) -> Self {
        let mut scene = Self {
            kind,
            aspect: 1.0,
            rotation: Vec3::ZERO,
            spin,
        };
        scene.set_viewport(width, height);
        scene
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Zero-sized viewports keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Advances the rotation by one frame.
    pub fn step(&mut self) {
        self.rotation.x += self.spin.0;
        self.rotation.y += self.spin.1;
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), self.aspect, Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn uniform(&self, color: [f32; 3], opacity: f32) -> WireframeUniform {
        WireframeUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            model: self.model().to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Paused,
    Disposed,
}

/// Side effect the owner must carry out after a lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartLoop,
    StopLoop,
    Release,
    Stay,
}

impl Lifecycle {
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    pub fn on_visibility(self, visible: bool) -> (Self, Transition) {
        match (self, visible) {
            (Lifecycle::Paused, true) => (Lifecycle::Running, Transition::StartLoop),
            (Lifecycle::Running, false) => (Lifecycle::Paused, Transition::StopLoop),
            (state, _) => (state, Transition::Stay),
        }
    }

    /// Terminal; a second dispose is a no-op.
    pub fn dispose(self) -> (Self, Transition) {
        match self {
            Lifecycle::Disposed => (Lifecycle::Disposed, Transition::Stay),
            _ => (Lifecycle::Disposed, Transition::Release),
        }
    }
}
