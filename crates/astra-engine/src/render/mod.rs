// render/mod.rs
//
// Backend-neutral draw output. The engine never touches a real canvas;
// every frame it fills a DrawList the host walks in order, plus one
// off-screen pixel buffer the particle layer is rasterized into.

use glam::Vec2;

/// RGBA color, 0..255 per channel, stored as floats so fades can go
/// fractional before clamping at pack time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(255.0, 255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Pack to RGBA8, clamping each channel to 0..255.
    pub fn pack(&self) -> u32 {
        let c = |v: f32| v.clamp(0.0, 255.0) as u32;
        c(self.r) | c(self.g) << 8 | c(self.b) << 16 | c(self.a) << 24
    }
}

/// One drawing command. Commands are emitted back-to-front; the host
/// executes them in order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Clear the whole viewport.
    Clear,
    /// Draw one frame of a named sprite, centered on `pos`.
    Sprite {
        name: String,
        frame: u32,
        pos: Vec2,
        rotation: f32,
        scale: Vec2,
        alpha: f32,
    },
    /// Composite the particle pixel buffer over the viewport.
    ParticleLayer,
    /// Debug overlay: axis-aligned rectangle outline.
    DebugRect { center: Vec2, size: Vec2, color: Color },
    /// Debug overlay: circle outline.
    DebugCircle { center: Vec2, radius: f32, color: Color },
    /// Debug overlay: line segment.
    DebugLine { from: Vec2, to: Vec2, color: Color },
    /// HUD text (fps counter and the like).
    HudText { text: String, pos: Vec2 },
}

/// Ordered list of draw commands for one frame.
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter()
    }

    pub fn as_slice(&self) -> &[DrawCmd] {
        &self.cmds
    }
}

/// Off-screen RGBA8 surface. Cleared and refilled every frame by the
/// particle system, then composited with a single ParticleLayer command.
#[derive(Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        let pixels: &mut [u32] = bytemuck::cast_slice_mut(&mut self.data);
        pixels.fill(0);
    }

    /// Fill a square of `size` pixels whose top-left corner is at `pos`.
    /// Pixels falling outside the surface are dropped.
    pub fn fill_square(&mut self, pos: Vec2, size: f32, color: Color) {
        let packed = color.pack();
        let pixels: &mut [u32] = bytemuck::cast_slice_mut(&mut self.data);
        let x0 = pos.x.floor() as i64;
        let y0 = pos.y.floor() as i64;
        let side = size.max(1.0) as i64;
        for y in y0..y0 + side {
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for x in x0..x0 + side {
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                pixels[y as usize * self.width + x as usize] = packed;
            }
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        let pixels: &[u32] = bytemuck::cast_slice(&self.data);
        pixels[y * self.width + x]
    }
}
