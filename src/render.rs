use crate::arena::{Kind, WORLD};
use rphys_arena::{Body, Rgb, Scene, Vector};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, RenderTarget};
use sdl2::ttf::Font;
use sdl2::video::Window;

/// Size of the marker drawn on the side a player faces
const EYE_RADIUS: i16 = 4;

/// gfx primitives read the color channels in reverse order
fn to_abgr(color: Color) -> Color {
    Color::RGBA(color.a, color.b, color.g, color.r)
}

fn to_color(rgb: Rgb) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    Color::RGB(channel(rgb.r), channel(rgb.g), channel(rgb.b))
}

/// Maps world coordinates (y up) onto the window (y down).
pub struct View {
    scale: f64,
    height: f64,
}

impl View {
    pub fn new(window_width: u32, window_height: u32) -> View {
        let scale = (window_width as f64 / WORLD.x).min(window_height as f64 / WORLD.y);
        View {
            scale,
            height: window_height as f64,
        }
    }

    pub fn to_screen(&self, point: Vector) -> (i16, i16) {
        let x = point.x * self.scale;
        let y = self.height - point.y * self.scale;
        (x as i16, y as i16)
    }
}

fn draw_body<T: RenderTarget>(canvas: &mut Canvas<T>, view: &View, body: &Body<Kind>) {
    let (vx, vy): (Vec<i16>, Vec<i16>) = body.polygon().iter().map(|&p| view.to_screen(p)).unzip();
    let color = to_abgr(to_color(body.color()));
    let _ = canvas.filled_polygon(&vx, &vy, color);
}

/// Draws every sprite. Player sprites mark the side they face: frame 0 is
/// right, frame 1 is left.
pub fn draw_scene<T: RenderTarget>(canvas: &mut Canvas<T>, view: &View, scene: &Scene<Kind>) {
    for sprite in scene.sprites() {
        let Some(body) = scene.body(sprite.body) else {
            continue;
        };
        draw_body(canvas, view, body);
        if let Kind::Player(_) = body.info() {
            let facing = if sprite.frame == 1 { -1.0 } else { 1.0 };
            let eye = body.centroid() + Vector::new(1.5 * facing, 2.0);
            let (x, y) = view.to_screen(eye);
            let _ = canvas.filled_circle(x, y, EYE_RADIUS, to_abgr(Color::WHITE));
        }
    }
}

pub fn draw_score(canvas: &mut Canvas<Window>, font: &Font, score: [u32; 2]) -> Result<(), String> {
    let text = format!("{} : {}", score[0], score[1]);
    let surface = font
        .render(&text)
        .blended(Color::RGB(0, 0, 0))
        .map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let texture = texture_creator
        .create_texture_from_surface(&surface)
        .map_err(|e| e.to_string())?;
    let query = texture.query();
    let (width, _) = canvas.output_size()?;
    let x = (width as i32 - query.width as i32) / 2;
    canvas.copy(&texture, None, Some(Rect::new(x, 8, query.width, query.height)))
}
