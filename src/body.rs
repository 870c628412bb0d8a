use crate::library::Vector;
use std::f64::consts::TAU;

/// Rotational velocity ceiling used by [`Body::tick`].
pub const MAX_ROT_VELOCITY: f64 = 0.15;
/// Mass sentinel for immovable bodies.
pub const INFINITE_MASS: f64 = f64::INFINITY;

/// Render hint carried by every body; the engine never reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Rgb {
        Rgb { r, g, b }
    }
}

/// Body mass. Immovable bodies carry `Infinite` instead of a float sentinel
/// so every formula that divides by mass has to say what it does with them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mass {
    Finite(f64),
    Infinite,
}

impl Mass {
    pub fn is_infinite(self) -> bool {
        matches!(self, Mass::Infinite)
    }

    /// `1 / mass`, zero for immovable bodies.
    pub fn inverse(self) -> f64 {
        match self {
            Mass::Finite(m) => 1.0 / m,
            Mass::Infinite => 0.0,
        }
    }
}

impl From<f64> for Mass {
    /// # Panics
    ///
    /// Panics unless `mass` is strictly positive or `f64::INFINITY`.
    fn from(mass: f64) -> Mass {
        if mass == INFINITE_MASS {
            return Mass::Infinite;
        }
        assert!(mass > 0.0 && mass.is_finite(), "body mass must be positive, got {mass}");
        Mass::Finite(mass)
    }
}

/// A simulated convex polygon.
///
/// `T` is the owner-supplied payload (the game's body kind). It is dropped
/// together with the body when the scene reaps it.
#[derive(Debug, Clone)]
pub struct Body<T = ()> {
    shape: Vec<Vector>,
    mass: Mass,
    color: Rgb,
    angle: f64,
    velocity: Vector,
    rot_velocity: f64,
    rot_acceleration: f64,
    rotation_center: Vector,
    net_force: Vector,
    net_impulse: Vector,
    removed: bool,
    info: T,
}

fn signed_area(shape: &[Vector]) -> f64 {
    let size = shape.len();
    let mut area = 0.0;
    for i in 0..size {
        area += shape[i].cross(shape[(i + 1) % size]);
    }
    area / 2.0
}

impl<T: Default> Body<T> {
    /// Creates a body with the default payload.
    ///
    /// # Panics
    ///
    /// Panics if `mass` is not positive (or infinite) or the shape has fewer
    /// than three vertices or zero area.
    pub fn new(shape: Vec<Vector>, mass: f64, color: Rgb) -> Body<T> {
        Body::with_info(shape, mass, color, T::default())
    }

    pub fn immovable(shape: Vec<Vector>, color: Rgb) -> Body<T> {
        Body::new(shape, INFINITE_MASS, color)
    }
}

impl<T> Body<T> {
    pub fn with_info(shape: Vec<Vector>, mass: f64, color: Rgb, info: T) -> Body<T> {
        assert!(shape.len() >= 3, "body shape needs at least three vertices, got {}", shape.len());
        assert!(signed_area(&shape) != 0.0, "body shape has zero area");
        let mut body = Body {
            shape,
            mass: Mass::from(mass),
            color,
            angle: 0.0,
            velocity: Vector::ZERO,
            rot_velocity: 0.0,
            rot_acceleration: 0.0,
            rotation_center: Vector::ZERO,
            net_force: Vector::ZERO,
            net_impulse: Vector::ZERO,
            removed: false,
            info,
        };
        body.rotation_center = body.centroid();
        body
    }

    /// Copy of the current vertices.
    pub fn shape(&self) -> Vec<Vector> {
        self.shape.clone()
    }

    /// Read-only view of the current vertices.
    pub fn polygon(&self) -> &[Vector] {
        &self.shape
    }

    /// Signed shoelace area; positive for counterclockwise winding.
    pub fn area(&self) -> f64 {
        signed_area(&self.shape)
    }

    /// Area-weighted centroid of the current polygon.
    pub fn centroid(&self) -> Vector {
        let size = self.shape.len();
        let mut centroid = Vector::ZERO;
        for i in 0..size {
            let current = self.shape[i];
            let next = self.shape[(i + 1) % size];
            let cross = current.cross(next);
            centroid.x += (current.x + next.x) * cross;
            centroid.y += (current.y + next.y) * cross;
        }
        centroid * (1.0 / (6.0 * self.area()))
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn info(&self) -> &T {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut T {
        &mut self.info
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn net_force(&self) -> Vector {
        self.net_force
    }

    pub fn net_impulse(&self) -> Vector {
        self.net_impulse
    }

    pub fn rot_velocity(&self) -> f64 {
        self.rot_velocity
    }

    /// Sets the spin rate and moves the pivot to the current centroid.
    pub fn set_rot_velocity(&mut self, rot_velocity: f64) {
        self.rot_velocity = rot_velocity;
        self.rotation_center = self.centroid();
    }

    pub fn rot_acceleration(&self) -> f64 {
        self.rot_acceleration
    }

    pub fn set_rot_acceleration(&mut self, rot_acceleration: f64) {
        self.rot_acceleration = rot_acceleration;
    }

    pub fn rotation_center(&self) -> Vector {
        self.rotation_center
    }

    pub fn set_rotation_center(&mut self, center: Vector) {
        self.rotation_center = center;
    }

    /// Translates the polygon so its centroid lands on `point`.
    pub fn set_centroid(&mut self, point: Vector) {
        let center_diff = point - self.centroid();
        for vertex in &mut self.shape {
            *vertex += center_diff;
        }
    }

    /// Rotates about the centroid so the absolute angle becomes `angle`.
    pub fn set_rotation(&mut self, angle: f64) {
        let centroid = self.centroid();
        let delta = angle - self.angle;
        for vertex in &mut self.shape {
            *vertex = (*vertex - centroid).rotate(delta) + centroid;
        }
        self.angle = angle;
        self.set_centroid(centroid);
    }

    /// Rotates about the centroid and makes the centroid the new pivot.
    pub fn rotate(&mut self, angle: f64) {
        let centroid = self.centroid();
        self.rotation_center = centroid;
        self.rotate_about(angle, centroid);
    }

    /// Rotates every vertex by `angle` about `pivot`.
    pub fn rotate_about(&mut self, angle: f64, pivot: Vector) {
        for vertex in &mut self.shape {
            *vertex = (*vertex - pivot).rotate(angle) + pivot;
        }
        self.angle = (self.angle + angle) % TAU;
    }

    pub fn add_force(&mut self, force: Vector) {
        self.net_force += force;
    }

    pub fn add_impulse(&mut self, impulse: Vector) {
        self.net_impulse += impulse;
    }

    pub fn remove_all_forces(&mut self) {
        self.net_force = Vector::ZERO;
    }

    pub fn remove_x_forces(&mut self) {
        self.net_force.x = 0.0;
    }

    /// Distance between the two centroids.
    pub fn distance(&self, other: &Body<T>) -> f64 {
        (self.centroid() - other.centroid()).length()
    }

    /// Advances one timestep with the default rotation ceiling.
    pub fn tick(&mut self, dt: f64) {
        self.tick_capped(dt, MAX_ROT_VELOCITY);
    }

    /// Advances one timestep.
    ///
    /// Forces and impulses feed the velocity, the centroid moves by the
    /// average of the old and new velocity, then the spin is integrated and
    /// applied about the pivot. Both accumulators are cleared afterwards.
    pub fn tick_capped(&mut self, dt: f64, max_rot_velocity: f64) {
        let inverse_mass = self.mass.inverse();
        let force_velocity = self.net_force * (dt * inverse_mass);
        let net_velocity_change = force_velocity + self.net_impulse * inverse_mass;
        let new_velocity = self.velocity + net_velocity_change;
        let avg_velocity = self.velocity.average(new_velocity);
        self.velocity = new_velocity;

        let new_center = self.centroid() + avg_velocity * dt;
        self.set_centroid(new_center);

        if self.rot_velocity < max_rot_velocity {
            self.rot_velocity += dt * self.rot_acceleration;
        }
        if self.rot_velocity != 0.0 {
            self.rotate_about(self.rot_velocity, self.rotation_center);
        }

        self.net_force = Vector::ZERO;
        self.net_impulse = Vector::ZERO;
    }

    /// Flags the body for destruction at the next tick boundary.
    pub fn remove(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }
}
