//! 2D polygon physics for a local-multiplayer arena shooter.
//!
//! Bodies are convex polygons with mass, velocity and per-tick force and
//! impulse accumulators. Everything that acts on them (gravity, springs,
//! drag, collision responses, despawn rules) is registered on a [`Scene`]
//! as a binding against the bodies it needs. Each [`Scene::tick`] runs all
//! bindings, reaps whatever they flagged as removed, then integrates the
//! rest.
//!
//! ```
//! use rphys_arena::{Body, Rgb, Scene, Vector, shapes};
//!
//! let mut scene: Scene = Scene::new();
//! let mut ball = Body::new(shapes::circle(1.0, 16), 1.0, Rgb::RED);
//! ball.set_centroid(Vector::new(0.0, 10.0));
//! ball.set_velocity(Vector::new(0.0, -20.0));
//! let ball = scene.add_body(ball);
//! let ground = scene.add_body(Body::immovable(shapes::rect(50.0, 2.0), Rgb::GREEN));
//! scene.add_physics_collision(0.5, ball, ground);
//!
//! for _ in 0..100 {
//!     scene.tick(0.01);
//! }
//! assert!(scene.body(ball).unwrap().velocity().y > 0.0);
//! ```

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod forces;
pub mod library;
pub mod scene;
pub mod shapes;

pub use body::{Body, INFINITE_MASS, Mass, Rgb};
pub use collision::{CollisionInfo, find_collision};
pub use config::PhysicsConfig;
pub use error::ConfigError;
pub use forces::{CollisionResponse, Contact, Interaction};
pub use library::Vector;
pub use scene::{Binding, BodyKey, Scene, Sprite};
