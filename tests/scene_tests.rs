//! Scene Tests - tick ordering, binding lifetimes and whole-scene physics
//!
//! Drives the engine through its public API the way the arena game does:
//! build bodies, register bindings, tick.

use approx::assert_abs_diff_eq;
use rphys_arena::config::MIN_GRAVITY_DISTANCE;
use rphys_arena::{Body, BodyKey, PhysicsConfig, Rgb, Scene, Sprite, Vector, shapes};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Kind {
    #[default]
    Wall,
    Player { shots: u32 },
    Powerup { shots: u32 },
}

fn square(scene: &mut Scene<Kind>, side: f64, mass: f64, center: Vector, kind: Kind) -> BodyKey {
    let mut body = Body::with_info(shapes::rect(side, side), mass, Rgb::RED, kind);
    body.set_centroid(center);
    scene.add_body(body)
}

fn centroid(scene: &Scene<Kind>, key: BodyKey) -> Vector {
    scene.body(key).expect("body is live").centroid()
}

// ============================================================================
// Tick ordering
// ============================================================================

#[test]
fn test_destructive_after_two_contacts() {
    let mut scene = Scene::new();
    let a = square(&mut scene, 2.0, 1.0, Vector::new(0.0, 0.0), Kind::Wall);
    let b = square(&mut scene, 2.0, 1.0, Vector::new(1.0, 0.0), Kind::Wall);
    let bystander = square(&mut scene, 2.0, 1.0, Vector::new(50.0, 0.0), Kind::Wall);
    scene.add_delayed_destructive_collision(a, b, true, true, 2);
    scene.add_drag(0.1, a);
    scene.add_drag(0.1, bystander);
    assert_eq!(scene.binding_count(), 3);

    // first contact
    scene.tick(0.01);
    assert_eq!(scene.body_count(), 3);

    // sustained contact is not a new contact
    scene.tick(0.01);
    scene.tick(0.01);
    assert_eq!(scene.body_count(), 3);

    // separate, then touch again
    scene.body_mut(b).unwrap().set_centroid(Vector::new(20.0, 0.0));
    scene.tick(0.01);
    scene.body_mut(b).unwrap().set_centroid(Vector::new(1.0, 0.0));
    scene.tick(0.01);

    assert_eq!(scene.body_count(), 1);
    assert!(!scene.contains(a));
    assert!(!scene.contains(b));
    assert_eq!(scene.binding_count(), 1);
    assert_eq!(scene.bindings()[0].targets(), &[bystander]);
}

#[test]
fn test_removed_body_survives_until_tick_boundary() {
    let mut scene = Scene::new();
    let a = square(&mut scene, 2.0, 1.0, Vector::ZERO, Kind::Wall);
    let b = square(&mut scene, 2.0, 1.0, Vector::new(10.0, 0.0), Kind::Wall);
    scene.add_sprite(Sprite::new(a));
    scene.add_spring(2.0, a, b);

    scene.remove(a);
    assert!(scene.contains(a));
    assert!(scene.body(a).unwrap().is_removed());
    assert_eq!(scene.sprite_count(), 1);

    scene.tick(0.1);
    assert!(!scene.contains(a));
    assert_eq!(scene.sprite_count(), 0);
    assert_eq!(scene.binding_count(), 0);
    // the spring still ran this tick, so b moved towards a
    assert!(centroid(&scene, b).x < 10.0);
}

#[test]
fn test_radial_despawn() {
    let mut scene = Scene::new();
    let gun = square(&mut scene, 2.0, 1.0, Vector::ZERO, Kind::Wall);
    let pellet = square(&mut scene, 0.5, 1.0, Vector::new(2.0, 0.0), Kind::Wall);
    scene.body_mut(pellet).unwrap().set_velocity(Vector::new(100.0, 0.0));
    scene.add_radial_destructive_collision(gun, pellet, false, true, 30.0);

    let mut ticks = 0;
    while scene.contains(pellet) {
        scene.tick(0.05);
        ticks += 1;
        assert!(ticks < 20, "pellet never despawned");
    }
    assert!(scene.contains(gun));
    assert_eq!(scene.binding_count(), 0);
}

// ============================================================================
// Physics
// ============================================================================

#[test]
fn test_elastic_collision_reverses_velocities() {
    let mut scene = Scene::new();
    let a = square(&mut scene, 4.0, 1.0, Vector::new(0.0, 0.0), Kind::Wall);
    let b = square(&mut scene, 4.0, 1.0, Vector::new(3.9, 0.0), Kind::Wall);
    scene.body_mut(a).unwrap().set_velocity(Vector::new(2.0, 0.0));
    scene.body_mut(b).unwrap().set_velocity(Vector::new(-2.0, 0.0));
    scene.add_physics_collision(1.0, a, b);

    scene.tick(0.001);
    let va = scene.body(a).unwrap().velocity();
    let vb = scene.body(b).unwrap().velocity();
    assert_abs_diff_eq!(va.x, -2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(vb.x, 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(va.y, 0.0, epsilon = 1e-9);
    // momentum and kinetic energy
    assert_abs_diff_eq!(va.x + vb.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(va.x * va.x + vb.x * vb.x, 8.0, epsilon = 1e-9);
}

#[test]
fn test_gravity_monotonic_attraction() {
    let mut scene = Scene::new();
    let a = square(&mut scene, 1.0, 10.0, Vector::new(0.0, 0.0), Kind::Wall);
    let b = square(&mut scene, 1.0, 10.0, Vector::new(60.0, 0.0), Kind::Wall);
    scene.add_gravity(50.0, a, b);

    let mut last = (centroid(&scene, b) - centroid(&scene, a)).length();
    for _ in 0..5000 {
        let velocity = scene.body(b).unwrap().velocity();
        scene.tick(0.01);
        if last < MIN_GRAVITY_DISTANCE {
            // inside the floor the pull is g * m1 * m2 / floor^2 = 200, so dv = 200 / 10 * 0.01
            let dv = scene.body(b).unwrap().velocity() - velocity;
            assert_abs_diff_eq!(dv.x, -0.2, epsilon = 1e-9);
            assert_abs_diff_eq!(dv.y, 0.0, epsilon = 1e-9);
            return;
        }
        let distance = (centroid(&scene, b) - centroid(&scene, a)).length();
        assert!(distance < last, "separation grew from {last} to {distance}");
        last = distance;
    }
    panic!("bodies never closed in, last separation {last}");
}

#[test]
fn test_immovable_body_stays_put() {
    let mut scene = Scene::new();
    let wall = square(&mut scene, 4.0, f64::INFINITY, Vector::new(5.0, 5.0), Kind::Wall);
    let ball = square(&mut scene, 1.0, 3.0, Vector::new(5.0, 8.0), Kind::Wall);
    scene.add_spring(100.0, wall, ball);
    scene.add_gravity(1000.0, wall, ball);
    for _ in 0..50 {
        scene.body_mut(wall).unwrap().add_impulse(Vector::new(7.0, -3.0));
        scene.tick(0.02);
    }
    assert_eq!(scene.body(wall).unwrap().velocity(), Vector::ZERO);
    assert_abs_diff_eq!(centroid(&scene, wall).x, 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(centroid(&scene, wall).y, 5.0, epsilon = 1e-9);
}

#[test]
fn test_normal_force_holds_box_on_ground() {
    let mut scene = Scene::new();
    let ground = square(&mut scene, 40.0, f64::INFINITY, Vector::new(0.0, -20.0), Kind::Wall);
    let block = square(&mut scene, 2.0, 1.0, Vector::new(0.0, 0.99), Kind::Wall);
    // an immovable anchor far below pulls the block into the ground
    let anchor = square(&mut scene, 1.0, f64::INFINITY, Vector::new(0.0, -200.0), Kind::Wall);
    scene.add_spring(0.5, anchor, block);
    scene.add_normal_force(block, ground);

    for _ in 0..20 {
        scene.tick(0.1);
    }
    assert_abs_diff_eq!(scene.body(block).unwrap().velocity().y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(centroid(&scene, block).y, 0.99, epsilon = 1e-9);
}

#[test]
fn test_config_sets_gravity_floor() {
    let config = PhysicsConfig::from_toml_str("min_gravity_distance = 1.0").unwrap();
    let mut near: Scene<Kind> = Scene::with_config(config);
    let mut far: Scene<Kind> = Scene::new();
    for scene in [&mut near, &mut far] {
        let a = square(scene, 0.5, 1.0, Vector::ZERO, Kind::Wall);
        let b = square(scene, 0.5, 1.0, Vector::new(2.0, 0.0), Kind::Wall);
        scene.add_gravity(1.0, a, b);
        scene.tick(1.0);
    }
    // d = 2 vs floored d = 5
    assert_abs_diff_eq!(near.get_body(0).velocity().x, 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(far.get_body(0).velocity().x, 2.0 / 125.0, epsilon = 1e-12);
}

// ============================================================================
// Pickups
// ============================================================================

fn take_shots(player: &mut Body<Kind>, powerup: &Kind) {
    if let (Kind::Player { shots }, Kind::Powerup { shots: extra }) = (player.info_mut(), powerup) {
        *shots += *extra;
    }
}

#[test]
fn test_pickup_upgrades_player_once() {
    let mut scene = Scene::new();
    let player = square(&mut scene, 2.0, 1.0, Vector::ZERO, Kind::Player { shots: 1 });
    let powerup = square(&mut scene, 1.0, 1.0, Vector::new(0.5, 0.0), Kind::Powerup { shots: 4 });
    scene.add_pickup_collision(player, powerup, take_shots);
    scene.add_physics_collision(0.2, player, powerup);

    scene.tick(0.01);
    scene.tick(0.01);
    assert!(!scene.contains(powerup));
    assert_eq!(scene.binding_count(), 0);
    assert_eq!(*scene.body(player).unwrap().info(), Kind::Player { shots: 5 });
}
