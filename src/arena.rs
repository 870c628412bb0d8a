use rand::Rng;
use rand::seq::IndexedRandom;
use rphys_arena::error::ConfigError;
use rphys_arena::{Body, BodyKey, PhysicsConfig, Rgb, Scene, Sprite, Vector, shapes};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Playfield size in world units
pub const WORLD: Vector = Vector::new(120.0, 80.0);
/// Universal gravitational constant
const G: f64 = 6.67E-11;
/// Mass of the well below the map, chosen with GRAVITY_ACCEL to fix its radius
const GRAVITY_M: f64 = 6E24;
/// Downward acceleration the well produces at the playfield
const GRAVITY_ACCEL: f64 = 150.0;
const WALL_WIDTH: f64 = 4.0;
const WALL_COLOR: Rgb = Rgb::new(0.0, 0.0, 1.0);
const GROUND_COLOR: Rgb = Rgb::new(0.2, 0.6, 0.2);

const PLAYER_WIDTH: f64 = 6.0;
const PLAYER_HEIGHT: f64 = 9.0;
const PLAYER_MASS: f64 = 1.0;
const PLAYER_DRAG: f64 = 0.5;
const PLAYER_COLORS: [Rgb; 2] = [Rgb::RED, Rgb::GREEN];
const WALL_ELASTICITY: f64 = 0.5;
const GROUND_ELASTICITY: f64 = 0.0;
const MOVE_FORCE: f64 = 120.0;
const JUMP_IMPULSE: f64 = 80.0;
const JUMP_COOLDOWN: f64 = 0.8;

const BULLET_MASS: f64 = 1.0;
const BULLET_SPEED: f64 = 150.0;
const BULLET_DISP: f64 = 6.0;
const BULLET_ELASTICITY: f64 = 1.0;
const SHOT_COOLDOWN: f64 = 0.4;
const SHOTGUN_PELLETS: usize = 5;
const SHOTGUN_SPREAD: f64 = 0.35;
const SHOTGUN_RADIUS: f64 = 30.0;
const RICOCHET_WALL_HITS: usize = 2;

const POWERUP_SIZE: f64 = 5.0;
const POWERUP_MASS: f64 = 1.0;
const POWERUP_ELASTICITY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weapon {
    #[default]
    Pistol,
    Ricochet,
    Shotgun,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub id: usize,
    pub weapon: Weapon,
    /// `None` means unlimited
    pub shots_left: Option<u32>,
    /// +1 facing right, -1 facing left
    pub facing: f64,
    pub since_shot: f64,
    pub since_jump: f64,
}

/// Payload attached to every arena body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Kind {
    #[default]
    Wall,
    Ground,
    Arm,
    GravityWell,
    Player(Player),
    Bullet(Weapon),
    Powerup(Weapon),
}

/// Held keys for one player during a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

/// Demo settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Seconds of simulation per wall-clock second
    pub time_mult: f64,
    /// Seconds between powerup drops
    pub powerup_interval: f64,
    pub max_powerups: usize,
    pub font_path: Option<String>,
    pub physics: PhysicsConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 640,
            time_mult: 1.0,
            powerup_interval: 8.0,
            max_powerups: 3,
            font_path: None,
            physics: PhysicsConfig::default(),
        }
    }
}

impl ArenaConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ArenaConfig = toml::from_str(&source)?;
        config.physics.validate()?;
        info!(path = %path.display(), "loaded arena config");
        Ok(config)
    }
}

/// Spawn points for powerups, picked at random
const SPAWNS: [Vector; 4] = [
    Vector::new(WORLD.x / 2.0, WORLD.y * 3.0 / 4.0),
    Vector::new(WORLD.x / 12.0, WORLD.y / 2.0),
    Vector::new(WORLD.x * 11.0 / 12.0, WORLD.y / 2.0),
    Vector::new(WORLD.x / 2.0, WORLD.y * 0.37),
];

pub struct Arena {
    pub scene: Scene<Kind>,
    pub players: [BodyKey; 2],
    since_drop: f64,
    powerup_interval: f64,
    max_powerups: usize,
}

fn player_info(body: &Body<Kind>) -> Option<&Player> {
    match body.info() {
        Kind::Player(player) => Some(player),
        _ => None,
    }
}

fn player_info_mut(body: &mut Body<Kind>) -> Option<&mut Player> {
    match body.info_mut() {
        Kind::Player(player) => Some(player),
        _ => None,
    }
}

/// Pickup callback: the powerup's weapon replaces the player's, or adds a
/// shot when it is already equipped.
fn upgrade(player: &mut Body<Kind>, powerup: &Kind) {
    let (Some(player), Kind::Powerup(weapon)) = (player_info_mut(player), powerup) else {
        return;
    };
    if player.weapon == *weapon {
        player.shots_left = player.shots_left.map(|shots| shots + 1);
        return;
    }
    player.weapon = *weapon;
    player.shots_left = match weapon {
        Weapon::Pistol => None,
        Weapon::Shotgun => Some(2),
        Weapon::Ricochet => Some(4),
    };
    debug!(player = player.id, ?weapon, "picked up powerup");
}

impl Arena {
    pub fn new(config: &ArenaConfig) -> Arena {
        let mut scene = Scene::with_config(config.physics.clone());
        add_gravity_well(&mut scene);
        add_platform(&mut scene, WORLD.x, WALL_WIDTH, Vector::new(WORLD.x / 2.0, 0.0), GROUND_COLOR, Kind::Ground);
        add_platform(&mut scene, WALL_WIDTH, 2.0 * WORLD.y, Vector::new(0.0, WORLD.y), WALL_COLOR, Kind::Wall);
        add_platform(&mut scene, WALL_WIDTH, 2.0 * WORLD.y, Vector::new(WORLD.x, WORLD.y), WALL_COLOR, Kind::Wall);
        add_platform(&mut scene, WORLD.x, WALL_WIDTH, Vector::new(WORLD.x / 2.0, WORLD.y), WALL_COLOR, Kind::Wall);
        add_platform(&mut scene, 20.0, 3.0, Vector::new(14.0, WORLD.y / 4.0), WALL_COLOR, Kind::Wall);
        add_platform(&mut scene, 20.0, 3.0, Vector::new(WORLD.x - 14.0, WORLD.y / 4.0), WALL_COLOR, Kind::Wall);
        add_platform(&mut scene, 30.0, 3.0, Vector::new(WORLD.x / 2.0, WORLD.y / 2.0), GROUND_COLOR, Kind::Ground);

        let arm_pivot = Vector::new(WORLD.x / 2.0, WORLD.y * 0.75);
        let arm = add_platform(&mut scene, 24.0, 2.0, arm_pivot, Rgb::BLACK, Kind::Arm);
        if let Some(arm) = scene.body_mut(arm) {
            arm.set_rot_velocity(0.005);
            arm.set_rot_acceleration(0.0004);
            arm.set_rotation_center(arm_pivot);
        }

        let players = [
            add_player(&mut scene, 0, Vector::new(14.0, WORLD.y / 4.0 + 8.0)),
            add_player(&mut scene, 1, Vector::new(WORLD.x - 14.0, WORLD.y / 4.0 + 8.0)),
        ];
        Arena {
            scene,
            players,
            since_drop: 0.0,
            powerup_interval: config.powerup_interval,
            max_powerups: config.max_powerups,
        }
    }

    /// Index of a player who has been hit, if any.
    pub fn loser(&self) -> Option<usize> {
        self.players.iter().position(|&key| !self.scene.contains(key))
    }

    pub fn apply_controls(&mut self, id: usize, controls: Controls, dt: f64) {
        let Some(body) = self.scene.body_mut(self.players[id]) else {
            return;
        };
        let mut jumped = false;
        if let Some(player) = player_info_mut(body) {
            player.since_shot += dt;
            player.since_jump += dt;
            if controls.left {
                player.facing = -1.0;
            }
            if controls.right {
                player.facing = 1.0;
            }
            if controls.jump && player.since_jump > JUMP_COOLDOWN {
                player.since_jump = 0.0;
                jumped = true;
            }
        }
        if controls.left {
            body.add_force(Vector::new(-MOVE_FORCE, 0.0));
        }
        if controls.right {
            body.add_force(Vector::new(MOVE_FORCE, 0.0));
        }
        if jumped {
            body.add_impulse(Vector::new(0.0, JUMP_IMPULSE));
        }
        if controls.shoot {
            self.shoot(id);
        }
    }

    /// Fires the player's weapon if the cooldown has elapsed.
    pub fn shoot(&mut self, id: usize) -> bool {
        let Some(body) = self.scene.body_mut(self.players[id]) else {
            return false;
        };
        let origin = body.centroid();
        let Some(player) = player_info_mut(body) else {
            return false;
        };
        if player.since_shot < SHOT_COOLDOWN {
            return false;
        }
        player.since_shot = 0.0;
        if player.shots_left == Some(0) {
            player.weapon = Weapon::Pistol;
            player.shots_left = None;
        }
        if let Some(shots) = player.shots_left.as_mut() {
            *shots -= 1;
        }
        let weapon = player.weapon;
        let facing = player.facing;

        let source = self.players[id];
        let start = origin + Vector::new(BULLET_DISP * facing, 0.0);
        let pellets = if weapon == Weapon::Shotgun { SHOTGUN_PELLETS } else { 1 };
        for i in 0..pellets {
            let spread = if pellets > 1 {
                SHOTGUN_SPREAD * (i as f64 / (pellets - 1) as f64 - 0.5)
            } else {
                0.0
            };
            let mut bullet = Body::with_info(shapes::rect(3.0, 1.0), BULLET_MASS, Rgb::BLACK, Kind::Bullet(weapon));
            bullet.set_centroid(start);
            bullet.rotate_about(spread * facing, origin);
            bullet.set_velocity(Vector::new(BULLET_SPEED * facing, 0.0).rotate(spread * facing));
            let bullet = self.scene.add_body(bullet);
            bind_bullet(&mut self.scene, bullet, weapon, source);
            self.scene.add_sprite(Sprite::new(bullet));
        }
        true
    }

    /// Drops a powerup at a random spawn point once the timer allows it.
    pub fn maybe_spawn_powerup<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> bool {
        self.since_drop += dt;
        let on_screen = self
            .scene
            .bodies()
            .filter(|(_, body)| matches!(body.info(), Kind::Powerup(_)))
            .count();
        if self.since_drop < self.powerup_interval || on_screen >= self.max_powerups {
            return false;
        }
        self.since_drop = 0.0;
        let weapon = if rng.random_bool(0.5) { Weapon::Ricochet } else { Weapon::Shotgun };
        let Some(&spawn) = SPAWNS.choose(rng) else {
            return false;
        };
        add_powerup(&mut self.scene, weapon, spawn);
        true
    }

    /// Keeps sprite frames in step with which way each player faces.
    pub fn sync_sprites(&mut self) {
        for i in 0..self.scene.sprite_count() {
            let body = self.scene.sprites()[i].body;
            let frame = match self.scene.body(body).and_then(player_info) {
                Some(player) if player.facing < 0.0 => 1,
                _ => 0,
            };
            self.scene.sprite_mut(i).frame = frame;
        }
    }

    pub fn step(&mut self, dt: f64) {
        self.sync_sprites();
        self.scene.tick(dt);
    }
}

fn add_gravity_well(scene: &mut Scene<Kind>) -> BodyKey {
    let radius = (G * GRAVITY_M / GRAVITY_ACCEL).sqrt();
    let mut well = Body::with_info(shapes::rect(1.0, 1.0), GRAVITY_M, WALL_COLOR, Kind::GravityWell);
    well.set_centroid(Vector::new(WORLD.x / 2.0, -radius));
    scene.add_body(well)
}

fn add_platform(scene: &mut Scene<Kind>, width: f64, height: f64, center: Vector, color: Rgb, kind: Kind) -> BodyKey {
    let mut body = Body::with_info(shapes::rect(width, height), f64::INFINITY, color, kind);
    body.set_centroid(center);
    let key = scene.add_body(body);
    scene.add_sprite(Sprite::new(key));
    key
}

/// Every key currently in the scene together with its kind.
fn kinds(scene: &Scene<Kind>) -> Vec<(BodyKey, Kind)> {
    scene
        .bodies()
        .filter(|(_, body)| !body.is_removed())
        .map(|(key, body)| (key, *body.info()))
        .collect()
}

fn add_player(scene: &mut Scene<Kind>, id: usize, spawn: Vector) -> BodyKey {
    let info = Kind::Player(Player {
        id,
        weapon: Weapon::Pistol,
        shots_left: None,
        facing: if id == 0 { 1.0 } else { -1.0 },
        since_shot: 0.0,
        since_jump: 0.0,
    });
    let mut body = Body::with_info(shapes::rect(PLAYER_WIDTH, PLAYER_HEIGHT), PLAYER_MASS, PLAYER_COLORS[id], info);
    body.set_centroid(spawn);
    let others = kinds(scene);
    let player = scene.add_body(body);
    scene.add_sprite(Sprite::new(player));
    scene.add_drag(PLAYER_DRAG, player);

    for (key, kind) in others {
        match kind {
            Kind::Wall | Kind::Arm => {
                scene.add_physics_collision(WALL_ELASTICITY, player, key);
                scene.add_normal_force(player, key);
            }
            Kind::Ground => {
                scene.add_physics_collision(GROUND_ELASTICITY, player, key);
                scene.add_normal_force(player, key);
            }
            Kind::GravityWell => {
                scene.add_gravity(G, key, player);
            }
            Kind::Player(_) => {
                scene.add_physics_collision(WALL_ELASTICITY, player, key);
            }
            Kind::Bullet(_) | Kind::Powerup(_) => {}
        }
    }
    player
}

fn add_powerup(scene: &mut Scene<Kind>, weapon: Weapon, spawn: Vector) -> BodyKey {
    let color = match weapon {
        Weapon::Ricochet => Rgb::new(0.78, 0.0, 0.98),
        _ => Rgb::new(0.78, 0.0, 0.2),
    };
    let mut body = Body::with_info(
        shapes::rect(POWERUP_SIZE, POWERUP_SIZE),
        POWERUP_MASS,
        color,
        Kind::Powerup(weapon),
    );
    body.set_centroid(spawn);
    let others = kinds(scene);
    let powerup = scene.add_body(body);
    scene.add_sprite(Sprite::new(powerup));

    for (key, kind) in others {
        match kind {
            Kind::Player(_) => {
                scene.add_pickup_collision(key, powerup, upgrade);
            }
            Kind::Wall | Kind::Ground | Kind::Arm => {
                scene.add_physics_collision(POWERUP_ELASTICITY, powerup, key);
                scene.add_normal_force(powerup, key);
            }
            Kind::GravityWell => {
                scene.add_gravity(G, powerup, key);
            }
            Kind::Powerup(_) => {
                scene.add_destructive_collision(powerup, key, false, true);
            }
            Kind::Bullet(_) => {}
        }
    }
    debug!(?weapon, x = spawn.x, y = spawn.y, "spawned powerup");
    powerup
}

fn bind_bullet(scene: &mut Scene<Kind>, bullet: BodyKey, weapon: Weapon, source: BodyKey) {
    if weapon == Weapon::Shotgun {
        scene.add_radial_destructive_collision(source, bullet, false, true, SHOTGUN_RADIUS);
    }
    for (key, kind) in kinds(scene) {
        if key == bullet {
            continue;
        }
        match kind {
            Kind::Player(_) => {
                scene.add_destructive_collision(bullet, key, true, true);
            }
            Kind::Bullet(other) => match (weapon, other) {
                (Weapon::Shotgun, Weapon::Shotgun) => {
                    scene.add_physics_collision(BULLET_ELASTICITY, bullet, key);
                }
                (Weapon::Shotgun, _) => {
                    scene.add_destructive_collision(bullet, key, false, true);
                }
                (_, Weapon::Shotgun) => {
                    scene.add_destructive_collision(bullet, key, true, false);
                }
                _ => {
                    scene.add_destructive_collision(bullet, key, true, true);
                }
            },
            Kind::Wall | Kind::Ground | Kind::Arm => match weapon {
                Weapon::Ricochet => {
                    scene.add_physics_collision(BULLET_ELASTICITY, bullet, key);
                    scene.add_delayed_destructive_collision(bullet, key, true, false, RICOCHET_WALL_HITS);
                }
                Weapon::Pistol | Weapon::Shotgun => {
                    scene.add_destructive_collision(bullet, key, true, false);
                }
            },
            Kind::GravityWell => {
                if weapon != Weapon::Shotgun {
                    scene.add_gravity(G, bullet, key);
                }
            }
            Kind::Powerup(_) => {
                scene.add_destructive_collision(bullet, key, true, false);
            }
        }
    }
}
