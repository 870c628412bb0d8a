//! The scene owns every body and binding and drives the tick loop.

use crate::body::Body;
use crate::config::PhysicsConfig;
use crate::forces::{CollisionResponse, Contact, Interaction};
use slotmap::{SlotMap, new_key_type};
use tracing::debug;

new_key_type! {
    /// Generation-checked handle to a body in a [`Scene`]. A key whose body
    /// has been reaped no longer resolves.
    pub struct BodyKey;
}

/// Body storage shared between the scene and the interaction handlers.
pub type Bodies<T> = SlotMap<BodyKey, Body<T>>;

/// A registered interaction and the bodies it depends on.
#[derive(Debug, Clone)]
pub struct Binding<T> {
    targets: Vec<BodyKey>,
    interaction: Interaction<T>,
}

impl<T> Binding<T> {
    pub fn targets(&self) -> &[BodyKey] {
        &self.targets
    }

    pub fn interaction(&self) -> &Interaction<T> {
        &self.interaction
    }

    /// True once any target is removed or gone.
    fn is_retired(&self, bodies: &Bodies<T>) -> bool {
        self.targets
            .iter()
            .any(|&key| bodies.get(key).is_none_or(|body| body.is_removed()))
    }
}

/// Render-facing handle tied to a body; reaped together with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub body: BodyKey,
    /// Current animation frame, chosen by the renderer.
    pub frame: usize,
}

impl Sprite {
    pub fn new(body: BodyKey) -> Sprite {
        Sprite { body, frame: 0 }
    }
}

pub struct Scene<T = ()> {
    bodies: Bodies<T>,
    order: Vec<BodyKey>,
    bindings: Vec<Binding<T>>,
    sprites: Vec<Sprite>,
    config: PhysicsConfig,
}

impl<T> Default for Scene<T> {
    fn default() -> Self {
        Scene::with_config(PhysicsConfig::default())
    }
}

impl<T> Scene<T> {
    pub fn new() -> Scene<T> {
        Scene::default()
    }

    /// # Panics
    ///
    /// Panics if `config` fails [`PhysicsConfig::validate`].
    pub fn with_config(config: PhysicsConfig) -> Scene<T> {
        if let Err(err) = config.validate() {
            panic!("{err}");
        }
        Scene {
            bodies: SlotMap::with_key(),
            order: Vec::new(),
            bindings: Vec::new(),
            sprites: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn add_body(&mut self, body: Body<T>) -> BodyKey {
        let key = self.bodies.insert(body);
        self.order.push(key);
        key
    }

    /// Number of bodies, removed-but-not-yet-reaped ones included.
    pub fn body_count(&self) -> usize {
        self.order.len()
    }

    /// Key of the body at `index` in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn body_key(&self, index: usize) -> BodyKey {
        assert!(
            index < self.order.len(),
            "body index {index} out of range ({} bodies)",
            self.order.len()
        );
        self.order[index]
    }

    pub fn get_body(&self, index: usize) -> &Body<T> {
        &self.bodies[self.body_key(index)]
    }

    pub fn get_body_mut(&mut self, index: usize) -> &mut Body<T> {
        let key = self.body_key(index);
        &mut self.bodies[key]
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body<T>> {
        self.bodies.get(key)
    }

    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body<T>> {
        self.bodies.get_mut(key)
    }

    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body<T>)> + '_ {
        self.order.iter().map(|&key| (key, &self.bodies[key]))
    }

    /// Flags the body at `index` for destruction at the next tick.
    pub fn remove_body(&mut self, index: usize) {
        self.get_body_mut(index).remove();
    }

    /// Flags the body for destruction at the next tick. Stale keys are
    /// ignored.
    pub fn remove(&mut self, key: BodyKey) {
        if let Some(body) = self.bodies.get_mut(key) {
            body.remove();
        }
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite_mut(&mut self, index: usize) -> &mut Sprite {
        &mut self.sprites[index]
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn bindings(&self) -> &[Binding<T>] {
        &self.bindings
    }

    /// Registers an interaction and returns its current index.
    ///
    /// # Panics
    ///
    /// Panics if a target key is not a body of this scene.
    pub fn add_binding(&mut self, interaction: Interaction<T>) -> usize {
        let targets = interaction.targets();
        for &key in &targets {
            assert!(self.bodies.contains_key(key), "binding target {key:?} is not in the scene");
        }
        debug!(kind = interaction.kind(), targets = targets.len(), "registered binding");
        self.bindings.push(Binding { targets, interaction });
        self.bindings.len() - 1
    }

    pub fn add_gravity(&mut self, g: f64, first: BodyKey, second: BodyKey) -> usize {
        self.add_binding(Interaction::Gravity { g, first, second })
    }

    pub fn add_spring(&mut self, k: f64, first: BodyKey, second: BodyKey) -> usize {
        self.add_binding(Interaction::Spring { k, first, second })
    }

    pub fn add_drag(&mut self, gamma: f64, body: BodyKey) -> usize {
        self.add_binding(Interaction::Drag { gamma, body })
    }

    pub fn add_normal_force(&mut self, first: BodyKey, second: BodyKey) -> usize {
        self.add_binding(Interaction::NormalForce { first, second })
    }

    /// Edge-triggered collision between two bodies.
    pub fn add_collision(&mut self, first: BodyKey, second: BodyKey, response: CollisionResponse<T>) -> usize {
        self.add_binding(Interaction::Collision {
            first,
            second,
            contact: Contact::Separated,
            response,
        })
    }

    pub fn add_physics_collision(&mut self, elasticity: f64, first: BodyKey, second: BodyKey) -> usize {
        self.add_collision(first, second, CollisionResponse::Physics { elasticity })
    }

    /// Removes the flagged bodies on first contact.
    pub fn add_destructive_collision(
        &mut self,
        first: BodyKey,
        second: BodyKey,
        destroy_first: bool,
        destroy_second: bool,
    ) -> usize {
        self.add_delayed_destructive_collision(first, second, destroy_first, destroy_second, 1)
    }

    /// Removes the flagged bodies on the `collisions_before_destruction`-th
    /// contact.
    pub fn add_delayed_destructive_collision(
        &mut self,
        first: BodyKey,
        second: BodyKey,
        destroy_first: bool,
        destroy_second: bool,
        collisions_before_destruction: usize,
    ) -> usize {
        assert!(collisions_before_destruction > 0, "destructive collision needs at least one hit");
        self.add_collision(
            first,
            second,
            CollisionResponse::Destructive {
                hits_left: collisions_before_destruction,
                destroy_first,
                destroy_second,
            },
        )
    }

    pub fn add_radial_destructive_collision(
        &mut self,
        first: BodyKey,
        second: BodyKey,
        destroy_first: bool,
        destroy_second: bool,
        radius: f64,
    ) -> usize {
        assert!(radius.is_finite() && radius >= 0.0, "radius must be finite and non-negative, got {radius}");
        self.add_binding(Interaction::RadialDestructive {
            radius,
            first,
            second,
            destroy_first,
            destroy_second,
        })
    }

    /// `player` picks up `powerup` on first contact.
    pub fn add_pickup_collision(&mut self, player: BodyKey, powerup: BodyKey, upgrade: fn(&mut Body<T>, &T)) -> usize {
        self.add_collision(player, powerup, CollisionResponse::Pickup { upgrade })
    }

    /// Advances the scene by `dt`.
    ///
    /// Runs every binding in registration order, then reaps bindings,
    /// sprites and bodies touched by a removal, then integrates the
    /// survivors. Handlers only flag removals, so every body they see is
    /// still allocated.
    pub fn tick(&mut self, dt: f64) {
        for binding in &mut self.bindings {
            binding.interaction.apply(&mut self.bodies, &self.config);
        }

        let bodies = &self.bodies;
        let binding_total = self.bindings.len();
        self.bindings.retain(|binding| !binding.is_retired(bodies));

        let sprite_total = self.sprites.len();
        self.sprites
            .retain(|sprite| bodies.get(sprite.body).is_some_and(|body| !body.is_removed()));

        let body_total = self.order.len();
        let bodies = &mut self.bodies;
        let max_rot_velocity = self.config.max_rot_velocity;
        self.order.retain(|&key| {
            if bodies[key].is_removed() {
                bodies.remove(key);
                return false;
            }
            bodies[key].tick_capped(dt, max_rot_velocity);
            true
        });

        if body_total != self.order.len() {
            debug!(
                bindings = binding_total - self.bindings.len(),
                sprites = sprite_total - self.sprites.len(),
                bodies = body_total - self.order.len(),
                "reaped removed bodies"
            );
        }
    }
}
