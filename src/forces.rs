//! Force laws and collision responses that bindings run every tick.
//!
//! Each [`Interaction`] names its target bodies by [`BodyKey`] and touches
//! only their accumulators and removed flags. Forces add up, so the order in
//! which bindings run inside one tick does not change the physical result.

use crate::body::{Body, Mass};
use crate::collision::find_collision;
use crate::config::PhysicsConfig;
use crate::library::Vector;
use crate::scene::{Bodies, BodyKey};
use tracing::{trace, warn};

/// Per-pair latch that turns the level-triggered SAT result into a single
/// event on entering contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Contact {
    #[default]
    Separated,
    Touching,
}

impl Contact {
    /// Next latch state, and whether the collision response should fire.
    pub fn advance(self, collided: bool) -> (Contact, bool) {
        match (self, collided) {
            (Contact::Separated, true) => (Contact::Touching, true),
            (Contact::Touching, true) => (Contact::Touching, false),
            (_, false) => (Contact::Separated, false),
        }
    }
}

/// What happens when a collision binding enters contact.
#[derive(Debug, Clone)]
pub enum CollisionResponse<T> {
    /// Impulse along the contact normal.
    Physics { elasticity: f64 },
    /// Counts contacts down and removes the flagged bodies at zero.
    Destructive {
        hits_left: usize,
        destroy_first: bool,
        destroy_second: bool,
    },
    /// The first body picks up the second: `upgrade` receives the first body
    /// and the second body's payload, then the second body is removed.
    Pickup { upgrade: fn(&mut Body<T>, &T) },
}

impl<T> CollisionResponse<T> {
    fn respond(&mut self, first: &mut Body<T>, second: &mut Body<T>, axis: Vector) {
        match self {
            CollisionResponse::Physics { elasticity } => {
                physics_collision(*elasticity, first, second, axis);
            }
            CollisionResponse::Destructive {
                hits_left,
                destroy_first,
                destroy_second,
            } => {
                if *hits_left == 0 {
                    return;
                }
                *hits_left -= 1;
                if *hits_left == 0 {
                    trace!("destructive collision exhausted");
                    if *destroy_first {
                        first.remove();
                    }
                    if *destroy_second {
                        second.remove();
                    }
                }
            }
            CollisionResponse::Pickup { upgrade } => {
                upgrade(first, second.info());
                second.remove();
            }
        }
    }
}

/// The closed set of rules a binding can run.
#[derive(Debug, Clone)]
pub enum Interaction<T> {
    /// Newtonian attraction `g·m1·m2/d²`.
    Gravity { g: f64, first: BodyKey, second: BodyKey },
    /// Hookean spring with rest length zero.
    Spring { k: f64, first: BodyKey, second: BodyKey },
    /// Linear drag `-gamma·v`.
    Drag { gamma: f64, body: BodyKey },
    /// Cancels the accumulated force pushing a body into the other.
    NormalForce { first: BodyKey, second: BodyKey },
    /// Edge-triggered collision response.
    Collision {
        first: BodyKey,
        second: BodyKey,
        contact: Contact,
        response: CollisionResponse<T>,
    },
    /// Removes the flagged bodies once their centroids are more than
    /// `radius` apart.
    RadialDestructive {
        radius: f64,
        first: BodyKey,
        second: BodyKey,
        destroy_first: bool,
        destroy_second: bool,
    },
}

impl<T> Interaction<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            Interaction::Gravity { .. } => "gravity",
            Interaction::Spring { .. } => "spring",
            Interaction::Drag { .. } => "drag",
            Interaction::NormalForce { .. } => "normal force",
            Interaction::Collision { response, .. } => match response {
                CollisionResponse::Physics { .. } => "physics collision",
                CollisionResponse::Destructive { .. } => "destructive collision",
                CollisionResponse::Pickup { .. } => "pickup collision",
            },
            Interaction::RadialDestructive { .. } => "radial destructive collision",
        }
    }

    /// Bodies whose removal retires this interaction.
    pub fn targets(&self) -> Vec<BodyKey> {
        match *self {
            Interaction::Drag { body, .. } => vec![body],
            Interaction::Gravity { first, second, .. }
            | Interaction::Spring { first, second, .. }
            | Interaction::NormalForce { first, second }
            | Interaction::Collision { first, second, .. }
            | Interaction::RadialDestructive { first, second, .. } => vec![first, second],
        }
    }

    /// Runs the rule once against the live body set.
    pub(crate) fn apply(&mut self, bodies: &mut Bodies<T>, config: &PhysicsConfig) {
        match self {
            Interaction::Drag { gamma, body } => {
                if let Some(body) = bodies.get_mut(*body) {
                    let velocity = body.velocity();
                    body.add_force(velocity * -*gamma);
                } else {
                    warn!("drag target no longer in scene");
                }
            }
            Interaction::Gravity { g, first, second } => {
                if let Some([a, b]) = pair(bodies, *first, *second) {
                    gravity(*g, config.min_gravity_distance, a, b);
                }
            }
            Interaction::Spring { k, first, second } => {
                if let Some([a, b]) = pair(bodies, *first, *second) {
                    spring(*k, a, b);
                }
            }
            Interaction::NormalForce { first, second } => {
                if let Some([a, b]) = pair(bodies, *first, *second) {
                    normal_force(config.normal_force_elasticity, a, b);
                }
            }
            Interaction::Collision {
                first,
                second,
                contact,
                response,
            } => {
                let Some([a, b]) = pair(bodies, *first, *second) else {
                    return;
                };
                let info = find_collision(a.polygon(), b.polygon());
                let (next, fire) = contact.advance(info.collided);
                *contact = next;
                if fire {
                    trace!(kind = "collision", "contact entered");
                    response.respond(a, b, info.axis);
                }
            }
            Interaction::RadialDestructive {
                radius,
                first,
                second,
                destroy_first,
                destroy_second,
            } => {
                let Some([a, b]) = pair(bodies, *first, *second) else {
                    return;
                };
                if a.distance(b) > *radius {
                    if *destroy_first {
                        a.remove();
                    }
                    if *destroy_second {
                        b.remove();
                    }
                }
            }
        }
    }
}

/// Both bodies of a pairwise rule, or `None` for a self pair or a key that
/// is no longer in the scene.
fn pair<T>(bodies: &mut Bodies<T>, first: BodyKey, second: BodyKey) -> Option<[&mut Body<T>; 2]> {
    if first == second {
        return None;
    }
    let pair = bodies.get_disjoint_mut([first, second]);
    if pair.is_none() {
        warn!("pairwise binding target no longer in scene");
    }
    pair
}

fn gravity<T>(g: f64, min_distance: f64, a: &mut Body<T>, b: &mut Body<T>) {
    let (Mass::Finite(m1), Mass::Finite(m2)) = (a.mass(), b.mass()) else {
        trace!("gravity with an immovable body has no effect");
        return;
    };
    let diff = a.centroid() - b.centroid();
    let distance = diff.length().max(min_distance);
    let direction = diff * (1.0 / distance);
    let force_1on2 = direction * (g * m1 * m2 / (distance * distance));
    a.add_force(-force_1on2);
    b.add_force(force_1on2);
}

fn spring<T>(k: f64, a: &mut Body<T>, b: &mut Body<T>) {
    let force_1on2 = (a.centroid() - b.centroid()) * k;
    a.add_force(-force_1on2);
    b.add_force(force_1on2);
}

/// Contact normal pointing from `a` towards `b`.
fn oriented_axis<T>(a: &Body<T>, b: &Body<T>, axis: Vector) -> Vector {
    if (b.centroid() - a.centroid()).component(axis) < 0.0 {
        -axis
    } else {
        axis
    }
}

/// Applies the one-dimensional collision impulse along `axis`.
pub fn physics_collision<T>(elasticity: f64, a: &mut Body<T>, b: &mut Body<T>, axis: Vector) {
    let axis = oriented_axis(a, b, axis);
    let reduced_mass = match (a.mass(), b.mass()) {
        (Mass::Infinite, Mass::Infinite) => return,
        (Mass::Infinite, Mass::Finite(m)) | (Mass::Finite(m), Mass::Infinite) => m,
        (Mass::Finite(m1), Mass::Finite(m2)) => m1 * m2 / (m1 + m2),
    };
    let closing = b.velocity().component(axis) - a.velocity().component(axis);
    let impulse = axis * (reduced_mass * (1.0 + elasticity) * closing);
    a.add_impulse(impulse);
    b.add_impulse(-impulse);
}

fn normal_force<T>(elasticity: f64, a: &mut Body<T>, b: &mut Body<T>) {
    let Some(axis) = find_collision(a.polygon(), b.polygon()).contact_axis() else {
        return;
    };
    let axis = oriented_axis(a, b, axis);
    let into_b = a.net_force().component(axis).max(0.0);
    let into_a = b.net_force().component(axis).min(0.0);
    match (a.mass(), b.mass()) {
        (_, Mass::Infinite) => a.add_force(-(axis * into_b)),
        (Mass::Infinite, _) => b.add_force(-(axis * into_a)),
        _ => physics_collision(elasticity, a, b, axis),
    }
}
