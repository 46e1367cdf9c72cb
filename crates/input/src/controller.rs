use glam::Vec3;
use stagehand_common::Ray;
use stagehand_kernel::InstanceRegistry;
use stagehand_physics::{
    PhysicsWorld, RigidBodyHandle, RigidBodyType, vec3_from_rapier, vec3_to_rapier,
};
use stagehand_scene::{NodeId, SceneGraph};
use std::time::Instant;

use crate::{Action, ManipulationConfig, Outcome};

/// State of one grab, from `grab` until `release`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManipulationSession {
    pub body: RigidBodyHandle,
    /// Root visual node of the grabbed instance.
    pub visual_node: NodeId,
    pub grab_distance: f32,
    /// Target written by the most recent `drag`.
    pub current_position: Vec3,
    pub last_position: Vec3,
    pub last_timestamp: Instant,
    /// Velocity between the two most recent samples.
    pub velocity: Vec3,
}

impl ManipulationSession {
    /// Velocity from the last sample up to `now`. Falls back to the sampled
    /// velocity when no time has passed since that sample.
    pub fn release_velocity(&self, now: Instant) -> Vec3 {
        let elapsed = now.saturating_duration_since(self.last_timestamp);
        if elapsed.is_zero() {
            return self.velocity;
        }
        (self.current_position - self.last_position) / elapsed.as_secs_f32()
    }
}

/// Grab, drag, throw and shove for physics-backed instances.
///
/// Idle until `grab` resolves a body; the body then stays kinematic and
/// follows `drag` until `release` hands it back to the simulation.
#[derive(Debug, Default)]
pub struct ManipulationController {
    config: ManipulationConfig,
    session: Option<ManipulationSession>,
}

impl ManipulationController {
    pub fn new(config: ManipulationConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &ManipulationConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&ManipulationSession> {
        self.session.as_ref()
    }

    pub fn is_grabbing(&self) -> bool {
        self.session.is_some()
    }

    /// Dispatch one action.
    pub fn apply(
        &mut self,
        action: &Action,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        registry: &InstanceRegistry,
        now: Instant,
    ) -> Outcome {
        let outcome = match *action {
            Action::Grab { node, viewpoint } => self
                .grab(scene, physics, registry, node, viewpoint, now)
                .map(Outcome::Grabbed),
            Action::Drag(ray) => self.drag(physics, &ray, now).map(Outcome::Moved),
            Action::Release => self.release(scene, physics, now).map(Outcome::Released),
            Action::Shove { node, source } => self
                .shove(scene, physics, registry, node, source)
                .map(Outcome::Shoved),
            Action::ZoomIn => self.zoom_in().map(Outcome::Zoomed),
            Action::ZoomOut => self.zoom_out().map(Outcome::Zoomed),
            Action::Noop => None,
        };
        outcome.unwrap_or(Outcome::Ignored)
    }

    /// Take hold of the body owning `node`.
    ///
    /// The body turns kinematic, its node is flagged as in manual motion, and
    /// the grab distance is fixed from `viewpoint`. Only dynamic bodies can be
    /// grabbed. A grab while holding something drops the old body first,
    /// without a throw.
    pub fn grab(
        &mut self,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        registry: &InstanceRegistry,
        node: NodeId,
        viewpoint: Vec3,
        now: Instant,
    ) -> Option<RigidBodyHandle> {
        let Some((body, visual_node)) = registry
            .find_owner(scene, node)
            .and_then(|i| Some((i.rigid_body?, i.visual_node)))
        else {
            tracing::debug!(?node, "grab ignored: no owning body");
            return None;
        };
        let held = self.session.is_some_and(|s| s.body == body);
        match physics.body(body) {
            None => {
                tracing::warn!(?node, "grab ignored: body missing from physics world");
                return None;
            }
            Some(rb) if !rb.is_dynamic() && !held => {
                tracing::debug!(
                    ?node,
                    body_type = ?rb.body_type(),
                    "grab ignored: body is not dynamic"
                );
                return None;
            }
            Some(_) => {}
        }
        if self.session.is_some() {
            self.end_session(scene, physics);
        }

        let rb = physics.body_mut(body)?;
        let position = vec3_from_rapier(rb.translation());
        let grab_distance = viewpoint.distance(position);
        rb.set_body_type(RigidBodyType::KinematicPositionBased, true);
        rb.wake_up(true);
        if let Some(n) = scene.get_mut(visual_node) {
            n.tags.manual_motion = true;
        }

        self.session = Some(ManipulationSession {
            body,
            visual_node,
            grab_distance,
            current_position: position,
            last_position: position,
            last_timestamp: now,
            velocity: Vec3::ZERO,
        });
        tracing::debug!(?body, grab_distance, "grabbed");
        Some(body)
    }

    /// Move the held body to the point `grab_distance` along `ray`.
    ///
    /// Velocity is resampled only once the sample interval has passed since
    /// the previous sample.
    pub fn drag(&mut self, physics: &mut PhysicsWorld, ray: &Ray, now: Instant) -> Option<Vec3> {
        let session = self.session.as_mut()?;
        let target = ray.at(session.grab_distance);
        let Some(rb) = physics.body_mut(session.body) else {
            tracing::debug!(body = ?session.body, "drag ignored: body gone");
            return None;
        };
        rb.set_next_kinematic_translation(vec3_to_rapier(target));
        session.current_position = target;

        let elapsed = now.saturating_duration_since(session.last_timestamp);
        if elapsed >= self.config.sample_interval() && !elapsed.is_zero() {
            session.velocity = (target - session.last_position) / elapsed.as_secs_f32();
            session.last_position = target;
            session.last_timestamp = now;
        }
        Some(target)
    }

    /// Hand the body back to the simulation and throw it with the velocity
    /// since the last sample. Returns the applied impulse.
    pub fn release(
        &mut self,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        now: Instant,
    ) -> Option<Vec3> {
        let session = self.session?;
        let impulse = session.release_velocity(now) * self.config.throw_multiplier;

        self.end_session(scene, physics);
        let PhysicsWorld {
            bodies, colliders, ..
        } = physics;
        if let Some(rb) = bodies.get_mut(session.body) {
            rb.recompute_mass_properties_from_colliders(colliders);
            rb.apply_impulse(vec3_to_rapier(impulse), true);
        }
        tracing::debug!(body = ?session.body, ?impulse, "released");
        Some(impulse)
    }

    /// One-shot push away from `source`. Works with or without a grab.
    pub fn shove(
        &mut self,
        scene: &SceneGraph,
        physics: &mut PhysicsWorld,
        registry: &InstanceRegistry,
        node: NodeId,
        source: Vec3,
    ) -> Option<Vec3> {
        let Some(body) = registry.find_owning_body(scene, node) else {
            tracing::debug!(?node, "shove ignored: no owning body");
            return None;
        };
        let PhysicsWorld {
            bodies, colliders, ..
        } = physics;
        let rb = bodies.get_mut(body)?;
        let position = vec3_from_rapier(rb.translation());
        let Some(direction) = (position - source).try_normalize() else {
            tracing::debug!(?node, "shove ignored: source at the body");
            return None;
        };
        let impulse = direction * self.config.shove_strength;
        rb.recompute_mass_properties_from_colliders(colliders);
        rb.apply_impulse(vec3_to_rapier(impulse), true);
        tracing::debug!(?body, ?impulse, "shoved");
        Some(impulse)
    }

    /// Pull the held body closer. Returns the new distance.
    pub fn zoom_in(&mut self) -> Option<f32> {
        self.zoom(-self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Option<f32> {
        self.zoom(self.config.zoom_step)
    }

    fn zoom(&mut self, delta: f32) -> Option<f32> {
        let distance = self
            .config
            .clamp_distance(self.session.as_ref()?.grab_distance + delta);
        let session = self.session.as_mut()?;
        session.grab_distance = distance;
        Some(distance)
    }

    /// Drop the session without a throw.
    pub fn cancel(&mut self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) -> bool {
        if self.session.is_none() {
            return false;
        }
        self.end_session(scene, physics);
        true
    }

    fn end_session(&mut self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(rb) = physics.body_mut(session.body) {
            rb.set_body_type(RigidBodyType::Dynamic, true);
            rb.wake_up(true);
        }
        if let Some(n) = scene.get_mut(session.visual_node) {
            n.tags.manual_motion = false;
        }
    }
}
