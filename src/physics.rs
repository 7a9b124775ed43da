/*
 * Physics Module
 *
 * This module runs the flock. Every call to `step` executes the same five
 * stages in order:
 * 1. Reflect agents that left the domain cube while still moving outward
 * 2. Alignment
 * 3. Cohesion
 * 4. Separation
 * 5. Integrate positions and velocities, capping speed
 *
 * Stages 2 to 4 read a frame-stable snapshot, so they can be evaluated on the
 * rayon pool or against a spatial grid; both give exactly the same result as
 * the sequential scan over every pair.
 */

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::boid::{steering, Agent, Steering};
use crate::drawable::{DrawContext, Drawable};
use crate::errors::Result;
use crate::node::Node;
use crate::params::BoidsParams;
use crate::spatial_grid::SpatialGrid;
use crate::transform::{heading_change, scale, translate, EPSILON};
use crate::{DOMAIN_HALF_EXTENT, LATTICE_SPACING};

// The rendered part of one agent: a placement that follows the agent and a
// heading node whose transform turns the body with every reflection
struct AgentRig {
    placement: Mat4,
    heading: Node,
}

pub struct Boids {
    index: usize,
    params: BoidsParams,
    agents: Vec<Agent>,
    rigs: Vec<AgentRig>,
    spatial_grid: SpatialGrid,
}

// Uniform sample in [0, upper); a degenerate range yields 0
fn sample(rng: &mut StdRng, upper: f32) -> f32 {
    if upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

fn random_vector(rng: &mut StdRng, upper: f32) -> Vec3 {
    let x = sample(rng, upper);
    let y = sample(rng, upper);
    let z = sample(rng, upper);
    Vec3::new(x, y, z)
}

impl Boids {
    // Pack `params.count` agents on a cubic lattice centred on the origin with
    // random non-negative velocities and accelerations. `body` builds the
    // drawable for agent `i`.
    pub fn new(
        index: usize,
        params: BoidsParams,
        body: impl FnMut(usize) -> Box<dyn Drawable>,
    ) -> Result<Self> {
        params.validate()?;

        let side = params.lattice_side();
        let centre = (side as f32 - 1.0) / 2.0;
        let mut positions = Vec::with_capacity(params.count);
        for i in 0..side {
            for j in 0..side {
                for k in 0..side {
                    let cell = Vec3::new(i as f32, j as f32, k as f32) - Vec3::splat(centre);
                    positions.push(LATTICE_SPACING * cell);
                }
            }
        }

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let speed_bound = 3f32.sqrt() * params.max_speed;
        let force_bound = 3f32.sqrt() * params.max_force;
        let velocities: Vec<Vec3> = (0..params.count)
            .map(|_| random_vector(&mut rng, speed_bound))
            .collect();
        let accelerations: Vec<Vec3> = (0..params.count)
            .map(|_| random_vector(&mut rng, force_bound))
            .collect();

        let agents = positions
            .into_iter()
            .zip(velocities)
            .zip(accelerations)
            .map(|((position, velocity), acceleration)| Agent::new(position, velocity, acceleration))
            .collect();

        log::debug!("flock {index}: {} agents on a {side}^3 lattice", params.count);
        Self::from_agents(index, params, agents, body)
    }

    // Build a flock from explicit agents; the count is taken from `agents`
    pub fn from_agents(
        index: usize,
        mut params: BoidsParams,
        agents: Vec<Agent>,
        mut body: impl FnMut(usize) -> Box<dyn Drawable>,
    ) -> Result<Self> {
        params.count = agents.len();
        params.validate_dynamics()?;

        let rigs = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let mut heading = Node::with_transform(heading_change(Vec3::Z, agent.orientation));
                heading.add(format!("boid_{i}"), body(i));
                AgentRig {
                    placement: translate(agent.position) * scale(Vec3::splat(params.scaling)),
                    heading,
                }
            })
            .collect();

        let spatial_grid = SpatialGrid::new(params.perception.max(EPSILON));
        Ok(Self {
            index,
            params,
            agents,
            rigs,
            spatial_grid,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn params(&self) -> &BoidsParams {
        &self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    // Transform that follows agent `i` through the domain
    pub fn placement(&self, i: usize) -> Option<Mat4> {
        self.rigs.get(i).map(|rig| rig.placement)
    }

    // Accumulated body turn of agent `i`
    pub fn heading(&self, i: usize) -> Option<Mat4> {
        self.rigs.get(i).map(|rig| rig.heading.transform)
    }

    // Switch evaluation strategy for the steering stages
    pub fn set_parallel(&mut self, parallel: bool) {
        self.params.parallel = parallel;
    }

    pub fn set_spatial_grid(&mut self, spatial_grid: bool) {
        self.params.spatial_grid = spatial_grid;
    }

    // Advance the flock by one fixed step of `deltat`
    pub fn step(&mut self) {
        self.reflect_at_bounds();
        let steerings = self.compute_steering();
        for (agent, steering) in self.agents.iter_mut().zip(&steerings) {
            agent.apply_steering(steering);
        }
        self.integrate();
    }

    fn reflect_at_bounds(&mut self) {
        for (i, (agent, rig)) in self.agents.iter_mut().zip(&mut self.rigs).enumerate() {
            if let Some(previous) = agent.reflect_at_bounds(DOMAIN_HALF_EXTENT) {
                log::trace!("flock {}: agent {i} reflected at {:?}", self.index, agent.position);
                rig.heading.transform = heading_change(previous, agent.orientation) * rig.heading.transform;
            }
        }
    }

    // Alignment, cohesion and separation for every agent against the
    // positions and velocities left by stage 1
    fn compute_steering(&mut self) -> Vec<Steering> {
        if self.params.spatial_grid {
            let cell_size = self.params.perception.max(EPSILON);
            if self.spatial_grid.cell_size != cell_size {
                self.spatial_grid = SpatialGrid::new(cell_size);
            }
            self.spatial_grid
                .rebuild(self.agents.iter().map(|agent| agent.position));
        }

        let agents = &self.agents;
        let params = &self.params;
        let grid = params.spatial_grid.then_some(&self.spatial_grid);
        let evaluate = |i: usize| match grid {
            Some(grid) => steering(i, agents, grid.get_nearby_indices(agents[i].position), params),
            None => steering(i, agents, 0..agents.len(), params),
        };

        if params.parallel {
            (0..agents.len()).into_par_iter().map(evaluate).collect()
        } else {
            (0..agents.len()).map(evaluate).collect()
        }
    }

    fn integrate(&mut self) {
        let deltat = self.params.deltat;
        let max_speed = self.params.max_speed;
        for (agent, rig) in self.agents.iter_mut().zip(&mut self.rigs) {
            let displacement = agent.integrate(deltat, max_speed);
            rig.placement = translate(displacement) * rig.placement;
        }
    }
}

impl Drawable for Boids {
    // The flock advances once per traversal
    fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
        self.step();
        for rig in &mut self.rigs {
            rig.heading.draw(ctx, model * rig.placement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::{DrawList, MeshHandle};
    use approx::assert_relative_eq;

    struct Body;

    impl Drawable for Body {
        fn draw(&mut self, ctx: &mut DrawContext<'_>, model: Mat4) {
            ctx.draw_mesh(MeshHandle(1), &model);
        }
    }

    fn body(_: usize) -> Box<dyn Drawable> {
        Box::new(Body)
    }

    fn seeded(count: usize, seed: u64) -> BoidsParams {
        BoidsParams {
            count,
            seed: Some(seed),
            ..BoidsParams::default()
        }
    }

    #[test]
    fn lattice_is_centred() {
        let boids = Boids::new(0, seeded(8, 1), body).unwrap();
        let positions: Vec<Vec3> = boids.agents().iter().map(|a| a.position).collect();
        assert_eq!(positions[0], Vec3::splat(-1.5));
        assert_eq!(positions[1], Vec3::new(-1.5, -1.5, 1.5));
        assert_eq!(positions[7], Vec3::splat(1.5));
        let centroid = positions.iter().sum::<Vec3>() / 8.0;
        assert_relative_eq!(centroid.length(), 0.0);
    }

    #[test]
    fn initial_state_respects_bounds() {
        let boids = Boids::new(0, seeded(27, 5), body).unwrap();
        let speed_bound = 3f32.sqrt() * 2.0;
        for agent in boids.agents() {
            assert!(agent.velocity.min_element() >= 0.0);
            assert!(agent.velocity.max_element() < speed_bound);
            assert!(agent.acceleration.max_element() < 3f32.sqrt() * 5.0);
            assert_relative_eq!(agent.orientation.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn same_seed_same_flock() {
        let a = Boids::new(0, seeded(27, 42), body).unwrap();
        let b = Boids::new(1, seeded(27, 42), body).unwrap();
        assert_eq!(a.agents(), b.agents());
    }

    #[test]
    fn rejects_non_cube_counts() {
        assert!(Boids::new(0, seeded(9, 0), body).is_err());
    }

    #[test]
    fn heading_starts_along_velocity() {
        let boids = Boids::new(0, seeded(8, 3), body).unwrap();
        for (i, agent) in boids.agents().iter().enumerate() {
            let forward = boids.heading(i).unwrap().transform_vector3(Vec3::Z);
            assert_relative_eq!(forward.dot(agent.orientation), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn placement_follows_position() {
        let mut boids = Boids::new(0, seeded(8, 9), body).unwrap();
        for _ in 0..25 {
            boids.step();
        }
        for (i, agent) in boids.agents().iter().enumerate() {
            let origin = boids.placement(i).unwrap().w_axis.truncate();
            assert_relative_eq!(origin.x, agent.position.x, epsilon = 1e-4);
            assert_relative_eq!(origin.y, agent.position.y, epsilon = 1e-4);
            assert_relative_eq!(origin.z, agent.position.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn draw_steps_once_and_draws_every_body() {
        let mut boids = Boids::new(0, seeded(8, 2), body).unwrap();
        let before = boids.agents().to_vec();
        let mut list = DrawList::new();
        let mut ctx = DrawContext::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0, &mut list);
        boids.draw(&mut ctx, Mat4::IDENTITY);
        assert_eq!(list.len(), 8);
        assert_ne!(before, boids.agents());
    }

    #[test]
    fn grid_holds_only_occupied_cells_over_a_long_run() {
        let params = BoidsParams {
            perception: 0.01,
            spatial_grid: true,
            ..seeded(27, 6)
        };
        let mut boids = Boids::new(0, params, body).unwrap();
        for _ in 0..2000 {
            boids.step();
            assert!(boids.spatial_grid.occupied_cells() <= boids.len());
        }
    }
}
