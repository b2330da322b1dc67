use log::{debug, info};

use crate::error::EngineError;
use crate::geometry::{ball_spec, goal_spec, Layout};
use crate::grid::Grid;
use crate::world::{CollisionPair, PhysicsWorld, Tag};

/// Gravity switched on once the ball reaches the goal.
pub const WIN_GRAVITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
}

/// What changed as a result of handling a batch of collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Won,
}

/// Owns the goal and the ball and runs the playing/won state machine.
#[derive(Debug)]
pub struct GameController<W: PhysicsWorld> {
    state: GameState,
    goal: W::Body,
    ball: W::Body,
}

impl<W: PhysicsWorld> GameController<W> {
    /// Adds the goal (bottom-right cell) and the ball (top-left cell) to `world`.
    pub fn setup(world: &mut W, grid: &Grid, layout: &Layout) -> Result<Self, EngineError> {
        let goal = goal_spec(grid, layout);
        let goal = world.create_static_rectangle(goal.center, goal.width, goal.height, Tag::Goal)?;
        let ball = ball_spec(layout);
        let ball = world.create_dynamic_circle(ball.center, ball.radius, Tag::Ball)?;
        Ok(Self {
            state: GameState::Playing,
            goal,
            ball,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn ball(&self) -> W::Body {
        self.ball
    }

    pub fn goal(&self) -> W::Body {
        self.goal
    }

    /// Feeds collision-start pairs into the state machine.
    ///
    /// The first pair tagged exactly `{ball, goal}` while playing wins the
    /// game: gravity is switched on and every wall becomes dynamic. Once won,
    /// all further pairs are ignored.
    pub fn handle_collisions(
        &mut self,
        world: &mut W,
        pairs: &[CollisionPair<W::Body>],
    ) -> Result<Option<Transition>, EngineError> {
        let mut transition = None;
        for pair in pairs {
            if !is_goal_hit(world, pair) {
                continue;
            }
            if self.state == GameState::Won {
                debug!("ignoring repeated goal contact");
                continue;
            }
            self.win(world)?;
            transition = Some(Transition::Won);
        }
        Ok(transition)
    }

    fn win(&mut self, world: &mut W) -> Result<(), EngineError> {
        self.state = GameState::Won;
        world.set_gravity_y(WIN_GRAVITY);
        let walls = world.bodies_with_tag(Tag::Wall);
        for &wall in &walls {
            world.set_static(wall, false)?;
        }
        info!("goal reached, releasing {} walls", walls.len());
        Ok(())
    }
}

fn is_goal_hit<W: PhysicsWorld>(world: &W, pair: &CollisionPair<W::Body>) -> bool {
    matches!(
        (world.tag(pair.body_a), world.tag(pair.body_b)),
        (Some(Tag::Ball), Some(Tag::Goal)) | (Some(Tag::Goal), Some(Tag::Ball))
    )
}
