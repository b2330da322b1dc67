use crossterm::event::KeyCode;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::Result;
use crate::game::{GameController, GameState, Transition};
use crate::generator::carve_maze;
use crate::geometry::{map_to_walls, Layout, WallSegment};
use crate::grid::Grid;
use crate::input;
use crate::world::{PhysicsWorld, Tag};

/// One maze game: the carved grid, its world, and the state machine driving it.
pub struct MazeSession<W: PhysicsWorld> {
    seed: u64,
    layout: Layout,
    grid: Grid,
    walls: Vec<WallSegment>,
    world: W,
    controller: GameController<W>,
    ticks: u64,
}

impl<W: PhysicsWorld> MazeSession<W> {
    /// Validates `config`, carves a maze and populates `world` with it.
    ///
    /// Uses `config.seed` when set, a random seed otherwise.
    pub fn new(config: &Config, world: W) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_rng(config, world, seed, &mut StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &Config, mut world: W, seed: u64, rng: &mut impl Rng) -> Result<Self> {
        config.validate()?;
        let layout = Layout::new(config.rows, config.cols, config.width, config.height);
        let grid = carve_maze(config.rows, config.cols, rng);

        let walls = map_to_walls(&grid, &layout);
        for wall in &walls {
            world.create_static_rectangle(wall.center, wall.width, wall.height, Tag::Wall)?;
        }
        let controller = GameController::setup(&mut world, &grid, &layout)?;

        info!(
            "new {}x{} maze (seed {seed}), {} walls",
            config.rows,
            config.cols,
            walls.len()
        );
        Ok(Self {
            seed,
            layout,
            grid,
            walls,
            world,
            controller,
            ticks: 0,
        })
    }

    /// Handles one key-down event. Returns whether it moved the ball.
    pub fn key_down(&mut self, code: KeyCode) -> Result<bool> {
        let ball = self.controller.ball();
        Ok(input::handle_key(&mut self.world, ball, code)?)
    }

    /// Advances the simulation and feeds new contacts to the state machine.
    pub fn tick(&mut self) -> Result<Option<Transition>> {
        self.ticks += 1;
        let pairs = self.world.step();
        let transition = self.controller.handle_collisions(&mut self.world, &pairs)?;
        if transition.is_some() {
            info!("maze solved after {} ticks", self.ticks);
        }
        Ok(transition)
    }

    pub fn state(&self) -> GameState {
        self.controller.state()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn controller(&self) -> &GameController<W> {
        &self.controller
    }
}
