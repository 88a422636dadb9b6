use std::time::Duration;

use bevy::{
    ecs::system::SystemState,
    input::common_conditions::input_just_pressed,
    math::{ivec2, vec2},
    prelude::*,
    window::PrimaryWindow,
};

use crate::{prelude::*, state::GameState};

/// how often (in generations) the population gets logged
const LOG_EVERY_GENERATIONS: u64 = 100;

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Board::default())
            .insert_resource(GridLines::default())
            .insert_resource(LifeRng::default())
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
                UPDATE_INTERVAL_MS,
            )))
            .add_systems(
                OnEnter(GameState::Load),
                (load_meshes_and_materials, load_cell_board).chain(),
            )
            .add_systems(
                FixedUpdate,
                advance_generation.run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Update,
                (
                    toggle_cell_on_click.run_if(input_just_pressed(MouseButton::Left)),
                    handle_board_kbd,
                    toggle_paused.run_if(input_just_pressed(KeyCode::Space)),
                    draw_grid_lines.run_if(in_state(GameState::Paused).or(grid_lines_visible)),
                )
                    .run_if(in_state(GameState::Running).or(in_state(GameState::Paused))),
            )
            .add_systems(
                PostUpdate,
                sync_cell_materials.run_if(resource_exists_and_changed::<Life>),
            );
    }
}

// ——> SYSTEMS

/// initialize meshes and materials in a resource
fn load_meshes_and_materials(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    board: Res<Board>,
) {
    commands.insert_resource(MeshAndMats {
        cell: meshes.add(Rectangle::from_size(Vec2::splat(board.cell_size))),
        alive: materials.add(ColorMaterial::from_color(CELL_ALIVE_COLOR)),
        dead: materials.add(ColorMaterial::from_color(BG_COLOR)),
    });
}

/// spawn one entity per cell and hand the driver its all-dead grid
fn load_cell_board(
    world: &mut World,
    params: &mut SystemState<(Res<MeshAndMats>, Res<Board>, ResMut<NextState<GameState>>)>,
) {
    let (meshes_and_mats, board, _) = params.get_mut(world);
    // copy the board so that we can use it later
    let board = *board;
    let (cell_mesh, dead_mat) = (meshes_and_mats.cell.clone(), meshes_and_mats.dead.clone());

    let (cols, rows) = board.grid_dimensions();
    let grid = match reset(cols, rows) {
        Ok(grid) => grid,
        Err(err) => {
            error!("cannot build the board: {err}");
            return;
        }
    };

    let cells_to_spawn = grid
        .iter()
        .map(|(coord, _)| {
            (
                Cell,
                CellCoord(coord),
                Mesh2d(cell_mesh.clone()),
                MeshMaterial2d(dead_mat.clone()),
                Transform::from_translation(board.cell_coord_to_translation(coord))
                    .with_scale(board.cell_scale.extend(1.0)),
            )
        })
        .collect::<Vec<_>>();
    world.spawn_batch(cells_to_spawn);
    info!(cols, rows, "board ready");

    world.insert_resource(Life::new(grid));
    let (_, _, mut game_state) = params.get_mut(world);
    game_state.set(GameState::Running);
}

fn advance_generation(mut life: ResMut<Life>) {
    life.step();
    if life.generation % LOG_EVERY_GENERATIONS == 0 {
        debug!(
            generation = life.generation,
            population = life.grid.population(),
            "advanced"
        );
    }
}

/// Toggles the cell under the cursor. Clicks that land outside the board are dropped.
fn toggle_cell_on_click(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    board: Res<Board>,
    mut life: ResMut<Life>,
) {
    let (Ok(window), Ok((camera, cam_transform))) = (windows.get_single(), cameras.get_single())
    else {
        return;
    };
    let Some(world_pos) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(cam_transform, cursor).ok())
    else {
        return;
    };

    let coord = board.translation_to_cell_coord(world_pos);
    match toggle_at(&mut life.grid, coord.x, coord.y) {
        Ok(alive) => debug!(x = coord.x, y = coord.y, alive, "toggled cell"),
        Err(err) => debug!("ignoring click: {err}"),
    }
}

fn handle_board_kbd(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    board: Res<Board>,
    mut life: ResMut<Life>,
    mut rng: ResMut<LifeRng>,
    mut grid_lines: ResMut<GridLines>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyG) {
        **grid_lines = !**grid_lines;
    }

    let (cols, rows) = board.grid_dimensions();
    let new_grid = if keyboard_input.just_pressed(KeyCode::KeyR) {
        reset(cols, rows)
    } else if keyboard_input.just_pressed(KeyCode::KeyT) {
        randomize(cols, rows, &mut rng.0)
    } else {
        return;
    };

    match new_grid {
        Ok(grid) => {
            info!(population = grid.population(), "new board");
            life.replace(grid);
        }
        Err(err) => warn!("keeping the current board: {err}"),
    }
}

fn toggle_paused(state: Res<State<GameState>>, mut next_state: ResMut<NextState<GameState>>) {
    match state.get() {
        GameState::Running => {
            info!("paused");
            next_state.set(GameState::Paused);
        }
        GameState::Paused => {
            info!("resumed");
            next_state.set(GameState::Running);
        }
        GameState::Load => unreachable!(),
    }
}

fn grid_lines_visible(grid_lines: Res<GridLines>) -> bool {
    **grid_lines
}

fn draw_grid_lines(mut gizmos: Gizmos, board: Res<Board>) {
    let (cols, rows) = board.grid_dimensions();
    let (top_left, size) = (board.top_left(), board.pixel_size());

    for col in 0..=cols {
        let x = top_left.x + col as f32 * board.cell_size;
        gizmos.line_2d(vec2(x, top_left.y), vec2(x, top_left.y - size.y), GRID_LINE_COLOR);
    }
    for row in 0..=rows {
        let y = top_left.y - row as f32 * board.cell_size;
        gizmos.line_2d(vec2(top_left.x, y), vec2(top_left.x + size.x, y), GRID_LINE_COLOR);
    }
}

fn sync_cell_materials(
    life: Res<Life>,
    mesh_n_mats: Res<MeshAndMats>,
    mut cell_query: Query<(&CellCoord, &mut MeshMaterial2d<ColorMaterial>), With<Cell>>,
) {
    for (coord, mut material) in cell_query.iter_mut() {
        let target = if matches!(life.grid.get(coord.x, coord.y), Ok(true)) {
            &mesh_n_mats.alive
        } else {
            &mesh_n_mats.dead
        };
        if material.0 != *target {
            material.0 = target.clone();
        }
    }
}

// ——> COMPONENTS

#[derive(Component)]
#[require(CellCoord, Mesh2d)]
struct Cell;

#[derive(Component, Debug, Default, Deref)]
struct CellCoord(IVec2);

// ——> RESOURCES

/// hold handles for the cell mesh and materials
#[derive(Resource, Clone)]
struct MeshAndMats {
    cell: Handle<Mesh>,
    alive: Handle<ColorMaterial>,
    dead: Handle<ColorMaterial>,
}

/// The one live grid. Every tick it is swapped for the next generation.
#[derive(Resource, Debug)]
pub struct Life {
    grid: Grid,
    generation: u64,
}

impl Life {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn step(&mut self) {
        self.grid = advance(&self.grid);
        self.generation += 1;
    }

    /// swap in a freshly reset or randomized grid, restarting the generation count
    pub fn replace(&mut self, grid: Grid) {
        self.grid = grid;
        self.generation = 0;
    }
}

/// whether grid lines are drawn while running (they always are while paused)
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct GridLines(bool);

#[derive(Resource, Debug)]
pub struct LifeRng(fastrand::Rng);

impl Default for LifeRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Board {
    /// the center of the board
    pub center: Vec2,
    /// the playable area in pixels
    pub domain: Vec2,
    /// side length of each individual cell
    pub cell_size: f32,
    /// scale of each individual cell (should be 0.0 - 1.0)
    pub cell_scale: Vec2,
}

impl Board {
    /// the amount of cells on each axis
    #[inline]
    pub fn grid_dimensions(&self) -> (u32, u32) {
        (
            (self.domain.x / self.cell_size) as u32,
            (self.domain.y / self.cell_size) as u32,
        )
    }

    /// computes size of the area covered by whole cells, in pixels
    #[inline]
    pub fn pixel_size(&self) -> Vec2 {
        let (cols, rows) = self.grid_dimensions();
        vec2(cols as f32, rows as f32) * self.cell_size
    }

    #[inline]
    fn top_left(&self) -> Vec2 {
        self.center + self.pixel_size() * vec2(-0.5, 0.5)
    }

    /// Row 0 is the top row, so y grows downwards like screen coordinates.
    #[inline]
    pub fn cell_coord_to_translation(&self, cell_coord: IVec2) -> Vec3 {
        (self.top_left()
            + vec2(cell_coord.x as f32 + 0.5, -(cell_coord.y as f32 + 0.5)) * self.cell_size)
            .extend(10.0)
    }

    /// The cell under a world position. Positions off the board map to coordinates
    /// outside the grid.
    #[inline]
    pub fn translation_to_cell_coord(&self, pos: Vec2) -> IVec2 {
        let offs = (pos - self.top_left()) / self.cell_size;
        ivec2(offs.x.floor() as i32, (-offs.y).floor() as i32)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            center: BOARD_POS,
            domain: BOARD_SIZE_PX,
            cell_size: CELL_SIZE_PX,
            cell_scale: CELL_SCALE,
        }
    }
}
