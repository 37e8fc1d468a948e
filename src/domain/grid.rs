use std::fmt;

use rand::Rng;
use rayon::prelude::*;

use super::{Cell, GridError, Pattern};

/// AutomatonGrid holds one generation of a bounded Game of Life board.
///
/// Edges are hard: neighbors outside the grid are absent, never wrapped.
/// Dimensions are fixed for the lifetime of an instance, so resizing means
/// building a new grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AutomatonGrid {
    /// Create a grid with every cell dead
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        Self::from_fn(width, height, |_, _| false)
    }

    /// Create a grid, asking `init` for the starting state of each cell
    pub fn from_fn<F>(width: i32, height: i32, mut init: F) -> Result<Self, GridError>
    where
        F: FnMut(usize, usize) -> bool,
    {
        if width < 0 || height < 0 {
            return Err(GridError::InvalidDimension { width, height });
        }
        let (width, height) = (width as usize, height as usize);

        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| Cell::from(init(x, y)))
            .collect();

        Ok(Self { width, height, cells })
    }

    /// Get grid dimensions
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// True for a grid with zero width or height
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Map signed coordinates to a flat index, rejecting anything off the grid
    fn index(&self, x: i32, y: i32) -> Result<usize, GridError> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(ux), Ok(uy)) if ux < self.width && uy < self.height => Ok(uy * self.width + ux),
            _ => Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            }),
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<bool, GridError> {
        let idx = self.index(x, y)?;
        Ok(self.cells[idx].is_alive())
    }

    pub fn set(&mut self, x: i32, y: i32, alive: bool) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        self.cells[idx] = Cell::from(alive);
        Ok(())
    }

    /// Flip one cell and return its new state
    pub fn toggle(&mut self, x: i32, y: i32) -> Result<bool, GridError> {
        let idx = self.index(x, y)?;
        let cell = self.cells[idx].toggle();
        self.cells[idx] = cell;
        Ok(cell.is_alive())
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::Dead);
    }

    /// Alive cells among the 8 Moore neighbors of `(x, y)`.
    /// Positions past an edge contribute nothing.
    pub fn count_alive_neighbors(&self, x: i32, y: i32) -> Result<u8, GridError> {
        self.index(x, y)?;
        Ok(self.live_neighbors(x as usize, y as usize))
    }

    /// Neighbor count for a position already known to be in bounds
    fn live_neighbors(&self, x: usize, y: usize) -> u8 {
        (-1isize..=1)
            .flat_map(|dy| (-1isize..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(|(dx, dy)| {
                let nx = x.checked_add_signed(dx)?;
                let ny = y.checked_add_signed(dy)?;
                (nx < self.width && ny < self.height).then(|| self.cells[ny * self.width + nx])
            })
            .filter(|cell| cell.is_alive())
            .count() as u8
    }

    /// Advance one generation.
    ///
    /// Every next state is computed from the current snapshot before any
    /// cell is overwritten, so the update is atomic to observers.
    pub fn step(&mut self) {
        let next = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| self.cells[y * self.width + x].evolve(self.live_neighbors(x, y)))
            .collect();
        self.cells = next;
        log::trace!("stepped {}x{} grid", self.width, self.height);
    }

    /// Same result as [`step`](Self::step), with rows evaluated on the rayon pool.
    /// Worth it for grids past roughly 100x100.
    pub fn step_parallel(&mut self) {
        let width = self.width;
        let this = &*self;
        let next: Vec<Cell> = (0..this.height)
            .into_par_iter()
            .flat_map_iter(|y| {
                (0..width).map(move |x| this.cells[y * width + x].evolve(this.live_neighbors(x, y)))
            })
            .collect();
        self.cells = next;
        log::trace!("stepped {}x{} grid in parallel", self.width, self.height);
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Iterate over all cells with their positions, row by row
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (idx % self.width, idx / self.width, cell.is_alive()))
    }

    /// Coordinates of every alive cell in row-major order
    pub fn alive_cells(&self) -> Vec<(usize, usize)> {
        self.iter_cells()
            .filter(|&(_, _, alive)| alive)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Make each cell alive with probability `density` (clamped to 0..=1)
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = Cell::from(rng.random_bool(density)));
    }

    /// Stamp a pattern with its top-left corner at `(x, y)`.
    ///
    /// Nothing is written unless every pattern cell lands inside the grid.
    pub fn place_pattern(&mut self, pattern: &Pattern, x: i32, y: i32) -> Result<(), GridError> {
        let indices = pattern
            .cells
            .iter()
            .map(|&(dx, dy)| self.index(x.saturating_add(dx as i32), y.saturating_add(dy as i32)))
            .collect::<Result<Vec<_>, _>>()?;

        for idx in indices {
            self.cells[idx] = Cell::Alive;
        }
        Ok(())
    }
}

/// One line per row, `#` alive and `.` dead. A zero-width grid still prints
/// `height` empty lines.
impl fmt::Display for AutomatonGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let line: String = self.cells[y * self.width..(y + 1) * self.width]
                .iter()
                .map(|cell| if cell.is_alive() { '#' } else { '.' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presets;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid_with(width: i32, height: i32, alive: &[(i32, i32)]) -> AutomatonGrid {
        let mut grid = AutomatonGrid::new(width, height).unwrap();
        for &(x, y) in alive {
            grid.set(x, y, true).unwrap();
        }
        grid
    }

    fn sorted(mut cells: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_new_grid_is_all_dead() {
        let grid = AutomatonGrid::new(50, 30).unwrap();
        assert_eq!(grid.dimensions(), (50, 30));
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.iter_cells().all(|(_, _, alive)| !alive));
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        assert_eq!(
            AutomatonGrid::new(-1, 4),
            Err(GridError::InvalidDimension { width: -1, height: 4 })
        );
        assert!(AutomatonGrid::new(4, -3).is_err());
    }

    #[test]
    fn test_zero_sized_grid_is_usable() {
        let mut grid = AutomatonGrid::new(0, 5).unwrap();
        assert!(grid.is_empty());
        grid.step();
        grid.step_parallel();
        grid.clear();
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.get(0, 0).is_err());
    }

    #[test]
    fn test_display_keeps_row_count_of_empty_grids() {
        assert_eq!(AutomatonGrid::new(0, 3).unwrap().to_string(), "\n\n\n");
        assert_eq!(AutomatonGrid::new(3, 0).unwrap().to_string(), "");
    }

    #[test]
    fn test_from_fn_initializer() {
        let grid = AutomatonGrid::from_fn(4, 3, |x, y| x == y).unwrap();
        assert_eq!(grid.alive_cells(), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = AutomatonGrid::new(3, 2).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (3, 0), (0, 2), (i32::MIN, i32::MAX)] {
            let expected = GridError::OutOfBounds { x, y, width: 3, height: 2 };
            assert_eq!(grid.get(x, y), Err(expected));
            assert_eq!(grid.set(x, y, true), Err(expected));
            assert_eq!(grid.toggle(x, y), Err(expected));
            assert_eq!(grid.count_alive_neighbors(x, y), Err(expected));
        }
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut grid = grid_with(4, 4, &[(1, 2)]);
        let before = grid.clone();
        for y in 0..4 {
            for x in 0..4 {
                let original = grid.get(x, y).unwrap();
                assert_eq!(grid.toggle(x, y).unwrap(), !original);
                assert_eq!(grid.toggle(x, y).unwrap(), original);
            }
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_kills_everything() {
        let mut grid = AutomatonGrid::from_fn(6, 5, |x, y| (x + y) % 2 == 0).unwrap();
        grid.clear();
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.iter_cells().all(|(_, _, alive)| !alive));
        grid.clear();
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_corner_counts_only_in_bounds_neighbors() {
        let full = AutomatonGrid::from_fn(5, 5, |_, _| true).unwrap();
        assert_eq!(full.count_alive_neighbors(0, 0).unwrap(), 3);
        assert_eq!(full.count_alive_neighbors(4, 4).unwrap(), 3);
        assert_eq!(full.count_alive_neighbors(2, 0).unwrap(), 5);
        assert_eq!(full.count_alive_neighbors(2, 2).unwrap(), 8);

        // Opposite edges are alive but never wrap around to (0, 0)
        let far = grid_with(5, 5, &[(4, 4), (4, 0), (0, 4), (4, 1), (1, 4)]);
        assert_eq!(far.count_alive_neighbors(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_dead_grid_stays_dead() {
        let mut grid = AutomatonGrid::new(10, 10).unwrap();
        grid.step();
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_lonely_cell_dies() {
        let mut grid = grid_with(5, 5, &[(2, 2)]);
        grid.step();
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = grid_with(6, 6, &[(2, 2), (3, 2), (2, 3), (3, 3)]);
        let before = grid.clone();
        grid.step();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_blinker_oscillates_in_tight_grid() {
        let vertical = vec![(1, 0), (1, 1), (1, 2)];
        let horizontal = vec![(0, 1), (1, 1), (2, 1)];
        let mut grid = grid_with(3, 3, &[(1, 0), (1, 1), (1, 2)]);

        grid.step();
        assert_eq!(sorted(grid.alive_cells()), horizontal);
        grid.step();
        assert_eq!(sorted(grid.alive_cells()), vertical);
    }

    #[test]
    fn test_blinker_oscillates_with_padding() {
        let mut grid = grid_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        grid.step();
        assert_eq!(sorted(grid.alive_cells()), vec![(1, 2), (2, 2), (3, 2)]);
        grid.step();
        assert_eq!(sorted(grid.alive_cells()), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_glider_translates_diagonally() {
        let glider = presets::glider();
        let mut grid = AutomatonGrid::new(12, 12).unwrap();
        grid.place_pattern(&glider, 2, 2).unwrap();
        let start = sorted(grid.alive_cells());

        for _ in 0..4 {
            grid.step();
        }

        let shifted: Vec<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        assert_eq!(sorted(grid.alive_cells()), sorted(shifted));
    }

    #[test]
    fn test_lwss_travels_left() {
        let lwss = presets::lwss();
        let mut grid = AutomatonGrid::new(14, 10).unwrap();
        grid.place_pattern(&lwss, 4, 3).unwrap();
        let start = sorted(grid.alive_cells());

        for _ in 0..4 {
            grid.step();
        }

        let shifted: Vec<_> = start.iter().map(|&(x, y)| (x - 2, y)).collect();
        assert_eq!(sorted(grid.alive_cells()), sorted(shifted));
    }

    #[test]
    fn test_parallel_step_matches_serial() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut serial = AutomatonGrid::new(64, 40).unwrap();
        serial.randomize(&mut rng, 0.35);
        let mut parallel = serial.clone();

        for _ in 0..10 {
            serial.step();
            parallel.step_parallel();
            assert_eq!(serial, parallel);
        }
    }

    #[test]
    fn test_randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = AutomatonGrid::new(8, 8).unwrap();
        grid.randomize(&mut rng, 1.5);
        assert_eq!(grid.alive_count(), 64);
        grid.randomize(&mut rng, f64::NAN);
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_place_pattern_out_of_bounds_leaves_grid_untouched() {
        let mut grid = AutomatonGrid::new(5, 5).unwrap();
        let result = grid.place_pattern(&presets::glider(), 3, 3);
        assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn test_display_renders_rows() {
        let grid = grid_with(3, 2, &[(0, 0), (2, 1)]);
        assert_eq!(grid.to_string(), "#..\n..#\n");
    }
}
