/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for neighbour lookups.
 * It buckets agents into cubic cells whose edge equals the perception
 * radius, so every neighbour of an agent lies in its own cell or one of the
 * 26 cells around it.
 *
 * Cells are keyed by integer coordinates in a hash map, so the grid has no
 * fixed world size and agents that overshoot the domain are still found.
 * Candidate lists come back sorted by index, which keeps the floating point
 * summation order identical to a scan over every agent.
 */

use std::collections::HashMap;

use glam::{IVec3, Vec3};

pub struct SpatialGrid {
    pub cell_size: f32,
    cells: HashMap<IVec3, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    // Convert world coordinates to the integer cell coordinates containing them
    #[inline]
    pub fn cell_of(&self, position: Vec3) -> IVec3 {
        (position / self.cell_size).floor().as_ivec3()
    }

    // Drops every cell, so the map only ever holds cells occupied since the
    // last rebuild
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: Vec3) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
    }

    // Rebuild the grid from scratch for a new set of positions
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec3>) {
        self.clear();
        for (index, position) in positions.into_iter().enumerate() {
            self.insert(index, position);
        }
    }

    // Indices in the cell containing `position` and the 26 cells around it,
    // in ascending order
    pub fn get_nearby_indices(&self, position: Vec3) -> Vec<usize> {
        let centre = self.cell_of(position);
        let mut result = Vec::new();

        for z_offset in -1..=1 {
            for y_offset in -1..=1 {
                for x_offset in -1..=1 {
                    let cell = centre + IVec3::new(x_offset, y_offset, z_offset);
                    if let Some(indices) = self.cells.get(&cell) {
                        result.extend_from_slice(indices);
                    }
                }
            }
        }

        result.sort_unstable();
        result
    }
}
