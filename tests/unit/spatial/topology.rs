//! Tests for masked topologies

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use tilecore::spatial::grid::{SquareGrid, X_MINUS, X_PLUS, Y_PLUS};
    use tilecore::spatial::topology::MaskedTopology;

    // Tests an unmasked topology mirrors the grid
    // Verified by starting the active set empty
    #[test]
    fn test_unmasked_topology() {
        let grid = SquareGrid::new(3, 2);
        let topology = MaskedTopology::new(&grid, &BTreeSet::new());
        assert_eq!(topology.cell_count(), 6);
        assert_eq!(topology.active_count(), 6);
        assert_eq!(topology.direction_count(), 4);
        assert_eq!(topology.neighbor(0, X_PLUS), Some(1));
        assert_eq!(topology.neighbor(0, Y_PLUS), Some(3));
        assert_eq!(topology.inverse(X_PLUS), X_MINUS);
    }

    // Tests masked cells lose their neighbours but are not grid edges
    // Verified by treating masked neighbours as grid edges
    #[test]
    fn test_masked_cells_are_not_grid_edges() {
        let grid = SquareGrid::new(3, 1);
        let excluded: BTreeSet<usize> = [1, 99].into_iter().collect();
        let topology = MaskedTopology::new(&grid, &excluded);

        assert_eq!(topology.active_count(), 2);
        assert!(!topology.contains(1));
        assert!(!topology.contains(99));
        assert_eq!(topology.neighbor(0, X_PLUS), None);
        assert_eq!(topology.grid_neighbor(0, X_PLUS), Some(1));
        assert!(!topology.is_grid_edge(0, X_PLUS));
        assert!(topology.is_grid_edge(0, X_MINUS));
        assert_eq!(topology.active_cells().collect::<Vec<_>>(), vec![0, 2]);
    }

    // Tests periodic grids have no edges at all
    // Verified by ignoring the periodic flag when caching neighbours
    #[test]
    fn test_periodic_topology_has_no_edges() {
        let grid = SquareGrid::periodic(2, 2);
        let topology = MaskedTopology::new(&grid, &BTreeSet::new());
        for cell in 0..4 {
            assert!(!topology.is_grid_edge(cell, X_MINUS));
        }
        assert_eq!(topology.neighbor(0, X_MINUS), Some(1));
    }
}
