//! Balance rules for assembled boards.
//!
//! Two independent checks decide whether a board is fair to play on:
//! - no cluster of adjacent planets may be larger than `cluster_max_size`
//! - for every home planet type, the nearest pair of that type must lie between
//!   `home_planet_min_reachability` and `home_planet_max_reachability` apart
//!
//! Both checks are pure functions of the board.

use crate::board::{Board, Hex};
use crate::hex::CubeCoord;
use crate::tiles::{ConfigError, PlanetType};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Thresholds for the balance checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRules {
    /// Nearest same-type home planets must be at least this far apart
    pub home_planet_min_reachability: u32,
    /// Nearest same-type home planets must be at most this far apart
    pub home_planet_max_reachability: u32,
    /// Largest allowed connected group of planets
    pub cluster_max_size: usize,
}

impl Default for BalanceRules {
    fn default() -> Self {
        Self {
            home_planet_min_reachability: 2,
            home_planet_max_reachability: 3,
            cluster_max_size: 5,
        }
    }
}

impl BalanceRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.home_planet_min_reachability > self.home_planet_max_reachability {
            return Err(ConfigError::InvalidRules(format!(
                "minimum reachability {} exceeds maximum {}",
                self.home_planet_min_reachability, self.home_planet_max_reachability
            )));
        }
        if self.cluster_max_size == 0 {
            return Err(ConfigError::InvalidRules(
                "cluster size limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a board was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Cluster of {size} planets exceeds the limit of {max}")]
    ClusterTooLarge { size: usize, max: usize },

    #[error("Home planet {planet} has no second instance on the board")]
    UnpairedHomePlanet { planet: PlanetType },

    #[error("Nearest {planet} planets are {distance} apart, more than {max}")]
    HomePlanetTooFar {
        planet: PlanetType,
        distance: u32,
        max: u32,
    },

    #[error("Nearest {planet} planets are {distance} apart, less than {min}")]
    HomePlanetTooClose {
        planet: PlanetType,
        distance: u32,
        min: u32,
    },
}

/// Partition the planets of `board` into groups of adjacent planets.
///
/// Each planet belongs to exactly one cluster.
pub fn clusters(board: &Board) -> Vec<Vec<&Hex>> {
    let mut visited: HashSet<CubeCoord> = HashSet::new();
    let mut clusters = Vec::new();

    for start in board.planets() {
        if !visited.insert(start.coord) {
            continue;
        }

        let mut cluster = vec![start];
        let mut fringe = VecDeque::from([start]);

        while let Some(hex) = fringe.pop_front() {
            for neighbor in board.neighbors(hex) {
                if neighbor.is_planet() && visited.insert(neighbor.coord) {
                    cluster.push(neighbor);
                    fringe.push_back(neighbor);
                }
            }
        }

        clusters.push(cluster);
    }

    clusters
}

/// Size of the largest cluster, 0 on a board without planets
pub fn largest_cluster(board: &Board) -> usize {
    clusters(board).iter().map(Vec::len).max().unwrap_or(0)
}

pub fn check_clusters(board: &Board, rules: &BalanceRules) -> Result<(), Violation> {
    let size = largest_cluster(board);
    if size > rules.cluster_max_size {
        return Err(Violation::ClusterTooLarge {
            size,
            max: rules.cluster_max_size,
        });
    }
    Ok(())
}

/// True when no cluster is larger than the limit. Vacuously true without planets.
pub fn is_balanced_clusters(board: &Board, rules: &BalanceRules) -> bool {
    check_clusters(board, rules).is_ok()
}

/// For each home planet type, the distance between its nearest pair.
///
/// `None` when the type occurs fewer than twice.
pub fn home_planet_min_distances(board: &Board) -> [(PlanetType, Option<u32>); 7] {
    PlanetType::HOME.map(|planet| {
        let cells: Vec<CubeCoord> = board.hexes_of(planet).map(|h| h.coord).collect();
        let nearest = cells
            .iter()
            .flat_map(|a| {
                cells
                    .iter()
                    .filter(move |b| a < *b)
                    .map(move |b| a.distance_to(b))
            })
            .min();
        (planet, nearest)
    })
}

pub fn check_home_planets(board: &Board, rules: &BalanceRules) -> Result<(), Violation> {
    for (planet, nearest) in home_planet_min_distances(board) {
        let distance = nearest.ok_or(Violation::UnpairedHomePlanet { planet })?;
        if distance > rules.home_planet_max_reachability {
            return Err(Violation::HomePlanetTooFar {
                planet,
                distance,
                max: rules.home_planet_max_reachability,
            });
        }
        if distance < rules.home_planet_min_reachability {
            return Err(Violation::HomePlanetTooClose {
                planet,
                distance,
                min: rules.home_planet_min_reachability,
            });
        }
    }
    Ok(())
}

/// True when every home planet type has a nearest pair within the reachability bounds.
pub fn is_balanced_home_planets(board: &Board, rules: &BalanceRules) -> bool {
    check_home_planets(board, rules).is_ok()
}

/// Run both checks, clusters first.
pub fn check(board: &Board, rules: &BalanceRules) -> Result<(), Violation> {
    check_clusters(board, rules)?;
    check_home_planets(board, rules)
}

pub fn is_balanced(board: &Board, rules: &BalanceRules) -> bool {
    check(board, rules).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(q: i32, r: i32, planet: PlanetType) -> Hex {
        Hex {
            coord: CubeCoord::new(q, r),
            planet,
            is_center: false,
            tile_number: 1,
            tile_position_x: 0,
            tile_position_y: 0,
            rotation: 0,
        }
    }

    fn line(len: i32, planet: PlanetType, r: i32) -> Vec<Hex> {
        (0..len).map(|q| cell(q, r, planet)).collect()
    }

    /// Every home type twice, each pair `gap` apart, pairs far from each other.
    fn paired_board(gap: i32) -> Vec<Hex> {
        PlanetType::HOME
            .iter()
            .enumerate()
            .flat_map(|(i, planet)| {
                let q = i as i32 * 10;
                [cell(q, 0, *planet), cell(q + gap, 0, *planet)]
            })
            .collect()
    }

    #[test]
    fn test_run_of_six_is_unbalanced() {
        let board = Board::from_hexes(line(6, PlanetType::Gaia, 0));
        let rules = BalanceRules::default();
        assert!(!is_balanced_clusters(&board, &rules));
        assert_eq!(
            check_clusters(&board, &rules),
            Err(Violation::ClusterTooLarge { size: 6, max: 5 })
        );
    }

    #[test]
    fn test_clusters_of_five_are_balanced() {
        let mut hexes = line(5, PlanetType::Terra, 0);
        // Gap of one empty cell keeps the two runs apart.
        hexes.push(cell(5, 0, PlanetType::Empty));
        hexes.extend((6..11).map(|q| cell(q, 0, PlanetType::Ice)));
        let board = Board::from_hexes(hexes);

        assert!(is_balanced_clusters(&board, &BalanceRules::default()));
        let sizes: Vec<usize> = clusters(&board).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5]);
    }

    #[test]
    fn test_cluster_follows_bends() {
        // An L shape of six mixed planets still counts as one cluster.
        let hexes = vec![
            cell(0, 0, PlanetType::Terra),
            cell(1, 0, PlanetType::Swamp),
            cell(2, 0, PlanetType::Gaia),
            cell(2, 1, PlanetType::Transdim),
            cell(2, 2, PlanetType::Ice),
            cell(1, 3, PlanetType::Oxide),
            cell(5, 5, PlanetType::Empty),
        ];
        let board = Board::from_hexes(hexes);
        assert_eq!(largest_cluster(&board), 6);
        assert!(!is_balanced_clusters(&board, &BalanceRules::default()));
    }

    #[test]
    fn test_no_planets_is_balanced() {
        let board = Board::from_hexes(line(4, PlanetType::Empty, 0));
        assert_eq!(largest_cluster(&board), 0);
        assert!(clusters(&board).is_empty());
        assert!(is_balanced_clusters(&board, &BalanceRules::default()));
    }

    #[test]
    fn test_every_planet_in_exactly_one_cluster() {
        let mut hexes = line(3, PlanetType::Terra, 0);
        hexes.extend(line(2, PlanetType::Desert, 4));
        hexes.push(cell(8, 8, PlanetType::Gaia));
        let board = Board::from_hexes(hexes);

        let all = clusters(&board);
        let total: usize = all.iter().map(Vec::len).sum();
        assert_eq!(total, board.planets().count());
        let unique: HashSet<CubeCoord> = all.iter().flatten().map(|h| h.coord).collect();
        assert_eq!(unique.len(), total);
    }

    #[test]
    fn test_pairs_at_distance_two_are_balanced() {
        let board = Board::from_hexes(paired_board(2));
        for (_, nearest) in home_planet_min_distances(&board) {
            assert_eq!(nearest, Some(2));
        }
        assert!(is_balanced_home_planets(&board, &BalanceRules::default()));
    }

    #[test]
    fn test_pair_at_distance_four_is_unbalanced() {
        let mut hexes = paired_board(2);
        // Push the second titanium out to distance 4.
        let last = hexes.len() - 1;
        hexes[last].coord = hexes[last - 1].coord + CubeCoord::new(4, 0);
        let board = Board::from_hexes(hexes);

        assert!(!is_balanced_home_planets(&board, &BalanceRules::default()));
        assert_eq!(
            check_home_planets(&board, &BalanceRules::default()),
            Err(Violation::HomePlanetTooFar {
                planet: PlanetType::Titanium,
                distance: 4,
                max: 3
            })
        );
    }

    #[test]
    fn test_adjacent_pair_is_too_close() {
        let board = Board::from_hexes(paired_board(1));
        assert_eq!(
            check_home_planets(&board, &BalanceRules::default()),
            Err(Violation::HomePlanetTooClose {
                planet: PlanetType::Terra,
                distance: 1,
                min: 2
            })
        );
    }

    #[test]
    fn test_nearest_pair_wins() {
        // Three terra: the far one does not matter once a close pair exists.
        let mut hexes = paired_board(3);
        hexes.push(cell(-9, 0, PlanetType::Terra));
        let board = Board::from_hexes(hexes);
        assert_eq!(
            home_planet_min_distances(&board)[0],
            (PlanetType::Terra, Some(3))
        );
        assert!(is_balanced_home_planets(&board, &BalanceRules::default()));
    }

    #[test]
    fn test_unpaired_home_planet_is_unbalanced() {
        let hexes: Vec<Hex> = paired_board(2)
            .into_iter()
            .filter(|h| !(h.planet == PlanetType::Oxide && h.coord.q() > 30))
            .collect();
        let board = Board::from_hexes(hexes);

        assert_eq!(board.count_of(PlanetType::Oxide), 1);
        assert_eq!(
            check_home_planets(&board, &BalanceRules::default()),
            Err(Violation::UnpairedHomePlanet {
                planet: PlanetType::Oxide
            })
        );
    }

    #[test]
    fn test_check_reports_clusters_first() {
        let mut hexes = paired_board(9);
        hexes.extend(line(6, PlanetType::Gaia, 20));
        let board = Board::from_hexes(hexes);
        assert!(matches!(
            check(&board, &BalanceRules::default()),
            Err(Violation::ClusterTooLarge { .. })
        ));
        assert!(!is_balanced(&board, &BalanceRules::default()));
    }

    #[test]
    fn test_rules_validation() {
        assert!(BalanceRules::default().validate().is_ok());
        let inverted = BalanceRules {
            home_planet_min_reachability: 4,
            ..BalanceRules::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidRules(_))
        ));
        let zero = BalanceRules {
            cluster_max_size: 0,
            ..BalanceRules::default()
        };
        assert!(zero.validate().is_err());
    }
}
