//! Problem instance representation for the asymmetric TSP.
//!
//! An instance is an immutable n x n cost matrix together with optional
//! location metadata (codes, display names, coordinates) used by the
//! response layer. Self-loops are forbidden by convention: every diagonal
//! entry carries a sentinel cost large enough that no minimizing solver
//! will ever select it.

use serde::{Deserialize, Serialize};

/// A named location of the fixed problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Node index (0-based, node 0 is the tour start)
    pub id: usize,
    /// Short code, e.g. "GGP"
    pub code: String,
    /// Full display name
    pub name: String,
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl Location {
    pub fn new(id: usize, code: &str, name: &str, lat: f64, lng: f64) -> Self {
        Location {
            id,
            code: code.to_string(),
            name: name.to_string(),
            lat,
            lng,
        }
    }
}

/// A complete asymmetric TSP instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Number of nodes
    pub dimension: usize,
    /// Travel costs; `cost_matrix[i][j]` is the cost of edge i -> j.
    /// Diagonal entries hold the self-loop sentinel.
    pub cost_matrix: Vec<Vec<f64>>,
    /// Sentinel cost placed on the diagonal
    pub sentinel: f64,
    /// Location metadata; empty for synthetic instances
    pub locations: Vec<Location>,
}

/// Self-loop sentinel used by the built-in instance.
pub const SELF_LOOP_SENTINEL: f64 = 1_000_000.0;

impl TspInstance {
    /// Build an instance from a cost matrix, validating its invariants:
    /// the matrix must be square with n >= 2, off-diagonal costs must be
    /// finite and non-negative, and every diagonal entry must equal the
    /// sentinel, which in turn must exceed any achievable tour cost.
    pub fn from_matrix(
        name: &str,
        cost_matrix: Vec<Vec<f64>>,
        sentinel: f64,
    ) -> Result<Self, String> {
        let n = cost_matrix.len();
        if n < 2 {
            return Err(format!("instance must have at least 2 nodes, got {}", n));
        }

        let mut max_cost: f64 = 0.0;
        for (i, row) in cost_matrix.iter().enumerate() {
            if row.len() != n {
                return Err(format!(
                    "cost matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                ));
            }
            for (j, &c) in row.iter().enumerate() {
                if i == j {
                    if c != sentinel {
                        return Err(format!(
                            "diagonal entry [{0}][{0}] must hold the sentinel {1}, got {2}",
                            i, sentinel, c
                        ));
                    }
                } else {
                    if !c.is_finite() || c < 0.0 {
                        return Err(format!(
                            "cost [{}][{}] must be finite and non-negative, got {}",
                            i, j, c
                        ));
                    }
                    max_cost = max_cost.max(c);
                }
            }
        }

        // Any tour uses exactly n edges, so this bound guarantees the
        // sentinel is never part of an optimal solution.
        if sentinel <= n as f64 * max_cost {
            return Err(format!(
                "sentinel {} does not dominate the maximum tour cost bound {}",
                sentinel,
                n as f64 * max_cost
            ));
        }

        Ok(TspInstance {
            name: name.to_string(),
            dimension: n,
            cost_matrix,
            sentinel,
            locations: Vec::new(),
        })
    }

    /// The fixed 10-location San Francisco instance with asymmetric
    /// travel-time costs (minutes).
    pub fn san_francisco() -> Self {
        const S: f64 = SELF_LOOP_SENTINEL;
        let cost_matrix = vec![
            vec![S, 37.0, 17.0, 24.0, 27.0, 28.0, 46.0, 27.0, 18.0, 16.0],
            vec![37.0, S, 35.0, 25.0, 45.0, 16.0, 46.0, 28.0, 26.0, 37.0],
            vec![17.0, 35.0, S, 26.0, 12.0, 42.0, 62.0, 24.0, 18.0, 8.0],
            vec![24.0, 25.0, 26.0, S, 22.0, 21.0, 36.0, 7.0, 5.0, 22.0],
            vec![27.0, 45.0, 12.0, 22.0, S, 32.0, 52.0, 16.0, 19.0, 8.0],
            vec![28.0, 16.0, 42.0, 21.0, 32.0, S, 29.0, 20.0, 17.0, 44.0],
            vec![46.0, 46.0, 62.0, 36.0, 52.0, 29.0, S, 40.0, 43.0, 60.0],
            vec![27.0, 28.0, 24.0, 7.0, 16.0, 20.0, 40.0, S, 6.0, 19.0],
            vec![18.0, 26.0, 18.0, 5.0, 19.0, 17.0, 43.0, 6.0, S, 12.0],
            vec![16.0, 37.0, 8.0, 22.0, 8.0, 44.0, 60.0, 19.0, 12.0, S],
        ];

        let mut instance = Self::from_matrix("san-francisco-10", cost_matrix, S)
            .expect("built-in instance data is valid");

        instance.locations = vec![
            Location::new(0, "RH", "Residence Hall (2550 Van Ness)", 37.7992733, -122.4236169),
            Location::new(1, "GGP", "Golden Gate Park", 37.769089891975725, -122.48288044398697),
            Location::new(2, "FW", "Fisherman's Wharf", 37.808554042534496, -122.41569725932902),
            Location::new(3, "YBG", "Yerba Buena Gardens", 37.785115559363426, -122.40223338631426),
            Location::new(4, "EXP", "Exploratorium", 37.80181746236321, -122.39734800350925),
            Location::new(5, "MDP", "Mission Dolores Park", 37.76042200389471, -122.42688173419899),
            Location::new(6, "BH", "Bernal Heights", 37.74348530538466, -122.41361934584009),
            Location::new(7, "SP", "Salesforce Park", 37.78994295860268, -122.39614414583785),
            Location::new(8, "US", "Union Square", 37.78760386789979, -122.40674289238692),
            Location::new(9, "P39", "Pier 39", 37.80884250074092, -122.40990683419665),
        ];

        instance
    }

    /// Get the travel cost of edge i -> j
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.cost_matrix[i][j]
    }

    /// Total cost of a closed tour given as a node sequence (the closing
    /// edge is expected to be explicit, i.e. first node == last node).
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        tour.windows(2).map(|w| self.cost(w[0], w[1])).sum()
    }
}
