//! Euclidean travelling-salesman tours.

use super::Objective;
use crate::error::{Result, SearchError};

/// A city in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Closed-tour length objective over a fixed list of cities.
///
/// A solution is a permutation of city indices; its cost is the sum of
/// Euclidean distances between consecutive cities plus the edge back to
/// the start.
///
/// # Examples
///
/// ```
/// use u_localsearch::objective::{Objective, Point, Tour};
///
/// let square = Tour::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ])
/// .unwrap();
/// assert!((square.evaluate(&vec![0, 1, 2, 3]) - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    cities: Vec<Point>,
}

impl Tour {
    pub fn new(cities: Vec<Point>) -> Result<Self> {
        if cities.is_empty() {
            return Err(SearchError::EmptySpace);
        }
        Ok(Self { cities })
    }

    /// The 52-city Berlin instance from TSPLIB (optimal tour length 7542).
    pub fn berlin52() -> Self {
        Self {
            cities: BERLIN52.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    /// A smaller instance made of the first `n` cities.
    pub fn prefix(&self, n: usize) -> Result<Self> {
        Self::new(self.cities.iter().take(n).copied().collect())
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Distance between two cities by index.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.cities[a].distance(&self.cities[b])
    }
}

impl Objective<Vec<usize>> for Tour {
    fn evaluate(&self, perm: &Vec<usize>) -> f64 {
        let n = perm.len();
        (0..n)
            .map(|i| self.distance(perm[i], perm[(i + 1) % n]))
            .sum()
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.cities.len())
    }
}

const BERLIN52: [(f64, f64); 52] = [
    (565.0, 575.0),
    (25.0, 185.0),
    (345.0, 750.0),
    (945.0, 685.0),
    (845.0, 655.0),
    (880.0, 660.0),
    (25.0, 230.0),
    (525.0, 1000.0),
    (580.0, 1175.0),
    (650.0, 1130.0),
    (1605.0, 620.0),
    (1220.0, 580.0),
    (1465.0, 200.0),
    (1530.0, 5.0),
    (845.0, 680.0),
    (725.0, 370.0),
    (145.0, 665.0),
    (415.0, 635.0),
    (510.0, 875.0),
    (560.0, 365.0),
    (300.0, 465.0),
    (520.0, 585.0),
    (480.0, 415.0),
    (835.0, 625.0),
    (975.0, 580.0),
    (1215.0, 245.0),
    (1320.0, 315.0),
    (1250.0, 400.0),
    (660.0, 180.0),
    (410.0, 250.0),
    (420.0, 555.0),
    (575.0, 665.0),
    (1150.0, 1160.0),
    (700.0, 580.0),
    (685.0, 595.0),
    (685.0, 610.0),
    (770.0, 610.0),
    (795.0, 645.0),
    (720.0, 635.0),
    (760.0, 650.0),
    (475.0, 960.0),
    (95.0, 260.0),
    (875.0, 920.0),
    (700.0, 500.0),
    (555.0, 815.0),
    (830.0, 485.0),
    (1170.0, 65.0),
    (830.0, 610.0),
    (605.0, 625.0),
    (595.0, 360.0),
    (1340.0, 725.0),
    (1740.0, 245.0),
];
