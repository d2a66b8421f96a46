//! Problem bundle: representation, objective, neighborhood and improver.

use crate::construct::{Construction, RandomConstruction};
use crate::error::{Result, SearchError};
use crate::improve::{Improver, NoImprovement};
use crate::neighborhood::Neighborhood;
use crate::objective::Objective;
use crate::space::SearchSpace;

/// A validated combination of strategies.
///
/// Construction checks that the strategies agree on the problem size, so
/// a search over a built problem cannot hit a dimension error mid-run.
///
/// # Examples
///
/// ```
/// use u_localsearch::neighborhood::TwoOpt;
/// use u_localsearch::objective::Tour;
/// use u_localsearch::search::SearchProblem;
/// use u_localsearch::space::PermutationSpace;
///
/// let tour = Tour::berlin52();
/// let space = PermutationSpace::new(tour.len()).unwrap();
/// let problem = SearchProblem::new(space, tour, TwoOpt);
/// assert!(problem.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SearchProblem<Sp, O, N, I = NoImprovement, C = RandomConstruction> {
    space: Sp,
    objective: O,
    neighborhood: N,
    improver: I,
    construction: C,
}

impl<Sp, O, N> SearchProblem<Sp, O, N>
where
    Sp: SearchSpace,
    O: Objective<Sp::Solution>,
    N: Neighborhood<Sp::Solution>,
{
    pub fn new(space: Sp, objective: O, neighborhood: N) -> Result<Self> {
        let dimension = space.dimension();
        check_minimum(neighborhood.min_dimension(), dimension)?;
        check_fixed(objective.dimension(), dimension)?;
        check_fixed(neighborhood.dimension(), dimension)?;
        Ok(Self {
            space,
            objective,
            neighborhood,
            improver: NoImprovement,
            construction: RandomConstruction,
        })
    }
}

impl<Sp, O, N, I, C> SearchProblem<Sp, O, N, I, C>
where
    Sp: SearchSpace,
    O: Objective<Sp::Solution>,
    N: Neighborhood<Sp::Solution>,
    I: Improver<Sp::Solution>,
    C: Construction<Sp>,
{
    /// Attaches a local improver applied to every proposal.
    pub fn with_improver<J>(self, improver: J) -> Result<SearchProblem<Sp, O, N, J, C>>
    where
        J: Improver<Sp::Solution>,
    {
        let dimension = self.space.dimension();
        check_minimum(improver.min_dimension(), dimension)?;
        check_fixed(improver.dimension(), dimension)?;
        Ok(SearchProblem {
            space: self.space,
            objective: self.objective,
            neighborhood: self.neighborhood,
            improver,
            construction: self.construction,
        })
    }

    /// Replaces the uniform initial draw.
    pub fn with_construction<D>(self, construction: D) -> Result<SearchProblem<Sp, O, N, I, D>>
    where
        D: Construction<Sp>,
    {
        check_fixed(construction.dimension(), self.space.dimension())?;
        Ok(SearchProblem {
            space: self.space,
            objective: self.objective,
            neighborhood: self.neighborhood,
            improver: self.improver,
            construction,
        })
    }

    pub fn space(&self) -> &Sp {
        &self.space
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn neighborhood(&self) -> &N {
        &self.neighborhood
    }

    pub fn improver(&self) -> &I {
        &self.improver
    }

    pub fn construction(&self) -> &C {
        &self.construction
    }
}

fn check_minimum(required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(SearchError::DimensionTooSmall { required, actual });
    }
    Ok(())
}

fn check_fixed(expected: Option<usize>, actual: usize) -> Result<()> {
    match expected {
        Some(expected) if expected != actual => {
            Err(SearchError::DimensionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}
