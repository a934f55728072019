//! Assembly of an SMPS triple into a two-stage stochastic program.
//!
//! The program is held in the canonical form
//!
//! ```text
//! min  c^T x + E[ q_k^T y ]
//! s.t. A x         = b
//!      T_k x + W_k y = h_k     for every scenario k
//!      x, y >= 0
//! ```
//!
//! where `T_k = T + dT_k`, `W_k = W + dW_k`, `q_k = q + dq_k` and `h_k = h + dh_k`. Inequality
//! rows of the core file receive a slack column in their own stage, appended after the stage's
//! original variables.

use std::collections::{BTreeMap, HashMap};

use faer::Col;
use faer::sparse::{SparseColMat, Triplet};
use log::{debug, info};

use crate::cor::{ColRef, MatrixData, RowRef};
use crate::error::SmpsError;
use crate::scenario::{Scenario, ScenarioSet};
use crate::sto::{Perturbation, StochData};
use crate::tim::TimeSectionData;
use crate::{E, I};

/// Split of the core rows and columns into the two stages, before slack columns are added.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StagePartition {
    pub m1: usize,
    pub n1: usize,
    pub m2: usize,
    pub n2: usize,
}

impl StagePartition {
    /// Locates the second period's first row and column in the core file.
    pub fn new(cor: &MatrixData, tim: &TimeSectionData) -> Result<Self, SmpsError> {
        if tim.get_n_periods() != 2 {
            return Err(SmpsError::NotTwoStage {
                periods: tim.get_n_periods(),
            });
        }

        let row_index = |name: &String| {
            cor.get_row_index(name)
                .ok_or_else(|| SmpsError::UnknownRow { name: name.clone() })
        };
        let col_index = |name: &String| {
            cor.get_col_index(name)
                .ok_or_else(|| SmpsError::UnknownColumn { name: name.clone() })
        };

        let (rows, cols) = (tim.get_rows(), tim.get_cols());
        let (i1, i2) = (row_index(&rows[0])?, row_index(&rows[1])?);
        let (j1, j2) = (col_index(&cols[0])?, col_index(&cols[1])?);

        if i1 != 0 || j1 != 0 {
            return Err(SmpsError::InvalidPartition {
                row: rows[0].clone(),
                col: cols[0].clone(),
            });
        }

        Ok(Self {
            m1: i2,
            n1: j2,
            m2: cor.get_n_rows() - i2,
            n2: cor.get_n_cols() - j2,
        })
    }
}

/// How a constraint row is turned into an equality.
#[derive(Copy, Clone, Debug, PartialEq)]
enum RowSense {
    /// `a x = rhs`
    Equal(E),
    /// `a x + s = rhs`
    LessEqual(E),
    /// `a x - s = rhs`
    GreaterEqual(E),
}

impl RowSense {
    fn from_bounds(lower: E, upper: E) -> Option<Self> {
        if lower == upper {
            Some(Self::Equal(lower))
        } else if lower == -E::INFINITY && upper.is_finite() {
            Some(Self::LessEqual(upper))
        } else if lower.is_finite() && upper == E::INFINITY {
            Some(Self::GreaterEqual(lower))
        } else {
            None
        }
    }

    fn rhs(self) -> E {
        match self {
            Self::Equal(rhs) | Self::LessEqual(rhs) | Self::GreaterEqual(rhs) => rhs,
        }
    }

    fn slack_coefficient(self) -> Option<E> {
        match self {
            Self::Equal(_) => None,
            Self::LessEqual(_) => Some(1.),
            Self::GreaterEqual(_) => Some(-1.),
        }
    }
}

/// Deviation of one scenario from the template data.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct ScenarioDelta {
    probability: E,
    delta_T: SparseColMat<I, E>,
    delta_W: SparseColMat<I, E>,
    /// `(j, value)` cost deviations, sorted by `j`.
    delta_q: Vec<(I, E)>,
    /// `(i, value)` right-hand side deviations, sorted by `i`.
    delta_h: Vec<(I, E)>,
}

#[allow(non_snake_case)]
impl ScenarioDelta {
    pub fn get_probability(&self) -> E {
        self.probability
    }

    pub fn get_delta_T(&self) -> &SparseColMat<I, E> {
        &self.delta_T
    }

    pub fn get_delta_W(&self) -> &SparseColMat<I, E> {
        &self.delta_W
    }

    pub fn get_delta_q(&self) -> &[(I, E)] {
        &self.delta_q
    }

    pub fn get_delta_h(&self) -> &[(I, E)] {
        &self.delta_h
    }
}

/// A two-stage stochastic linear program with finitely many scenarios.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct TwoStageStochasticProgram {
    partition: StagePartition,
    n_slack1: usize,
    n_slack2: usize,
    /// Constant term of the objective.
    c0: E,
    /// First stage costs, zero over the stage one slacks.
    c: Col<E>,
    A: SparseColMat<I, E>,
    b: Col<E>,
    /// Second stage costs, zero over the stage two slacks.
    q: Col<E>,
    T: SparseColMat<I, E>,
    W: SparseColMat<I, E>,
    h: Col<E>,
    scenarios: Vec<ScenarioDelta>,
}

pub trait TryFromSmps {
    fn try_from_smps(
        cor: &MatrixData,
        tim: &TimeSectionData,
        sto: &StochData,
    ) -> Result<Self, SmpsError>
    where
        Self: Sized;
}

fn sparse_from_map(
    nrows: usize,
    ncols: usize,
    entries: &BTreeMap<(I, I), E>,
) -> Result<SparseColMat<I, E>, SmpsError> {
    let triplets = entries
        .iter()
        .map(|(&(i, j), &val)| Triplet::new(i, j, val))
        .collect::<Vec<_>>();
    SparseColMat::try_new_from_triplets(nrows, ncols, triplets.as_slice()).map_err(|e| {
        SmpsError::SparseMatrix {
            message: format!("{e:?}"),
        }
    })
}

/// Template data shared by all scenarios while their deltas are computed.
#[allow(non_snake_case)]
struct Templates<'a> {
    cor: &'a MatrixData,
    partition: StagePartition,
    coefficients: HashMap<(I, I), E>,
    q: &'a Col<E>,
    h: &'a Col<E>,
    n_T: usize,
    n_W: usize,
}

impl Templates<'_> {
    fn scenario_delta(&self, scenario: &Scenario) -> Result<ScenarioDelta, SmpsError> {
        let StagePartition { m1, n1, m2, .. } = self.partition;

        let mut delta_t = BTreeMap::new();
        let mut delta_w = BTreeMap::new();
        let mut delta_q = BTreeMap::new();
        let mut delta_h = BTreeMap::new();

        for entry in scenario.entries() {
            let Perturbation { row, col, value } = entry;
            let first_stage = || SmpsError::FirstStagePerturbation {
                row: row.clone(),
                col: col.clone(),
            };

            let i = self
                .cor
                .resolve_row(row)
                .ok_or_else(|| SmpsError::UnknownRow { name: row.clone() })?;
            let j = self
                .cor
                .resolve_col(col)
                .ok_or_else(|| SmpsError::UnknownColumn { name: col.clone() })?;

            match (i, j) {
                (RowRef::Objective, ColRef::Variable(j)) => {
                    if j < n1 {
                        return Err(first_stage());
                    }
                    *delta_q.entry(j - n1).or_insert(0.) += value - self.q[j - n1];
                }
                (RowRef::Constraint(i), ColRef::Rhs) => {
                    if i < m1 {
                        return Err(first_stage());
                    }
                    *delta_h.entry(i - m1).or_insert(0.) += value - self.h[i - m1];
                }
                (RowRef::Constraint(i), ColRef::Variable(j)) => {
                    if i < m1 {
                        return Err(first_stage());
                    }
                    let template = self.coefficients.get(&(i, j)).copied().unwrap_or(0.);
                    if j < n1 {
                        *delta_t.entry((i - m1, j)).or_insert(0.) += value - template;
                    } else {
                        *delta_w.entry((i - m1, j - n1)).or_insert(0.) += value - template;
                    }
                }
                (RowRef::Objective, ColRef::Rhs) => {
                    return Err(SmpsError::MalformedScenarioEntry {
                        row: row.clone(),
                        col: col.clone(),
                    });
                }
            }
        }

        Ok(ScenarioDelta {
            probability: scenario.probability(),
            delta_T: sparse_from_map(m2, self.n_T, &delta_t)?,
            delta_W: sparse_from_map(m2, self.n_W, &delta_w)?,
            delta_q: delta_q.into_iter().collect(),
            delta_h: delta_h.into_iter().collect(),
        })
    }
}

impl TryFromSmps for TwoStageStochasticProgram {
    #[allow(non_snake_case)]
    fn try_from_smps(
        cor: &MatrixData,
        tim: &TimeSectionData,
        sto: &StochData,
    ) -> Result<Self, SmpsError> {
        let partition = StagePartition::new(cor, tim)?;
        let StagePartition { m1, n1, m2, n2 } = partition;
        debug!("Stage partition: m1 = {m1}, n1 = {n1}, m2 = {m2}, n2 = {n2}");

        // Only nonnegative variables without upper bounds are supported
        for (j, (&l, &u)) in cor
            .get_col_lower()
            .iter()
            .zip(cor.get_col_upper().iter())
            .enumerate()
        {
            if l != 0. || u != E::INFINITY {
                return Err(SmpsError::UnsupportedBounds {
                    name: cor.get_col_name(j).unwrap_or_default().to_string(),
                    lower: l,
                    upper: u,
                });
            }
        }

        let senses = cor
            .get_row_lower()
            .iter()
            .zip(cor.get_row_upper().iter())
            .enumerate()
            .map(|(i, (&l, &u))| {
                RowSense::from_bounds(l, u).ok_or_else(|| SmpsError::UnsupportedRowBounds {
                    name: cor.get_row_name(i).unwrap_or_default().to_string(),
                    lower: l,
                    upper: u,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Slack columns, numbered separately for each stage
        let slack_triplets = |rows: &[RowSense], n_var: usize| {
            rows.iter()
                .enumerate()
                .filter_map(|(i, sense)| sense.slack_coefficient().map(|val| (i, val)))
                .enumerate()
                .map(|(k, (i, val))| ((i, n_var + k), val))
                .collect::<BTreeMap<_, _>>()
        };
        let (senses1, senses2) = senses.split_at(m1);
        let mut a_entries = slack_triplets(senses1, n1);
        let mut w_entries = slack_triplets(senses2, n2);
        let (n_slack1, n_slack2) = (a_entries.len(), w_entries.len());
        debug!("Added {n_slack1} first stage and {n_slack2} second stage slacks");

        let mut coefficients = HashMap::new();
        let mut t_entries = BTreeMap::new();
        for &(i, j, val) in cor.get_entries() {
            *coefficients.entry((i, j)).or_insert(0.) += val;
            let target = match (i < m1, j < n1) {
                (true, true) => a_entries.entry((i, j)),
                (true, false) => {
                    return Err(SmpsError::StageCoupling {
                        row: cor.get_row_name(i).unwrap_or_default().to_string(),
                        col: cor.get_col_name(j).unwrap_or_default().to_string(),
                    });
                }
                (false, true) => t_entries.entry((i - m1, j)),
                (false, false) => w_entries.entry((i - m1, j - n1)),
            };
            *target.or_insert(0.) += val;
        }

        let (n_A, n_W) = (n1 + n_slack1, n2 + n_slack2);
        let objective = cor.get_objective();
        let c = Col::from_fn(n_A, |j| if j < n1 { objective[j] } else { 0. });
        let q = Col::from_fn(n_W, |j| if j < n2 { objective[n1 + j] } else { 0. });
        let b = Col::from_fn(m1, |i| senses1[i].rhs());
        let c0 = cor.get_objective_constant();
        if c0 != 0. {
            debug!("Objective constant {c0}");
        }
        let h = Col::from_fn(m2, |i| senses2[i].rhs());

        let A = sparse_from_map(m1, n_A, &a_entries)?;
        let T = sparse_from_map(m2, n_A, &t_entries)?;
        let W = sparse_from_map(m2, n_W, &w_entries)?;

        let templates = Templates {
            cor,
            partition,
            coefficients,
            q: &q,
            h: &h,
            n_T: n_A,
            n_W,
        };
        let set = ScenarioSet::new(sto);
        let scenarios = set
            .scenarios()
            .iter()
            .map(|scenario| templates.scenario_delta(scenario))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Assembled two-stage program with {} x {} first stage, {} x {} second stage and {} scenarios",
            m1,
            n_A,
            m2,
            n_W,
            scenarios.len()
        );

        Ok(Self {
            partition,
            n_slack1,
            n_slack2,
            c0,
            c,
            A,
            b,
            q,
            T,
            W,
            h,
            scenarios,
        })
    }
}

#[allow(non_snake_case)]
impl TwoStageStochasticProgram {
    /// Returns `(m1, n1, m2, n2)`, including the slack columns.
    pub fn get_dims(&self) -> (usize, usize, usize, usize) {
        (
            self.partition.m1,
            self.partition.n1 + self.n_slack1,
            self.partition.m2,
            self.partition.n2 + self.n_slack2,
        )
    }

    /// Returns the partition of the core rows and columns, without slacks.
    pub fn get_partition(&self) -> StagePartition {
        self.partition
    }

    /// Returns the number of slack columns of each stage.
    pub fn get_n_slacks(&self) -> (usize, usize) {
        (self.n_slack1, self.n_slack2)
    }

    /// Constant term of the objective, carried from an RHS entry on the objective row.
    pub fn get_c0(&self) -> E {
        self.c0
    }

    pub fn get_c(&self) -> &Col<E> {
        &self.c
    }

    pub fn get_A(&self) -> &SparseColMat<I, E> {
        &self.A
    }

    pub fn get_b(&self) -> &Col<E> {
        &self.b
    }

    pub fn get_q(&self) -> &Col<E> {
        &self.q
    }

    pub fn get_T(&self) -> &SparseColMat<I, E> {
        &self.T
    }

    pub fn get_W(&self) -> &SparseColMat<I, E> {
        &self.W
    }

    pub fn get_h(&self) -> &Col<E> {
        &self.h
    }

    pub fn get_scenarios(&self) -> &[ScenarioDelta] {
        &self.scenarios
    }

    pub fn get_n_scenarios(&self) -> usize {
        self.scenarios.len()
    }

    /// Sum of the scenario probabilities.
    pub fn get_total_probability(&self) -> E {
        self.scenarios.iter().map(ScenarioDelta::get_probability).sum()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use faer::Mat;
    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};
    use rstest_reuse::{self, *};

    pub(crate) const CORE: &str = "\
NAME          SIMPLE
ROWS
 N  OBJ
 G  R1
 G  R2
 L  R3
COLUMNS
    X1        OBJ       1.0            R1        1.0
    X1        R2        2.0            R3        -1.0
    Y1        OBJ       3.0            R2        1.0
    Y2        OBJ       4.0            R3        1.0
    Y2        R2        1.0
RHS
    RHS       R1        1.0            R2        4.0
    RHS       R3        5.0
ENDATA
";

    pub(crate) const TIME: &str = "\
TIME          SIMPLE
PERIODS       LP
    X1        R1                       PERIOD1
    Y1        R2                       PERIOD2
ENDATA
";

    pub(crate) const STOCH: &str = "\
STOCH         SIMPLE
INDEP         DISCRETE
    X1        R2        6.0            PERIOD2   0.5
    X1        R2        8.0            PERIOD2   0.5
    RHS       R3        1.0            PERIOD2   0.1
    RHS       R3        2.0            PERIOD2   0.5
    RHS       R3        3.0            PERIOD2   0.4
ENDATA
";

    const BLOCKS: &str = "\
STOCH         SIMPLE
BLOCKS        DISCRETE
 BL BLOCK1    PERIOD2   0.6
    Y1        R2        2.0
    Y2        R3        3.0
 BL BLOCK1    PERIOD2   0.4
    Y1        R2        1.0
    Y2        OBJ       7.0
INDEP         DISCRETE
    RHS       R2        5.0            PERIOD2   1.0
ENDATA
";

    fn assemble(cor: &str, tim: &str, sto: &str) -> Result<TwoStageStochasticProgram, SmpsError> {
        TwoStageStochasticProgram::try_from_smps(
            &MatrixData::parse(cor)?,
            &TimeSectionData::parse(tim)?,
            &StochData::parse(sto)?,
        )
    }

    fn dense(mat: &SparseColMat<I, E>) -> Mat<E> {
        mat.to_dense()
    }

    #[fixture]
    fn simple() -> TwoStageStochasticProgram {
        assemble(CORE, TIME, STOCH).unwrap()
    }

    #[test]
    fn test_partition_covers_core() {
        let cor = MatrixData::parse(CORE).unwrap();
        let tim = TimeSectionData::parse(TIME).unwrap();
        let partition = StagePartition::new(&cor, &tim).unwrap();

        assert_eq!(
            partition,
            StagePartition {
                m1: 1,
                n1: 1,
                m2: 2,
                n2: 2
            }
        );
        assert_eq!(partition.m1 + partition.m2, cor.get_n_rows());
        assert_eq!(partition.n1 + partition.n2, cor.get_n_cols());
    }

    #[rstest]
    fn test_templates(simple: TwoStageStochasticProgram) {
        assert_eq!(simple.get_dims(), (1, 2, 2, 4));
        assert_eq!(simple.get_n_slacks(), (1, 2));

        assert_eq!(simple.get_c0(), 0.);
        assert_eq!(simple.get_c(), &Col::from_fn(2, |j| [1., 0.][j]));
        assert_eq!(simple.get_q(), &Col::from_fn(4, |j| [3., 4., 0., 0.][j]));
        assert_eq!(simple.get_b(), &Col::from_fn(1, |i| [1.][i]));
        assert_eq!(simple.get_h(), &Col::from_fn(2, |i| [4., 5.][i]));

        let a = dense(simple.get_A());
        assert_eq!((a[(0, 0)], a[(0, 1)]), (1., -1.));

        let t = dense(simple.get_T());
        assert_eq!((t.nrows(), t.ncols()), (2, 2));
        assert_eq!([t[(0, 0)], t[(1, 0)], t[(0, 1)], t[(1, 1)]], [2., -1., 0., 0.]);

        let w = dense(simple.get_W());
        let expected = [[1., 1., -1., 0.], [0., 1., 0., 1.]];
        for (i, row) in expected.iter().enumerate() {
            for (j, &val) in row.iter().enumerate() {
                assert_eq!(w[(i, j)], val, "W[{i}, {j}]");
            }
        }
    }

    #[rstest]
    fn test_scenario_probabilities(simple: TwoStageStochasticProgram) {
        let expected = [0.05, 0.25, 0.20, 0.05, 0.25, 0.20];

        assert_eq!(simple.get_n_scenarios(), expected.len());
        for (scenario, p) in simple.get_scenarios().iter().zip(expected) {
            assert_approx_eq!(f64, scenario.get_probability(), p, epsilon = 1e-12);
        }
        assert_approx_eq!(f64, simple.get_total_probability(), 1., epsilon = 1e-12);
    }

    #[rstest]
    fn test_deltas_reconstruct_realizations(simple: TwoStageStochasticProgram) {
        let t = dense(simple.get_T());
        let realized = [(6., 1.), (6., 2.), (6., 3.), (8., 1.), (8., 2.), (8., 3.)];

        for (scenario, (coefficient, rhs)) in simple.get_scenarios().iter().zip(realized) {
            let delta_t = dense(scenario.get_delta_T());
            assert_eq!(t[(0, 0)] + delta_t[(0, 0)], coefficient);
            assert_eq!(delta_t[(1, 0)], 0.);
            assert_eq!(scenario.get_delta_T().compute_nnz(), 1);

            assert_eq!(scenario.get_delta_h(), [(1, rhs - simple.get_h()[1])]);

            assert_eq!(scenario.get_delta_W().compute_nnz(), 0);
            assert!(scenario.get_delta_q().is_empty());
        }
    }

    #[test]
    fn test_block_deltas() {
        let program = assemble(CORE, TIME, BLOCKS).unwrap();
        let w = dense(program.get_W());

        assert_eq!(program.get_n_scenarios(), 2);
        let [first, second] = program.get_scenarios() else {
            panic!("Expected two scenarios");
        };
        assert_approx_eq!(f64, first.get_probability(), 0.6);
        assert_approx_eq!(f64, second.get_probability(), 0.4);

        let delta_w = dense(first.get_delta_W());
        assert_eq!(w[(0, 0)] + delta_w[(0, 0)], 2.);
        assert_eq!(w[(1, 1)] + delta_w[(1, 1)], 3.);
        assert_eq!(first.get_delta_h(), [(0, 1.)]);

        let delta_w = dense(second.get_delta_W());
        assert_eq!(delta_w[(0, 0)], 0.);
        assert_eq!(second.get_delta_q(), [(1, 7. - program.get_q()[1])]);
        assert_eq!(second.get_delta_h(), [(0, 1.)]);
    }

    #[test]
    fn test_equality_rows_have_no_slack() {
        let cor = CORE.replace(" G  R2", " E  R2").replace(" L  R3", " E  R3");
        let program = assemble(&cor, TIME, STOCH).unwrap();

        assert_eq!(program.get_n_slacks(), (1, 0));
        assert_eq!(program.get_dims(), (1, 2, 2, 2));
        assert_eq!(program.get_h(), &Col::from_fn(2, |i| [4., 5.][i]));
    }

    #[test]
    fn test_objective_constant_is_carried() {
        let cor = CORE.replace(
            "    RHS       R3        5.0",
            "    RHS       R3        5.0            OBJ       -2.5",
        );
        let program = assemble(&cor, TIME, STOCH).unwrap();
        assert_eq!(program.get_c0(), 2.5);
        assert_eq!(program.get_b(), &Col::from_fn(1, |i| [1.][i]));
    }

    #[test]
    fn test_touched_deltas_are_kept_when_zero() {
        let sto = "STOCH\nINDEP DISCRETE\n    RHS R3 5.0 P2 1.0\n    Y1 OBJ 3.0 P2 1.0\nENDATA\n";
        let program = assemble(CORE, TIME, sto).unwrap();
        let [scenario] = program.get_scenarios() else {
            panic!("Expected a single scenario");
        };

        assert_eq!(scenario.get_delta_h(), [(1, 0.)]);
        assert_eq!(scenario.get_delta_q(), [(0, 0.)]);
    }

    #[test]
    fn test_no_random_data() {
        let program = assemble(CORE, TIME, "STOCH\nENDATA\n").unwrap();

        assert_eq!(program.get_n_scenarios(), 1);
        assert_eq!(program.get_scenarios()[0].get_probability(), 1.);
        assert_eq!(program.get_scenarios()[0].get_delta_T().compute_nnz(), 0);
    }

    #[template]
    #[rstest]
    #[case::three_periods(CORE.to_string(), "TIME\nPERIODS LP\n    X1 R1\n    Y1 R2\n    Y2 R3\n", STOCH)]
    #[case::late_first_period(CORE.to_string(), "TIME\nPERIODS LP\n    Y1 R2\n    Y2 R3\n", STOCH)]
    #[case::upper_bound(CORE.replace("ENDATA", "BOUNDS\n UP BND Y1 4.0\nENDATA"), TIME, STOCH)]
    #[case::negative_lower_bound(CORE.replace("ENDATA", "BOUNDS\n MI BND X1\nENDATA"), TIME, STOCH)]
    #[case::ranged_row(
        CORE.replace("ENDATA", "RANGES\n    RNG R2 3.0\nENDATA").replace("R2        4.0", "R2        2.0"),
        TIME,
        STOCH
    )]
    #[case::stage_coupling(
        CORE.replace("    Y2        R2        1.0", "    Y2        R1        1.0"),
        TIME,
        STOCH
    )]
    #[case::objective_rhs(CORE.to_string(), TIME, "STOCH\nINDEP DISCRETE\n    RHS OBJ 1.0 P2 1.0\nENDATA\n")]
    #[case::first_stage_rhs(CORE.to_string(), TIME, "STOCH\nINDEP DISCRETE\n    RHS R1 1.0 P2 1.0\nENDATA\n")]
    #[case::first_stage_cost(CORE.to_string(), TIME, "STOCH\nINDEP DISCRETE\n    X1 OBJ 1.0 P2 1.0\nENDATA\n")]
    #[case::unknown_row(CORE.to_string(), TIME, "STOCH\nINDEP DISCRETE\n    X1 R9 1.0 P2 1.0\nENDATA\n")]
    #[case::unknown_column(CORE.to_string(), TIME, "STOCH\nINDEP DISCRETE\n    Z9 R2 1.0 P2 1.0\nENDATA\n")]
    fn rejected_inputs(#[case] cor: String, #[case] tim: &str, #[case] sto: &str) {}

    #[apply(rejected_inputs)]
    fn test_rejected_inputs(#[case] cor: String, #[case] tim: &str, #[case] sto: &str) {
        assert!(assemble(&cor, tim, sto).is_err());
    }

    #[rstest]
    #[case("TIME\nPERIODS LP\n    X1 R1\n", |e: &SmpsError| matches!(e, SmpsError::NotTwoStage { periods: 1 }))]
    #[case("TIME\nPERIODS LP\n    Y1 R1\n    Y2 R2\n", |e: &SmpsError| matches!(e, SmpsError::InvalidPartition { .. }))]
    #[case("TIME\nPERIODS LP\n    X1 R1\n    Y1 R7\n", |e: &SmpsError| matches!(e, SmpsError::UnknownRow { .. }))]
    fn test_partition_errors(#[case] tim: &str, #[case] check: fn(&SmpsError) -> bool) {
        let err = assemble(CORE, tim, STOCH).unwrap_err();
        assert!(check(&err), "unexpected error: {err}");
    }

    #[test]
    fn test_ranged_row_is_reported() {
        let cor = CORE
            .replace("ENDATA", "RANGES\n    RNG R2 3.0\nENDATA")
            .replace("R2        4.0", "R2        2.0");
        let err = assemble(&cor, TIME, STOCH).unwrap_err();
        assert!(matches!(
            err,
            SmpsError::UnsupportedRowBounds { name, lower, upper } if name == "R2" && lower == 2. && upper == 5.
        ));
    }

    #[rstest]
    #[case("    RHS OBJ 1.0 P2 1.0", |e: &SmpsError| matches!(e, SmpsError::MalformedScenarioEntry { .. }))]
    #[case("    RHS R1 1.0 P2 1.0", |e: &SmpsError| matches!(e, SmpsError::FirstStagePerturbation { .. }))]
    #[case("    X1 OBJ 1.0 P2 1.0", |e: &SmpsError| matches!(e, SmpsError::FirstStagePerturbation { .. }))]
    #[case("    X1 R1 1.0 P2 1.0", |e: &SmpsError| matches!(e, SmpsError::FirstStagePerturbation { .. }))]
    fn test_scenario_entry_errors(#[case] entry: &str, #[case] check: fn(&SmpsError) -> bool) {
        let sto = format!("STOCH\nINDEP DISCRETE\n{entry}\nENDATA\n");
        let err = assemble(CORE, TIME, &sto).unwrap_err();
        assert!(check(&err), "unexpected error: {err}");
    }

    #[test]
    fn test_unsupported_bounds_names_variable() {
        let cor = CORE.replace("ENDATA", "BOUNDS\n UP BND Y1 4.0\nENDATA");
        let err = assemble(&cor, TIME, STOCH).unwrap_err();
        assert!(matches!(err, SmpsError::UnsupportedBounds { name, .. } if name == "Y1"));
    }
}
