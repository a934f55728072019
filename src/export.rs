//! Serialization of an assembled program as a three-node scenario lattice.
//!
//! The lattice has a root node carrying the initial state, a first stage node with the
//! deterministic data and a second stage node with the template data and the per-scenario
//! deviations. Each perturbed position is exported as a named random variable (`dT[i,j]`,
//! `dW[i,j]`, `dq[j]` or `dh[i]`), and every realization assigns a value to all of them.

use std::collections::{BTreeMap, BTreeSet};

use faer::Col;
use faer::sparse::SparseColMat;
use serde::Serialize;

use crate::tssp::{ScenarioDelta, TwoStageStochasticProgram};
use crate::{E, I};

/// A nonzero `(row, col, value)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate(pub I, pub I, pub E);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealizationRecord {
    pub probability: E,
    pub values: BTreeMap<String, E>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Root {
        stage: usize,
        initial_state: Vec<E>,
    },
    FirstStage {
        stage: usize,
        c0: E,
        c: Vec<E>,
        #[serde(rename = "A")]
        a: Vec<Coordinate>,
        b: Vec<E>,
        state_variables: Vec<I>,
    },
    SecondStage {
        stage: usize,
        q: Vec<E>,
        #[serde(rename = "T")]
        t: Vec<Coordinate>,
        #[serde(rename = "W")]
        w: Vec<Coordinate>,
        h: Vec<E>,
        random_variables: Vec<String>,
        realizations: Vec<RealizationRecord>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub probability: E,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioLattice {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

fn coordinates(mat: &SparseColMat<I, E>) -> Vec<Coordinate> {
    let col_ptr = mat.symbolic().col_ptr();
    let row_idx = mat.symbolic().row_idx();
    let vals = mat.val();

    (0..mat.ncols())
        .flat_map(|j| (col_ptr[j]..col_ptr[j + 1]).map(move |k| (j, k)))
        .map(|(j, k)| Coordinate(row_idx[k], j, vals[k]))
        .collect()
}

fn to_vec(col: &Col<E>) -> Vec<E> {
    col.iter().copied().collect()
}

/// Named deviations of one scenario, including touched entries whose deviation is zero.
fn deviations(delta: &ScenarioDelta) -> BTreeMap<String, E> {
    let mut values = BTreeMap::new();
    for Coordinate(i, j, val) in coordinates(delta.get_delta_T()) {
        values.insert(format!("dT[{i},{j}]"), val);
    }
    for Coordinate(i, j, val) in coordinates(delta.get_delta_W()) {
        values.insert(format!("dW[{i},{j}]"), val);
    }
    for &(j, val) in delta.get_delta_q() {
        values.insert(format!("dq[{j}]"), val);
    }
    for &(i, val) in delta.get_delta_h() {
        values.insert(format!("dh[{i}]"), val);
    }
    values
}

impl From<&TwoStageStochasticProgram> for ScenarioLattice {
    fn from(program: &TwoStageStochasticProgram) -> Self {
        let (_, n1, _, _) = program.get_dims();

        let per_scenario = program
            .get_scenarios()
            .iter()
            .map(|delta| (delta.get_probability(), deviations(delta)))
            .collect::<Vec<_>>();

        let random_variables = per_scenario
            .iter()
            .flat_map(|(_, values)| values.keys().cloned())
            .collect::<BTreeSet<_>>();

        let realizations = per_scenario
            .into_iter()
            .map(|(probability, values)| RealizationRecord {
                probability,
                values: random_variables
                    .iter()
                    .map(|name| (name.clone(), values.get(name).copied().unwrap_or(0.)))
                    .collect(),
            })
            .collect();

        let nodes = vec![
            Node::Root {
                stage: 0,
                initial_state: vec![0.; n1],
            },
            Node::FirstStage {
                stage: 1,
                c0: program.get_c0(),
                c: to_vec(program.get_c()),
                a: coordinates(program.get_A()),
                b: to_vec(program.get_b()),
                state_variables: (0..n1).collect(),
            },
            Node::SecondStage {
                stage: 2,
                q: to_vec(program.get_q()),
                t: coordinates(program.get_T()),
                w: coordinates(program.get_W()),
                h: to_vec(program.get_h()),
                random_variables: random_variables.into_iter().collect(),
                realizations,
            },
        ];

        let edges = vec![
            Edge {
                from: 0,
                to: 1,
                probability: 1.,
            },
            Edge {
                from: 1,
                to: 2,
                probability: 1.,
            },
        ];

        Self { nodes, edges }
    }
}

impl ScenarioLattice {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json<W: std::io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}
