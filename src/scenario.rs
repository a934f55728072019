//! Enumeration of the scenarios of a `.sto` file.
//!
//! Every discrete random element (an `INDEP DISCRETE` entry or a `BLOCKS DISCRETE` block) has a
//! finite list of realizations. A scenario picks one realization from each element, so the
//! scenario set is their Cartesian product, with the last declared element varying fastest.
//! Uniform and normal entries have no finite support and are left out of the product.

use itertools::Itertools;
use log::warn;

use crate::E;
use crate::sto::{Perturbation, RandomVariable, RandomVector, StochData};

/// The entries a random element fixes under one outcome, and that outcome's probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    pub entries: Vec<Perturbation>,
    pub probability: E,
}

impl RandomVariable {
    /// Lists the outcomes of a discrete variable, or `None` for continuous distributions.
    pub fn realizations(&self) -> Option<Vec<Realization>> {
        match self {
            Self::ScalarDiscrete {
                row,
                col,
                support,
                probability,
            } => Some(
                support
                    .iter()
                    .zip(probability)
                    .map(|(&value, &probability)| Realization {
                        entries: vec![Perturbation::new(row, col, value)],
                        probability,
                    })
                    .collect(),
            ),
            Self::ScalarUniform { .. } | Self::ScalarNormal { .. } => None,
        }
    }
}

impl RandomVector {
    pub fn realizations(&self) -> Vec<Realization> {
        match self {
            Self::BlockDiscrete {
                support,
                probability,
                ..
            } => support
                .iter()
                .zip(probability)
                .map(|(entries, &probability)| Realization {
                    entries: entries.clone(),
                    probability,
                })
                .collect(),
        }
    }
}

/// One joint outcome: a realization of every discrete random element.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario<'a> {
    realizations: Vec<&'a Realization>,
}

impl<'a> Scenario<'a> {
    /// Product of the probabilities of the constituent realizations.
    pub fn probability(&self) -> E {
        self.realizations.iter().map(|r| r.probability).product()
    }

    /// All perturbed entries, in declaration order of their random elements.
    pub fn entries(&self) -> impl Iterator<Item = &'a Perturbation> + '_ {
        self.realizations.iter().flat_map(|&r| r.entries.iter())
    }

    pub fn get_realizations(&self) -> &[&'a Realization] {
        &self.realizations
    }
}

/// The realizations of every discrete random element of a `.sto` file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioSet {
    elements: Vec<Vec<Realization>>,
}

impl ScenarioSet {
    /// Collects the independent entries followed by the blocks, in file order.
    pub fn new(sto: &StochData) -> Self {
        let mut elements = Vec::new();

        for variable in sto.get_indeps() {
            match variable.realizations() {
                Some(realizations) => elements.push(realizations),
                None => {
                    let (row, col) = variable.key();
                    warn!(
                        "Continuous random entry at row `{row}` and column `{col}` is not \
                         discretized and is left out of the scenarios"
                    );
                }
            }
        }
        elements.extend(sto.get_blocks().iter().map(RandomVector::realizations));

        Self { elements }
    }

    pub fn get_elements(&self) -> &[Vec<Realization>] {
        &self.elements
    }

    /// Number of scenarios, the product of the per-element realization counts.
    pub fn len(&self) -> usize {
        self.elements.iter().map(Vec::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates the full Cartesian product of realizations.
    pub fn scenarios(&self) -> Vec<Scenario<'_>> {
        if self.elements.is_empty() {
            return vec![Scenario {
                realizations: Vec::new(),
            }];
        }

        self.elements
            .iter()
            .map(|element| 0..element.len())
            .multi_cartesian_product()
            .map(|choice| Scenario {
                realizations: choice
                    .into_iter()
                    .zip(&self.elements)
                    .map(|(k, element)| &element[k])
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn two_indeps() -> StochData {
        StochData::new(
            "SIMPLE".to_string(),
            vec![
                RandomVariable::ScalarDiscrete {
                    row: "R1".to_string(),
                    col: "C1".to_string(),
                    support: vec![6., 8.],
                    probability: vec![0.5, 0.5],
                },
                RandomVariable::ScalarDiscrete {
                    row: "R2".to_string(),
                    col: "C2".to_string(),
                    support: vec![1., 2., 3.],
                    probability: vec![0.1, 0.5, 0.4],
                },
            ],
            Vec::new(),
        )
    }

    #[rstest]
    fn test_cross_product_order(two_indeps: StochData) {
        let set = ScenarioSet::new(&two_indeps);
        let scenarios = set.scenarios();

        assert_eq!(set.len(), 6);
        assert_eq!(scenarios.len(), 6);

        let expected = [0.05, 0.25, 0.20, 0.05, 0.25, 0.20];
        for (scenario, p) in scenarios.iter().zip(expected) {
            assert_approx_eq!(f64, scenario.probability(), p, epsilon = 1e-12);
        }

        let values: Vec<(E, E)> = scenarios
            .iter()
            .map(|s| {
                let entries: Vec<_> = s.entries().collect();
                (entries[0].value, entries[1].value)
            })
            .collect();
        assert_eq!(
            values,
            [(6., 1.), (6., 2.), (6., 3.), (8., 1.), (8., 2.), (8., 3.)]
        );
    }

    #[rstest]
    fn test_probability_mass_factorizes(two_indeps: StochData) {
        let set = ScenarioSet::new(&two_indeps);
        let total: E = set.scenarios().iter().map(Scenario::probability).sum();
        assert_approx_eq!(f64, total, 1., epsilon = 1e-12);
    }

    #[test]
    fn test_blocks_follow_indeps() {
        let sto = StochData::new(
            String::new(),
            vec![RandomVariable::ScalarDiscrete {
                row: "R1".to_string(),
                col: "RHS".to_string(),
                support: vec![1., 2.],
                probability: vec![0.4, 0.4],
            }],
            vec![RandomVector::BlockDiscrete {
                name: "B".to_string(),
                support: vec![
                    vec![Perturbation::new("R2", "Y", 1.), Perturbation::new("R3", "Y", 2.)],
                    vec![Perturbation::new("R2", "Y", 3.)],
                    vec![],
                ],
                probability: vec![0.2, 0.3, 0.5],
            }],
        );
        let set = ScenarioSet::new(&sto);
        let scenarios = set.scenarios();

        assert_eq!(scenarios.len(), 6);
        assert_eq!(scenarios[0].get_realizations().len(), 2);
        assert_eq!(scenarios[0].get_realizations()[1].probability, 0.2);
        assert_eq!(scenarios[0].entries().count(), 3);
        assert_eq!(scenarios[1].entries().count(), 2);
        assert_eq!(scenarios[2].entries().count(), 1);

        // Input probabilities do not sum to one and are kept as given.
        let total: E = scenarios.iter().map(Scenario::probability).sum();
        assert_approx_eq!(f64, total, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_entries_are_skipped() {
        let sto = StochData::new(
            String::new(),
            vec![
                RandomVariable::ScalarNormal {
                    row: "R1".to_string(),
                    col: "RHS".to_string(),
                    mean: 0.,
                    variance: 1.,
                },
                RandomVariable::ScalarDiscrete {
                    row: "R2".to_string(),
                    col: "RHS".to_string(),
                    support: vec![1., 2.],
                    probability: vec![0.5, 0.5],
                },
                RandomVariable::ScalarUniform {
                    row: "R3".to_string(),
                    col: "RHS".to_string(),
                    lower: 0.,
                    upper: 1.,
                },
            ],
            Vec::new(),
        );
        let set = ScenarioSet::new(&sto);
        assert_eq!(set.get_elements().len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_no_random_elements_yields_single_scenario() {
        let set = ScenarioSet::new(&StochData::default());
        let scenarios = set.scenarios();

        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].probability(), 1.);
        assert_eq!(scenarios[0].entries().count(), 0);
    }

    #[test]
    fn test_block_without_realizations_empties_the_set() {
        let sto = StochData::new(
            String::new(),
            Vec::new(),
            vec![RandomVector::BlockDiscrete {
                name: "B".to_string(),
                support: Vec::new(),
                probability: Vec::new(),
            }],
        );
        let set = ScenarioSet::new(&sto);

        assert!(set.is_empty());
        assert!(set.scenarios().is_empty());
    }
}
