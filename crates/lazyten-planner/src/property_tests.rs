//! Property-based tests for the planner
//!
//! These tests use `proptest` to generate random chain and star networks and
//! verify that every planner produces well-formed, deterministic plans.

#[cfg(test)]
mod tests {
    use crate::{
        greedy_planner, optimal_planner, ContractionSpec, Plan, PlanHints, Planner, PlannerKind,
    };
    use proptest::prelude::*;

    /// Matrix chain `d0 d1, d1 d2, ... -> d0 dn` over the given boundary sizes
    fn chain(sizes: &[usize]) -> (ContractionSpec, Vec<Vec<usize>>) {
        let n = sizes.len() - 1;
        let dim = |k: usize| format!("d{}", k);
        let inputs = (0..n).map(|k| vec![dim(k), dim(k + 1)]).collect();
        let shapes = (0..n).map(|k| vec![sizes[k], sizes[k + 1]]).collect();
        let spec = ContractionSpec::new(inputs, vec![dim(0), dim(n)]).unwrap();
        (spec, shapes)
    }

    fn assert_well_formed(plan: &Plan, spec: &ContractionSpec) -> Result<(), TestCaseError> {
        prop_assert!(plan.validate(spec.num_inputs()).is_ok());
        prop_assert_eq!(plan.num_steps(), spec.num_inputs() - 1);
        if let Some(last) = plan.nodes.last() {
            let mut kept = last.output_dims.clone();
            kept.sort();
            let mut wanted = spec.output.clone();
            wanted.sort();
            prop_assert_eq!(kept, wanted);
        }
        Ok(())
    }

    proptest! {
        /// Greedy plans are well formed and keep exactly the output dims
        #[test]
        fn prop_greedy_well_formed(sizes in prop::collection::vec(1usize..=12, 2..=8)) {
            let (spec, shapes) = chain(&sizes);
            let plan = greedy_planner(&spec, &shapes, &PlanHints::default()).unwrap();
            assert_well_formed(&plan, &spec)?;
        }

        /// The exhaustive planner never loses to greedy
        #[test]
        fn prop_optimal_never_worse(sizes in prop::collection::vec(1usize..=12, 3..=7)) {
            let (spec, shapes) = chain(&sizes);
            let hints = PlanHints::default();
            let greedy = greedy_planner(&spec, &shapes, &hints).unwrap();
            let optimal = optimal_planner(&spec, &shapes, &hints).unwrap();
            assert_well_formed(&optimal, &spec)?;
            prop_assert!(optimal.estimated_flops <= greedy.estimated_flops);
        }

        /// Planning the same network twice gives the same plan
        #[test]
        fn prop_planning_is_deterministic(
            sizes in prop::collection::vec(1usize..=12, 2..=6),
            optimal in any::<bool>(),
        ) {
            let (spec, shapes) = chain(&sizes);
            let kind = if optimal { PlannerKind::Optimal } else { PlannerKind::Greedy };
            let first = kind.make_plan(&spec, &shapes, &PlanHints::default()).unwrap();
            let second = kind.make_plan(&spec, &shapes, &PlanHints::default()).unwrap();
            prop_assert_eq!(first, second);
        }

        /// A dim shared by every operand survives until the last step
        #[test]
        fn prop_star_hub_survives(n in 3usize..=8, hub in 1usize..=6, leaf in 1usize..=6) {
            let inputs: Vec<Vec<String>> =
                (0..n).map(|k| vec!["hub".to_string(), format!("leaf{}", k)]).collect();
            let shapes = vec![vec![hub, leaf]; n];
            let spec = ContractionSpec::new(inputs, vec![]).unwrap();
            let plan = greedy_planner(&spec, &shapes, &PlanHints::default()).unwrap();
            assert_well_formed(&plan, &spec)?;
            for node in &plan.nodes[..plan.nodes.len() - 1] {
                prop_assert!(node.output_dims.contains(&"hub".to_string()));
            }
        }
    }
}
