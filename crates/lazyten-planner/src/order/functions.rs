//! Contraction order search

use crate::api::{Plan, PlanHints, PlanNode};
use crate::cost::{element_count, pairwise_flops, BYTES_PER_ELEMENT};
use crate::parser::{dim_sizes, ContractionSpec};
use anyhow::{anyhow, bail, Result};
use lazyten_core::Dim;

use super::types::IntermediateTensor;

/// Largest network the optimal planner searches exhaustively
pub const MAX_OPTIMAL_INPUTS: usize = 12;

/// Dims of `a` followed by the dims of `b` not in `a`
fn union_dims<'a>(a: &'a [Dim], b: &'a [Dim]) -> Vec<&'a Dim> {
    let mut all: Vec<&Dim> = a.iter().collect();
    all.extend(b.iter().filter(|d| !a.contains(d)));
    all
}

/// Dims a pairwise result must keep: those in the final output or carried by
/// any other live intermediate
fn kept_dims(live: &[IntermediateTensor], i: usize, j: usize, output: &[Dim]) -> Vec<Dim> {
    union_dims(&live[i].dims, &live[j].dims)
        .into_iter()
        .filter(|d| {
            output.contains(d)
                || live
                    .iter()
                    .enumerate()
                    .any(|(k, t)| k != i && k != j && t.dims.contains(d))
        })
        .cloned()
        .collect()
}

struct Candidate {
    key: (f64, f64),
    lhs: usize,
    rhs: usize,
    kept: Vec<Dim>,
    flops: f64,
    memory: usize,
}

/// Greedy contraction order planner
///
/// Repeatedly contracts the pair of tensors with minimum cost until only one remains.
///
/// # Algorithm
///
/// 1. Start with all input tensors
/// 2. Estimate cost for every pair of live tensors
/// 3. Contract the pair with minimum cost; ties go to the smaller result,
///    then to the lowest positions
/// 4. Repeat until only one tensor remains
///
/// With `hints.minimize_memory` the result size is compared before FLOPs.
///
/// # Complexity
///
/// O(n^3) where n is the number of inputs (n-1 steps, each checking O(n^2) pairs)
pub fn greedy_planner(
    spec: &ContractionSpec,
    shapes: &[Vec<usize>],
    hints: &PlanHints,
) -> Result<Plan> {
    if spec.num_inputs() == 0 {
        bail!("Cannot plan a contraction with no inputs");
    }
    let dim_map = dim_sizes(spec, shapes)?;

    let mut live: Vec<IntermediateTensor> = spec
        .inputs
        .iter()
        .cloned()
        .map(IntermediateTensor::new)
        .collect();
    let mut plan = Plan::new();

    while live.len() > 1 {
        let mut best: Option<Candidate> = None;
        for i in 0..live.len() {
            for j in (i + 1)..live.len() {
                let kept = kept_dims(&live, i, j, &spec.output);
                let flops = pairwise_flops(union_dims(&live[i].dims, &live[j].dims), &dim_map)?;
                let memory = element_count(&kept, &dim_map)?.saturating_mul(BYTES_PER_ELEMENT);
                let key = if hints.minimize_memory {
                    (memory as f64, flops)
                } else {
                    (flops, memory as f64)
                };
                if best.as_ref().map_or(true, |b| key < b.key) {
                    best = Some(Candidate {
                        key,
                        lhs: i,
                        rhs: j,
                        kept,
                        flops,
                        memory,
                    });
                }
            }
        }

        let chosen = best.ok_or_else(|| anyhow!("No valid contraction found"))?;
        log::debug!(
            "greedy: contract #{} ({:?}) with #{} ({:?}) -> {:?}, {:.2e} FLOPs",
            chosen.lhs,
            live[chosen.lhs].dims,
            chosen.rhs,
            live[chosen.rhs].dims,
            chosen.kept,
            chosen.flops
        );

        plan.push(PlanNode {
            lhs: chosen.lhs,
            rhs: chosen.rhs,
            lhs_dims: live[chosen.lhs].dims.clone(),
            rhs_dims: live[chosen.rhs].dims.clone(),
            output_dims: chosen.kept.clone(),
            cost: chosen.flops,
            memory: chosen.memory,
        });
        live.remove(chosen.rhs);
        live.remove(chosen.lhs);
        live.push(IntermediateTensor::new(chosen.kept));
    }

    hints.check_budget(&plan)?;
    Ok(plan)
}

/// Exhaustive planner for the cheapest contraction tree
///
/// Uses bitmask dynamic programming over subsets of the inputs.
///
/// # Algorithm
///
/// For each subset S of tensors (as a bitmask), in increasing order:
/// 1. Try every split of S into two non-empty halves S1 (holding S's lowest
///    input) and S2
/// 2. Cost(S) = min over splits of Cost(S1) + Cost(S2) + cost(contract(S1, S2))
/// 3. Backtrack from the full set to reconstruct the step sequence
///
/// # Complexity
///
/// O(3^n) time, O(2^n) space where n is number of inputs
///
/// # Fallback
///
/// Falls back to the greedy planner if n > [`MAX_OPTIMAL_INPUTS`]
pub fn optimal_planner(
    spec: &ContractionSpec,
    shapes: &[Vec<usize>],
    hints: &PlanHints,
) -> Result<Plan> {
    let n = spec.num_inputs();
    if n > MAX_OPTIMAL_INPUTS {
        log::warn!(
            "optimal planner: too many inputs ({}), falling back to greedy",
            n
        );
        return greedy_planner(spec, shapes, hints);
    }
    if n <= 2 {
        // Zero or one possible order
        return greedy_planner(spec, shapes, hints);
    }
    let dim_map = dim_sizes(spec, shapes)?;

    let mut universe: Vec<&Dim> = Vec::new();
    for d in spec.inputs.iter().flatten() {
        if !universe.contains(&d) {
            universe.push(d);
        }
    }
    let full: u32 = (1u32 << n) - 1;
    let holders: Vec<u32> = universe
        .iter()
        .map(|d| {
            spec.inputs
                .iter()
                .enumerate()
                .filter(|(_, dims)| dims.contains(*d))
                .fold(0u32, |acc, (i, _)| acc | (1u32 << i))
        })
        .collect();
    let in_output: Vec<bool> = universe.iter().map(|d| spec.output.contains(*d)).collect();

    // Dims carried by the tensor that results from contracting a subset
    let dims_of = |mask: u32| -> Vec<Dim> {
        if mask.count_ones() == 1 {
            return spec.inputs[mask.trailing_zeros() as usize].clone();
        }
        (0..universe.len())
            .filter(|&k| {
                holders[k] & mask != 0 && (in_output[k] || holders[k] & !mask & full != 0)
            })
            .map(|k| universe[k].clone())
            .collect()
    };
    let carried: Vec<Vec<Dim>> = (0..=full).map(dims_of).collect();

    let mut cost = vec![f64::INFINITY; full as usize + 1];
    let mut split = vec![0u32; full as usize + 1];
    for i in 0..n {
        cost[1 << i] = 0.0;
    }

    for mask in 1..=full {
        if mask.count_ones() < 2 {
            continue;
        }
        let lowest = mask & mask.wrapping_neg();
        let mut sub = (mask - 1) & mask;
        while sub > 0 {
            if sub & lowest != 0 {
                let rest = mask ^ sub;
                let step = pairwise_flops(
                    union_dims(&carried[sub as usize], &carried[rest as usize]),
                    &dim_map,
                )?;
                let total = cost[sub as usize] + cost[rest as usize] + step;
                if total < cost[mask as usize] {
                    cost[mask as usize] = total;
                    split[mask as usize] = sub;
                }
            }
            sub = (sub - 1) & mask;
        }
    }

    let mut merges = Vec::with_capacity(n - 1);
    collect_merges(full, &split, &mut merges);

    let mut live: Vec<u32> = (0..n).map(|i| 1u32 << i).collect();
    let mut plan = Plan::new();
    for (left, right) in merges {
        let pos_left = position_of(&live, left)?;
        let pos_right = position_of(&live, right)?;
        let (lhs, rhs) = (pos_left.min(pos_right), pos_left.max(pos_right));
        let merged = live[lhs] | live[rhs];

        let lhs_dims = carried[live[lhs] as usize].clone();
        let rhs_dims = carried[live[rhs] as usize].clone();
        let output_dims = carried[merged as usize].clone();
        let flops = pairwise_flops(union_dims(&lhs_dims, &rhs_dims), &dim_map)?;
        let memory = element_count(&output_dims, &dim_map)?.saturating_mul(BYTES_PER_ELEMENT);

        plan.push(PlanNode {
            lhs,
            rhs,
            lhs_dims,
            rhs_dims,
            output_dims,
            cost: flops,
            memory,
        });
        live.remove(rhs);
        live.remove(lhs);
        live.push(merged);
    }

    log::debug!(
        "optimal: {} steps, {:.2e} FLOPs for {}",
        plan.num_steps(),
        plan.estimated_flops,
        spec
    );
    hints.check_budget(&plan)?;
    Ok(plan)
}

/// Post-order list of merges below `mask`
fn collect_merges(mask: u32, split: &[u32], merges: &mut Vec<(u32, u32)>) {
    if mask.count_ones() < 2 {
        return;
    }
    let left = split[mask as usize];
    let right = mask ^ left;
    collect_merges(left, split, merges);
    collect_merges(right, split, merges);
    merges.push((left, right));
}

fn position_of(live: &[u32], mask: u32) -> Result<usize> {
    live.iter()
        .position(|&m| m == mask)
        .ok_or_else(|| anyhow!("Subset {:#b} is not live", mask))
}
