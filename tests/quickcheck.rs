use std::collections::BTreeSet;

use quickcheck::{quickcheck, TestResult};

use flowcuts::algo::{all_st_cuts, all_st_mincuts, dominator_tree, maxflow};
use flowcuts::{node_index, DiGraph, Outgoing};

/// Build a small digraph from arbitrary bytes: up to `max_nodes` nodes, edge
/// endpoints folded into range, self-loops dropped.
fn small_graph(n: u8, raw_edges: &[(u8, u8)], max_nodes: usize) -> DiGraph {
    let n = 2 + (n as usize) % (max_nodes - 1);
    let edges = raw_edges
        .iter()
        .take(12)
        .map(|&(a, b)| (a as usize % n, b as usize % n))
        .filter(|&(a, b)| a != b);
    DiGraph::from_edges(n, edges)
}

fn reaches(g: &DiGraph, from: usize, to: usize, removed_vertex: Option<usize>) -> bool {
    if removed_vertex == Some(from) {
        return false;
    }
    let mut seen = vec![false; g.node_count()];
    let mut stack = vec![from];
    seen[from] = true;
    while let Some(v) = stack.pop() {
        if v == to {
            return true;
        }
        for w in g.neighbors_directed(node_index(v), Outgoing) {
            let w = w.index();
            if !seen[w] && removed_vertex != Some(w) {
                seen[w] = true;
                stack.push(w);
            }
        }
    }
    false
}

/// Does `source` still reach `target` when the given edges are removed?
fn reaches_without_edges(g: &DiGraph, source: usize, target: usize, cut: &[usize]) -> bool {
    let removed: BTreeSet<usize> = cut.iter().copied().collect();
    let mut seen = vec![false; g.node_count()];
    let mut stack = vec![source];
    seen[source] = true;
    while let Some(v) = stack.pop() {
        if v == target {
            return true;
        }
        for e in g.edges_directed(node_index(v), Outgoing) {
            let w = e.target().index();
            if !removed.contains(&e.id().index()) && !seen[w] {
                seen[w] = true;
                stack.push(w);
            }
        }
    }
    false
}

/// Every source-side partition `A` (source in, target out), as the edge set
/// leaving it.
fn brute_force_cut_sets(g: &DiGraph, source: usize, target: usize) -> BTreeSet<Vec<usize>> {
    let n = g.node_count();
    let others: Vec<usize> = (0..n).filter(|&v| v != source && v != target).collect();
    let mut family = BTreeSet::new();
    for mask in 0..(1u32 << others.len()) {
        let mut inside = vec![false; n];
        inside[source] = true;
        for (bit, &v) in others.iter().enumerate() {
            inside[v] = mask & (1 << bit) != 0;
        }
        let cut: Vec<usize> = g
            .edge_references()
            .filter(|e| inside[e.source().index()] && !inside[e.target().index()])
            .map(|e| e.id().index())
            .collect();
        family.insert(cut);
    }
    family
}

/// The minimal elements of the cut family: cut sets of which no proper
/// subset also appears in the family.
fn minimal_cut_sets(family: &BTreeSet<Vec<usize>>) -> BTreeSet<Vec<usize>> {
    family
        .iter()
        .filter(|cut| {
            let cut_set: BTreeSet<usize> = cut.iter().copied().collect();
            !family
                .iter()
                .any(|other| other.len() < cut.len() && other.iter().all(|e| cut_set.contains(e)))
        })
        .cloned()
        .collect()
}

fn prop_all_cuts_lists_every_minimal_cut_once(n: u8, raw_edges: Vec<(u8, u8)>) -> TestResult {
    let g = small_graph(n, &raw_edges, 6);
    let (source, target) = (0, g.node_count() - 1);

    let cuts = all_st_cuts(&g, node_index(source), node_index(target)).unwrap();
    let emitted: Vec<Vec<usize>> = cuts
        .iter()
        .map(|c| {
            let mut edges: Vec<usize> = c.edges.iter().map(|e| e.index()).collect();
            edges.sort_unstable();
            edges
        })
        .collect();
    let emitted_set: BTreeSet<Vec<usize>> = emitted.iter().cloned().collect();

    // Each cut is listed exactly once.
    if emitted_set.len() != emitted.len() {
        return TestResult::failed();
    }

    if !reaches(&g, source, target, None) {
        return TestResult::from_bool(emitted.is_empty());
    }

    // Every emitted cut actually severs source from target.
    for cut in &emitted {
        if reaches_without_edges(&g, source, target, cut) {
            return TestResult::failed();
        }
    }

    let family = brute_force_cut_sets(&g, source, target);
    TestResult::from_bool(emitted_set == minimal_cut_sets(&family))
}

fn prop_mincuts_match_brute_force(n: u8, raw_edges: Vec<(u8, u8)>, caps: Vec<u8>) -> TestResult {
    let g = small_graph(n, &raw_edges, 6);
    let (source, target) = (0, g.node_count() - 1);

    let capacity: Vec<f64> = (0..g.edge_count())
        .map(|e| 1.0 + (caps.get(e).copied().unwrap_or(0) % 3) as f64)
        .collect();

    let result = all_st_mincuts(&g, node_index(source), node_index(target), Some(&capacity)).unwrap();

    if !reaches(&g, source, target, None) {
        return TestResult::from_bool(result.value == 0.0 && result.cuts.is_empty());
    }

    // Brute force: the minimum capacity over all partition boundaries, and
    // every distinct cut set attaining it.
    let family = brute_force_cut_sets(&g, source, target);
    let weight = |cut: &Vec<usize>| -> f64 { cut.iter().map(|&e| capacity[e]).sum() };
    let best = family.iter().map(weight).fold(f64::INFINITY, f64::min);
    let expected: BTreeSet<Vec<usize>> = family
        .iter()
        .filter(|cut| (weight(cut) - best).abs() < 1e-9)
        .cloned()
        .collect();

    if (result.value - best).abs() > 1e-9 {
        return TestResult::failed();
    }
    for cut in &result.cuts {
        let total: f64 = cut.edges.iter().map(|e| capacity[e.index()]).sum();
        if (total - result.value).abs() > 1e-9 {
            return TestResult::failed();
        }
    }

    let emitted: BTreeSet<Vec<usize>> = result
        .cuts
        .iter()
        .map(|c| {
            let mut edges: Vec<usize> = c.edges.iter().map(|e| e.index()).collect();
            edges.sort_unstable();
            edges
        })
        .collect();
    if emitted.len() != result.cuts.len() {
        return TestResult::failed();
    }
    TestResult::from_bool(emitted == expected)
}

fn prop_dominator_chain_is_exact(n: u8, raw_edges: Vec<(u8, u8)>) -> TestResult {
    let g = small_graph(n, &raw_edges, 7);
    let root = 0;
    let dom = dominator_tree(&g, node_index(root), Outgoing).unwrap();

    for v in 0..g.node_count() {
        let reachable = reaches(&g, root, v, None);
        if reachable != dom.is_reachable(node_index(v)) {
            return TestResult::failed();
        }
        if !reachable {
            continue;
        }
        // u dominates v iff removing u makes v unreachable from the root;
        // the dominator chain must consist of exactly those vertices.
        let expected: BTreeSet<usize> = (0..g.node_count())
            .filter(|&u| u == v || !reaches(&g, root, v, Some(u)))
            .collect();
        let chain: BTreeSet<usize> = dom
            .dominators(node_index(v))
            .into_iter()
            .flatten()
            .map(|u| u.index())
            .collect();
        if chain != expected {
            return TestResult::failed();
        }
    }
    TestResult::passed()
}

fn prop_maxflow_agrees_with_min_cut(n: u8, raw_edges: Vec<(u8, u8)>, caps: Vec<u8>) -> TestResult {
    let g = small_graph(n, &raw_edges, 6);
    let (source, target) = (0, g.node_count() - 1);
    let capacity: Vec<f64> = (0..g.edge_count())
        .map(|e| 1.0 + (caps.get(e).copied().unwrap_or(0) % 4) as f64)
        .collect();

    let (value, flows) =
        maxflow(&g, node_index(source), node_index(target), Some(&capacity)).unwrap();

    // Flows stay within capacity.
    for e in 0..g.edge_count() {
        if flows[e] < -1e-9 || flows[e] > capacity[e] + 1e-9 {
            return TestResult::failed();
        }
    }

    // Max-flow min-cut duality: the value equals the cheapest partition
    // boundary.
    let family = brute_force_cut_sets(&g, source, target);
    let best = family
        .iter()
        .map(|cut| cut.iter().map(|&e| capacity[e]).sum::<f64>())
        .fold(f64::INFINITY, f64::min);
    TestResult::from_bool((value - best).abs() < 1e-9)
}

#[test]
fn all_cuts_lists_every_minimal_cut_once() {
    quickcheck(prop_all_cuts_lists_every_minimal_cut_once as fn(u8, Vec<(u8, u8)>) -> TestResult);
}

#[test]
fn mincuts_match_brute_force() {
    quickcheck(prop_mincuts_match_brute_force as fn(u8, Vec<(u8, u8)>, Vec<u8>) -> TestResult);
}

#[test]
fn dominator_chain_is_exact() {
    quickcheck(prop_dominator_chain_is_exact as fn(u8, Vec<(u8, u8)>) -> TestResult);
}

#[test]
fn maxflow_agrees_with_min_cut() {
    quickcheck(prop_maxflow_agrees_with_min_cut as fn(u8, Vec<(u8, u8)>, Vec<u8>) -> TestResult);
}
