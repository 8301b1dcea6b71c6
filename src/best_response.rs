//! Exact best-response computation over a fully expanded (non-depth-limited)
//! public tree, used to measure how exploitable a solved average strategy
//! is: how many chips a perfectly-informed opponent could extract by
//! deviating from their own equilibrium strategy.

use std::collections::HashMap;

use crate::cards::Card;
use crate::config::GameParams;
use crate::lookahead::Lookahead;
use crate::terminal_equity::TerminalEquity;
use crate::tree::{NodeId, NodeKind, PublicTree};

/// Walks a fully built [`PublicTree`] computing, for one player, the value of
/// playing a best response against the opponent's fixed average strategy
/// (read off a solved [`Lookahead`] at every node, not just the root).
/// TerminalEquity is memoised by board the same way [`Lookahead`] does it.
pub struct BestResponse<'a> {
    tree: &'a PublicTree,
    params: &'a GameParams,
    card_count: usize,
    terminal_equities: HashMap<Vec<Card>, TerminalEquity>,
}

impl<'a> BestResponse<'a> {
    pub fn new(tree: &'a PublicTree, params: &'a GameParams) -> Self {
        BestResponse { tree, params, card_count: params.card_count(), terminal_equities: HashMap::new() }
    }

    /// Best-response value for `player`, per hand, given `range0`/`range1`
    /// at the root. Panics if the tree has a depth-limited (childless)
    /// chance node — an exact best response needs the real game tree past
    /// it, which a re-solve's lookahead never builds.
    pub fn value(&mut self, lookahead: &Lookahead, player: usize, range0: &[f64], range1: &[f64]) -> Vec<f64> {
        let root = self.tree.root();
        self.node_value(lookahead, root, player, range0, range1)
    }

    fn node_value(&mut self, lookahead: &Lookahead, node_id: NodeId, player: usize, range0: &[f64], range1: &[f64]) -> Vec<f64> {
        let node = self.tree.node(node_id).clone();
        match node.kind {
            NodeKind::TerminalFold => {
                let folder = 1 - node.current_player as usize;
                let mut cfv0 = vec![0.0; self.card_count];
                let mut cfv1 = vec![0.0; self.card_count];
                {
                    let te = self.terminal_equity_for(&node.board);
                    te.tree_node_fold_values((range0, range1), (&mut cfv0, &mut cfv1), folder);
                }
                let mut out = if player == 0 { cfv0 } else { cfv1 };
                scale(&mut out, node.pot);
                out
            }
            NodeKind::TerminalCall => {
                let mut cfv0 = vec![0.0; self.card_count];
                let mut cfv1 = vec![0.0; self.card_count];
                {
                    let te = self.terminal_equity_for(&node.board);
                    te.tree_node_call_values((range0, range1), (&mut cfv0, &mut cfv1));
                }
                let mut out = if player == 0 { cfv0 } else { cfv1 };
                scale(&mut out, node.pot);
                out
            }
            NodeKind::Chance if node.children.is_empty() => {
                panic!("best response needs a fully expanded tree (build with limit_to_street: false)");
            }
            NodeKind::Chance => {
                let n = node.children.len() as f64;
                let mut acc = vec![0.0; self.card_count];
                for &child in &node.children {
                    let v = self.node_value(lookahead, child, player, range0, range1);
                    for i in 0..self.card_count {
                        acc[i] += v[i] / n;
                    }
                }
                acc
            }
            NodeKind::Player => {
                let current_player = node.current_player as usize;
                let na = node.children.len();
                if current_player == player {
                    // the best-responder: take the best action per hand, not a mix.
                    let mut best = vec![f64::NEG_INFINITY; self.card_count];
                    for &child in &node.children {
                        let v = self.node_value(lookahead, child, player, range0, range1);
                        for h in 0..self.card_count {
                            if v[h] > best[h] {
                                best[h] = v[h];
                            }
                        }
                    }
                    best
                } else {
                    // the fixed opponent: split their range by the average strategy.
                    let strategy = lookahead.average_strategy_at(node_id);
                    let mut out = vec![0.0; self.card_count];
                    for a in 0..na {
                        let (new_range0, new_range1) = split_range(current_player, range0, range1, &strategy, a, na);
                        let v = self.node_value(lookahead, node.children[a], player, &new_range0, &new_range1);
                        for i in 0..self.card_count {
                            out[i] += v[i];
                        }
                    }
                    out
                }
            }
        }
    }

    fn terminal_equity_for(&mut self, board: &[Card]) -> &TerminalEquity {
        let params = self.params;
        self.terminal_equities.entry(board.to_vec()).or_insert_with(|| TerminalEquity::new(board, params))
    }
}

fn split_range(current_player: usize, range0: &[f64], range1: &[f64], strategy: &[f64], action: usize, na: usize) -> (Vec<f64>, Vec<f64>) {
    if current_player == 0 {
        let r0: Vec<f64> = range0.iter().enumerate().map(|(h, &p)| p * strategy[h * na + action]).collect();
        (r0, range1.to_vec())
    } else {
        let r1: Vec<f64> = range1.iter().enumerate().map(|(h, &p)| p * strategy[h * na + action]).collect();
        (range0.to_vec(), r1)
    }
}

fn scale(v: &mut [f64], factor: f64) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}

/// Root exploitability of a solved `lookahead`'s average strategy: the
/// average, over both players, of (best-response value − self-play value)
/// weighted by the player's own range and summed over hands. Zero at a
/// Nash equilibrium; `tree` must be the same fully expanded tree the
/// lookahead was built on.
pub fn exploitability(tree: &PublicTree, params: &GameParams, lookahead: &Lookahead, range0: &[f64], range1: &[f64]) -> f64 {
    let mut br = BestResponse::new(tree, params);
    let br0 = br.value(lookahead, 0, range0, range1);
    let br1 = br.value(lookahead, 1, range0, range1);
    let cfvs = lookahead.get_root_cfv_both_players();

    let gain0: f64 = (0..range0.len()).map(|h| range0[h] * (br0[h] - cfvs[0][h])).sum();
    let gain1: f64 = (0..range1.len()).map(|h| range1[h] * (br1[h] - cfvs[1][h])).sum();
    (gain0 + gain1) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet_sizing::BetSizing;
    use crate::card_tools::uniform_range;
    use crate::tree::{TreeBuilder, TreeParams};
    use crate::value_oracle::ZeroValueOracle;

    fn small_full_tree(p: &GameParams) -> (BetSizing, PublicTree) {
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: false,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, p);
        (bs, tree)
    }

    /// Scenario 1 from the convergence table: after a full run of CFR+ on
    /// the entire first-street tree (both streets, no depth limit) with
    /// uniform ranges, the root strategy sums to 1 per hand, the root cfvs
    /// are zero-sum under the dealt ranges, and the root is close enough to
    /// equilibrium that neither player can gain more than 5 chips per hand
    /// by deviating to a best response.
    #[test]
    fn root_strategy_is_near_equilibrium() {
        let p = GameParams::new(100.0, 1200.0, 3, 2, 1, 2, vec![1.0], 1000, 500).unwrap();
        let (_bs, tree) = small_full_tree(&p);
        let oracle = ZeroValueOracle;
        let mut lookahead = Lookahead::new(&tree, &p, &oracle);
        let range0 = uniform_range(&[], &p);
        let range1 = uniform_range(&[], &p);
        lookahead.resolve_first_node(range0.clone(), range1.clone());

        let results = lookahead.get_results();
        for h in 0..p.card_count() {
            let sum: f64 = (0..results.num_root_actions).map(|a| results.strategy[h * results.num_root_actions + a]).sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }

        let cfvs = lookahead.get_root_cfv_both_players();
        let zero_sum: f64 = (0..p.card_count()).map(|h| range0[h] * cfvs[0][h] + range1[h] * cfvs[1][h]).sum();
        assert!(zero_sum.abs() < 5.0, "root cfvs should be ~zero-sum, got {zero_sum}");

        let exploit = exploitability(&tree, &p, &lookahead, &range0, &range1);
        assert!(exploit < 5.0, "exploitability {exploit} should be below 5 chips after 1000 iterations");
    }
}
