//! Depth-limited CFR+ over a [`PublicTree`]: the engine that actually
//! re-solves a subgame.
//!
//! Regrets are stored in one flat `Vec<f64>` shared by every decision node,
//! indexed `offsets[node] + hand * num_actions[node] + action` — the same
//! scheme as a node-indexed flat CFR array, just keyed off the arena node id
//! instead of a separately-numbered node list. Leaves of the tree are either
//! terminal nodes (settled by [`TerminalEquity`]) or depth-limit chance
//! nodes (settled by a [`ValueOracle`] call through bucket space).

use std::collections::HashMap;

use crate::bucket_conversion::BucketConversion;
use crate::cards::Card;
use crate::config::GameParams;
use crate::gadget::CfrdGadget;
use crate::terminal_equity::TerminalEquity;
use crate::tree::{NodeId, NodeKind, PublicNode, PublicTree};
use crate::value_oracle::ValueOracle;

const REGRET_EPSILON: f64 = 1e-8;

/// What re-solving the root of the lookahead produced.
pub struct ResolveResults {
    /// Average strategy at the root, `num_actions x card_count`, normalized per hand.
    pub strategy: Vec<f64>,
    pub num_root_actions: usize,
    /// The opponent's average cfv at the root, used by continual re-solving
    /// to track their values across re-solves.
    pub achieved_cfvs: Vec<f64>,
    /// The resolving player's average cfv at the root. `None` when this
    /// lookahead was resolved with [`Lookahead::resolve`] (the opponent's
    /// range there is reconstructed, not fixed, so their cfv isn't meaningful
    /// to report back).
    pub root_cfvs: Option<Vec<f64>>,
    /// The opponent's average cfv after each of the resolving player's root
    /// actions, `num_actions x card_count`.
    pub children_cfvs: Vec<f64>,
}

pub struct Lookahead<'a> {
    tree: &'a PublicTree,
    params: &'a GameParams,
    oracle: &'a dyn ValueOracle,
    card_count: usize,

    regrets: Vec<f64>,
    offsets: Vec<u32>,
    num_actions: Vec<u8>,

    terminal_equities: HashMap<Vec<Card>, TerminalEquity>,
    bucket_conversions: HashMap<Vec<Card>, BucketConversion>,

    root_range: [Vec<f64>; 2],
    /// Absolute seat (0 or 1) of the player this lookahead is solving for.
    /// Always equal to the root node's `current_player`, since a lookahead
    /// is built rooted at the decision the resolving player is about to
    /// make — kept as an explicit field rather than re-derived everywhere,
    /// since `root_range`/`avg_cfvs_root`/oracle calls all key off it.
    resolving_player: usize,
    gadget: Option<CfrdGadget>,
    last_opponent_cfv: Vec<f64>,
    reconstructing: bool,
    accumulating: bool,

    /// Average strategy at every player node, same flat layout as `regrets`.
    avg_strategy: Vec<f64>,
    avg_strategy_root: Vec<f64>,
    avg_cfvs_root: [Vec<f64>; 2],
    avg_children_cfvs_root: Vec<f64>,
}

impl<'a> Lookahead<'a> {
    pub fn new(tree: &'a PublicTree, params: &'a GameParams, oracle: &'a dyn ValueOracle) -> Self {
        let card_count = params.card_count();
        let mut offsets = vec![0u32; tree.len()];
        let mut num_actions = vec![0u8; tree.len()];
        let mut offset = 0u32;
        for id in 0..tree.len() as u32 {
            let node = tree.node(id);
            if node.kind == NodeKind::Player {
                let na = node.children.len() as u8;
                offsets[id as usize] = offset;
                num_actions[id as usize] = na;
                offset += na as u32 * card_count as u32;
            }
        }

        let root = tree.root();
        let root_na = tree.node(root).children.len();

        Lookahead {
            tree,
            params,
            oracle,
            card_count,
            regrets: vec![0.0; offset as usize],
            offsets,
            num_actions,
            terminal_equities: HashMap::new(),
            bucket_conversions: HashMap::new(),
            root_range: [vec![1.0 / card_count as f64; card_count], vec![1.0 / card_count as f64; card_count]],
            resolving_player: tree.node(root).current_player as usize,
            gadget: None,
            last_opponent_cfv: vec![0.0; card_count],
            reconstructing: false,
            accumulating: false,
            avg_strategy: vec![0.0; offset as usize],
            avg_strategy_root: vec![0.0; root_na * card_count],
            avg_cfvs_root: [vec![0.0; card_count], vec![0.0; card_count]],
            avg_children_cfvs_root: vec![0.0; root_na * card_count],
        }
    }

    /// Re-solves using fixed ranges for both players. Only appropriate at
    /// the true root of the game, where both ranges are known exactly.
    pub fn resolve_first_node(&mut self, player_range: Vec<f64>, opponent_range: Vec<f64>) {
        log::debug!("resolve_first_node: {} nodes, {} cfr iterations", self.tree.len(), self.params.cfr_iters);
        let resolver = self.resolving_player;
        let mut root_range = [vec![0.0; self.card_count], vec![0.0; self.card_count]];
        root_range[resolver] = player_range;
        root_range[1 - resolver] = opponent_range;
        self.root_range = root_range;
        self.gadget = None;
        self.reconstructing = false;
        self.run();
    }

    /// Re-solves using a fixed range for the resolving player and the
    /// CFR-D gadget to reconstruct the opponent's range each iteration from
    /// their counterfactual values in the previous solve. The resolving
    /// player's absolute seat is the tree root's `current_player` — the
    /// opponent always occupies the other slot regardless of which seat
    /// that is.
    pub fn resolve(&mut self, player_range: Vec<f64>, opponent_cfvs: Vec<f64>) {
        log::debug!("resolve (gadget): {} nodes, {} cfr iterations", self.tree.len(), self.params.cfr_iters);
        let board = self.tree.node(self.tree.root()).board.clone();
        self.gadget = Some(CfrdGadget::new(&board, opponent_cfvs, self.params));
        self.root_range[self.resolving_player] = player_range;
        self.last_opponent_cfv = vec![0.0; self.card_count];
        self.reconstructing = true;
        self.run();
    }

    fn run(&mut self) {
        let opponent = 1 - self.resolving_player;
        for iter in 0..self.params.cfr_iters {
            if self.gadget.is_some() {
                let opponent_range = self.gadget.as_mut().unwrap().compute_opponent_range(&self.last_opponent_cfv);
                self.root_range[opponent] = opponent_range;
            }
            self.accumulating = iter > self.params.cfr_skip_iters;
            let (strategy, cfv0, cfv1, children_cfv) = self.solve_root();
            let cfvs = [&cfv0, &cfv1];
            self.last_opponent_cfv = cfvs[opponent].to_vec();
            log::trace!("cfr+ iteration {iter}: root cfv0 sum {:.4}, cfv1 sum {:.4}", cfv0.iter().sum::<f64>(), cfv1.iter().sum::<f64>());

            if self.accumulating {
                let root = self.tree.root();
                let na = self.num_root_actions(root);
                for h in 0..self.card_count {
                    for a in 0..na {
                        self.avg_strategy_root[h * na + a] += strategy[h * na + a];
                        self.avg_children_cfvs_root[h * na + a] += children_cfv[a][h];
                    }
                }
                for i in 0..self.card_count {
                    self.avg_cfvs_root[0][i] += cfv0[i];
                    self.avg_cfvs_root[1][i] += cfv1[i];
                }
            }
        }
    }

    fn num_root_actions(&self, root: NodeId) -> usize {
        self.tree.node(root).children.len()
    }

    /// One iteration's worth of root-level bookkeeping: computes the root's
    /// current strategy, recurses into every child, and aggregates results
    /// exactly like [`Lookahead::solve_player_node`] would — except it also
    /// keeps the per-action opponent cfv that the rest of the tree discards
    /// once summed, since [`ResolveResults::children_cfvs`] needs it.
    fn solve_root(&mut self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<Vec<f64>>) {
        let root = self.tree.root();
        let node = self.tree.node(root).clone();
        let current_player = node.current_player as usize;
        let na = node.children.len();

        let mut strategy = vec![0.0; self.card_count * na];
        for h in 0..self.card_count {
            let mut s = vec![0.0; na];
            self.current_strategy(root, h, &mut s);
            for a in 0..na {
                strategy[h * na + a] = s[a];
            }
        }

        let range0 = self.root_range[0].clone();
        let range1 = self.root_range[1].clone();

        let mut child_cfv_acting = Vec::with_capacity(na);
        let mut child_cfv_opponent = Vec::with_capacity(na);
        let mut cfv_opponent_sum = vec![0.0; self.card_count];

        for a in 0..na {
            let child = node.children[a];
            let (new_range0, new_range1) = self.apply_action(current_player, &range0, &range1, &strategy, a, na);
            let (c0, c1) = self.solve_node(child, &new_range0, &new_range1);
            let (acting, opponent) = if current_player == 0 { (c0, c1) } else { (c1, c0) };
            for i in 0..self.card_count {
                cfv_opponent_sum[i] += opponent[i];
            }
            child_cfv_opponent.push(opponent);
            child_cfv_acting.push(acting);
        }

        let mut acting_cfv = vec![0.0; self.card_count];
        for h in 0..self.card_count {
            let mut v = 0.0;
            for a in 0..na {
                v += strategy[h * na + a] * child_cfv_acting[a][h];
            }
            acting_cfv[h] = v;
        }
        self.update_regrets(root, na, &child_cfv_acting, &acting_cfv);
        if self.accumulating {
            self.accumulate_strategy(root, na, &strategy);
        }

        let (cfv0, cfv1) = if current_player == 0 { (acting_cfv, cfv_opponent_sum) } else { (cfv_opponent_sum, acting_cfv) };
        (strategy, cfv0, cfv1, child_cfv_opponent)
    }

    fn apply_action(
        &self,
        current_player: usize,
        range0: &[f64],
        range1: &[f64],
        strategy: &[f64],
        action: usize,
        num_actions: usize,
    ) -> (Vec<f64>, Vec<f64>) {
        if current_player == 0 {
            let r0: Vec<f64> = range0.iter().enumerate().map(|(h, &p)| p * strategy[h * num_actions + action]).collect();
            (r0, range1.to_vec())
        } else {
            let r1: Vec<f64> = range1.iter().enumerate().map(|(h, &p)| p * strategy[h * num_actions + action]).collect();
            (range0.to_vec(), r1)
        }
    }

    fn solve_node(&mut self, node_id: NodeId, range0: &[f64], range1: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let node = self.tree.node(node_id).clone();
        match node.kind {
            NodeKind::TerminalFold => self.terminal_fold_value(&node, range0, range1),
            NodeKind::TerminalCall => self.terminal_call_value(&node, range0, range1),
            NodeKind::Chance if node.children.is_empty() => self.oracle_leaf_value(&node, range0, range1),
            NodeKind::Chance => {
                let n = node.children.len() as f64;
                let mut cfv0 = vec![0.0; self.card_count];
                let mut cfv1 = vec![0.0; self.card_count];
                for &child in &node.children {
                    let (c0, c1) = self.solve_node(child, range0, range1);
                    for i in 0..self.card_count {
                        cfv0[i] += c0[i] / n;
                        cfv1[i] += c1[i] / n;
                    }
                }
                (cfv0, cfv1)
            }
            NodeKind::Player => self.solve_player_node(node_id, &node, range0, range1),
        }
    }

    fn terminal_fold_value(&mut self, node: &PublicNode, range0: &[f64], range1: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let folder = 1 - node.current_player as usize;
        let mut cfv0 = vec![0.0; self.card_count];
        let mut cfv1 = vec![0.0; self.card_count];
        {
            let te = self.terminal_equity_for(&node.board);
            te.tree_node_fold_values((range0, range1), (&mut cfv0, &mut cfv1), folder);
        }
        scale(&mut cfv0, node.pot);
        scale(&mut cfv1, node.pot);
        (cfv0, cfv1)
    }

    fn terminal_call_value(&mut self, node: &PublicNode, range0: &[f64], range1: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut cfv0 = vec![0.0; self.card_count];
        let mut cfv1 = vec![0.0; self.card_count];
        {
            let te = self.terminal_equity_for(&node.board);
            te.tree_node_call_values((range0, range1), (&mut cfv0, &mut cfv1));
        }
        scale(&mut cfv0, node.pot);
        scale(&mut cfv1, node.pot);
        (cfv0, cfv1)
    }

    /// Depth-limit leaf: convert both ranges to bucket space, call the
    /// oracle, convert the resulting bucketed cfvs back to card space. The
    /// oracle always sees the resolving player's bucket range first and the
    /// opponent's second, regardless of which absolute seat is resolving
    /// (the input/output slots are swapped back afterwards) — this is the
    /// "swap player order if P2 is the re-solver" convention.
    fn oracle_leaf_value(&mut self, node: &PublicNode, range0: &[f64], range1: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let resolver = self.resolving_player;
        let (resolver_range, opponent_range) = if resolver == 0 { (range0, range1) } else { (range1, range0) };

        let bucket_count;
        let mut b_resolver;
        let mut b_opponent;
        {
            let bc = self.bucket_conversion_for(&node.board);
            bucket_count = bc.bucket_count();
            b_resolver = vec![0.0; bucket_count];
            b_opponent = vec![0.0; bucket_count];
            bc.card_range_to_bucket_range(resolver_range, &mut b_resolver);
            bc.card_range_to_bucket_range(opponent_range, &mut b_opponent);
        }

        let mut inputs = vec![0.0; 2 * bucket_count];
        inputs[..bucket_count].copy_from_slice(&b_resolver);
        inputs[bucket_count..].copy_from_slice(&b_opponent);
        let mut outputs = vec![0.0; 2 * bucket_count];
        self.oracle.get_value(&inputs, &mut outputs, 1, bucket_count);

        let mut cfv_resolver = vec![0.0; self.card_count];
        let mut cfv_opponent = vec![0.0; self.card_count];
        {
            let bc = self.bucket_conversion_for(&node.board);
            bc.bucket_value_to_card_value(&outputs[..bucket_count], &mut cfv_resolver);
            bc.bucket_value_to_card_value(&outputs[bucket_count..], &mut cfv_opponent);
        }
        scale(&mut cfv_resolver, node.pot);
        scale(&mut cfv_opponent, node.pot);

        if resolver == 0 {
            (cfv_resolver, cfv_opponent)
        } else {
            (cfv_opponent, cfv_resolver)
        }
    }

    fn solve_player_node(&mut self, node_id: NodeId, node: &PublicNode, range0: &[f64], range1: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let current_player = node.current_player as usize;
        let na = node.children.len();

        let mut strategy = vec![0.0; self.card_count * na];
        for h in 0..self.card_count {
            let mut s = vec![0.0; na];
            self.current_strategy(node_id, h, &mut s);
            for a in 0..na {
                strategy[h * na + a] = s[a];
            }
        }

        let mut cfv_opponent_sum = vec![0.0; self.card_count];
        let mut child_cfv_acting = Vec::with_capacity(na);

        for a in 0..na {
            let child = node.children[a];
            let (new_range0, new_range1) = self.apply_action(current_player, range0, range1, &strategy, a, na);
            let (c0, c1) = self.solve_node(child, &new_range0, &new_range1);
            let (acting, opponent) = if current_player == 0 { (c0, c1) } else { (c1, c0) };
            for i in 0..self.card_count {
                cfv_opponent_sum[i] += opponent[i];
            }
            child_cfv_acting.push(acting);
        }

        let mut acting_cfv = vec![0.0; self.card_count];
        for h in 0..self.card_count {
            let mut v = 0.0;
            for a in 0..na {
                v += strategy[h * na + a] * child_cfv_acting[a][h];
            }
            acting_cfv[h] = v;
        }
        self.update_regrets(node_id, na, &child_cfv_acting, &acting_cfv);
        if self.accumulating {
            self.accumulate_strategy(node_id, na, &strategy);
        }

        if current_player == 0 {
            (acting_cfv, cfv_opponent_sum)
        } else {
            (cfv_opponent_sum, acting_cfv)
        }
    }

    fn update_regrets(&mut self, node_id: NodeId, na: usize, child_cfv_acting: &[Vec<f64>], acting_cfv: &[f64]) {
        let base_offset = self.offsets[node_id as usize] as usize;
        for h in 0..self.card_count {
            let base = base_offset + h * na;
            for a in 0..na {
                let instant = child_cfv_acting[a][h] - acting_cfv[h];
                let r = &mut self.regrets[base + a];
                *r = (*r + instant).max(0.0);
            }
        }
    }

    /// Adds one iteration's current strategy into the running average kept
    /// for every player node (not just the root), used by best-response
    /// computation to walk the opponent's actual policy deeper in the tree.
    fn accumulate_strategy(&mut self, node_id: NodeId, na: usize, strategy: &[f64]) {
        let base = self.offsets[node_id as usize] as usize;
        for h in 0..self.card_count {
            for a in 0..na {
                self.avg_strategy[base + h * na + a] += strategy[h * na + a];
            }
        }
    }

    /// CFR+ regret matching. Regrets are floored at 0 in storage
    /// ([`Lookahead::update_regrets`]); here they're floored at a tiny
    /// epsilon only so the normalizing sum is never exactly zero.
    fn current_strategy(&self, node: NodeId, hand: usize, out: &mut [f64]) {
        let na = self.num_actions[node as usize] as usize;
        let base = self.offsets[node as usize] as usize + hand * na;
        let regrets = &self.regrets[base..base + na];
        let mut sum = 0.0;
        for &r in regrets {
            sum += r.max(REGRET_EPSILON);
        }
        for (i, &r) in regrets.iter().enumerate() {
            out[i] = r.max(REGRET_EPSILON) / sum;
        }
    }

    fn terminal_equity_for(&mut self, board: &[Card]) -> &TerminalEquity {
        let params = self.params;
        self.terminal_equities.entry(board.to_vec()).or_insert_with(|| TerminalEquity::new(board, params))
    }

    fn bucket_conversion_for(&mut self, board: &[Card]) -> &BucketConversion {
        let params = self.params;
        self.bucket_conversions.entry(board.to_vec()).or_insert_with(|| BucketConversion::new(board, params))
    }

    /// The opponent's cfv for a specific realized board after the resolving
    /// player took `action_index` at the root, used by continual re-solving
    /// to track opponent values across street transitions without a full
    /// re-solve. Uses the *average* root strategy from the last [`resolve`]
    /// or [`resolve_first_node`] call.
    pub fn get_chance_action_cfv(&mut self, action_index: usize, board: &[Card]) -> Vec<f64> {
        let root = self.tree.root();
        let root_node = self.tree.node(root).clone();
        let na = root_node.children.len();
        assert!(action_index < na);

        let results = self.get_results();
        let resolver = self.resolving_player;
        let mut range0 = self.root_range[0].clone();
        let mut range1 = self.root_range[1].clone();
        {
            let acting_range = if resolver == 0 { &mut range0 } else { &mut range1 };
            for (h, p) in acting_range.iter_mut().enumerate() {
                *p *= results.strategy[h * na + action_index];
            }
        }

        let child = root_node.children[action_index];
        let child_node = self.tree.node(child).clone();
        let pot = child_node.pot;

        chance_action_cfv(self.oracle, self.params, board, &range0, &range1, resolver, pot)
    }

    /// The range pair currently sitting at the root: the resolving player's
    /// fixed range and the opponent's range (fixed, or the gadget's latest
    /// reconstruction when this lookahead was built with [`resolve`]).
    pub fn root_range(&self) -> &[Vec<f64>; 2] {
        &self.root_range
    }

    /// Average strategy at any player node in this lookahead's tree,
    /// normalized per hand the same way the root strategy in
    /// [`Lookahead::get_results`] is — used by best-response computation to
    /// walk the opponent's actual policy at every node, not just the root.
    pub fn average_strategy_at(&self, node_id: NodeId) -> Vec<f64> {
        let na = self.num_actions[node_id as usize] as usize;
        let base = self.offsets[node_id as usize] as usize;
        let mut out = vec![0.0; na * self.card_count];
        for h in 0..self.card_count {
            let mut sum = 0.0;
            for a in 0..na {
                sum += self.avg_strategy[base + h * na + a];
            }
            if sum > 0.0 {
                for a in 0..na {
                    out[h * na + a] = self.avg_strategy[base + h * na + a] / sum;
                }
            } else {
                out[h * na] = 1.0;
            }
        }
        out
    }

    /// Both players' average root cfvs in absolute seat order
    /// (`[player0, player1]`), scaled the same way as the fields of
    /// [`ResolveResults`]. Board-blocked hands are zero, since every
    /// cfv computation underneath (terminal equity, oracle) zeros them.
    pub fn get_root_cfv_both_players(&self) -> [Vec<f64>; 2] {
        let iters = (self.params.cfr_iters - self.params.cfr_skip_iters) as f64;
        let cfv0: Vec<f64> = self.avg_cfvs_root[0].iter().map(|&v| v / iters).collect();
        let cfv1: Vec<f64> = self.avg_cfvs_root[1].iter().map(|&v| v / iters).collect();
        [cfv0, cfv1]
    }

    pub fn get_results(&self) -> ResolveResults {
        let root = self.tree.root();
        let na = self.tree.node(root).children.len();
        let iters = (self.params.cfr_iters - self.params.cfr_skip_iters) as f64;

        let mut strategy = vec![0.0; na * self.card_count];
        for h in 0..self.card_count {
            let mut sum = 0.0;
            for a in 0..na {
                sum += self.avg_strategy_root[h * na + a];
            }
            if sum > 0.0 {
                for a in 0..na {
                    strategy[h * na + a] = self.avg_strategy_root[h * na + a] / sum;
                }
            } else {
                // zero reach: strategy is irrelevant, but must still sum to 1 — default to folding.
                strategy[h * na] = 1.0;
            }
        }

        let resolver = self.resolving_player;
        let opponent = 1 - resolver;
        let achieved_cfvs: Vec<f64> = self.avg_cfvs_root[opponent].iter().map(|&v| v / iters).collect();
        let root_cfvs = if self.reconstructing {
            None
        } else {
            Some(self.avg_cfvs_root[resolver].iter().map(|&v| v / iters).collect())
        };

        let mut children_cfvs = self.avg_children_cfvs_root.clone();
        for a in 0..na {
            let mut scaler = 0.0;
            for h in 0..self.card_count {
                scaler += strategy[h * na + a] * self.root_range[resolver][h];
            }
            scaler *= iters;
            if scaler > 0.0 {
                for h in 0..self.card_count {
                    children_cfvs[h * na + a] /= scaler;
                }
            }
        }

        ResolveResults { strategy, num_root_actions: na, achieved_cfvs, root_cfvs, children_cfvs }
    }
}

/// The opponent's cfv for a freshly dealt board given the resolving player's
/// post-action range and the opponent's range, queried directly through the
/// oracle without building a lookahead. Used by continual re-solving to
/// bridge a street transition using the *previous* decision's solved ranges,
/// since by the time the new street's board is known that lookahead is gone.
///
/// `resolving_player` is the absolute seat (0 or 1) that was resolving at
/// the decision which produced `range0`/`range1`; the oracle always sees the
/// resolver's bucket range first and the opponent's second, matching
/// [`Lookahead`]'s depth-limit leaves.
pub(crate) fn chance_action_cfv(
    oracle: &dyn ValueOracle,
    params: &GameParams,
    board: &[Card],
    range0: &[f64],
    range1: &[f64],
    resolving_player: usize,
    pot: f64,
) -> Vec<f64> {
    let card_count = params.card_count();
    let bc = BucketConversion::new(board, params);
    let bucket_count = bc.bucket_count();

    let (resolver_range, opponent_range) = if resolving_player == 0 { (range0, range1) } else { (range1, range0) };
    let mut b_resolver = vec![0.0; bucket_count];
    let mut b_opponent = vec![0.0; bucket_count];
    bc.card_range_to_bucket_range(resolver_range, &mut b_resolver);
    bc.card_range_to_bucket_range(opponent_range, &mut b_opponent);

    let mut inputs = vec![0.0; 2 * bucket_count];
    inputs[..bucket_count].copy_from_slice(&b_resolver);
    inputs[bucket_count..].copy_from_slice(&b_opponent);
    let mut outputs = vec![0.0; 2 * bucket_count];
    oracle.get_value(&inputs, &mut outputs, 1, bucket_count);

    // the opponent's cfv always lands in the second output slot post-swap,
    // regardless of which absolute seat is resolving.
    let mut cfv = vec![0.0; card_count];
    bc.bucket_value_to_card_value(&outputs[bucket_count..], &mut cfv);
    scale(&mut cfv, pot);
    cfv
}

fn scale(v: &mut [f64], factor: f64) {
    for x in v.iter_mut() {
        *x *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet_sizing::BetSizing;
    use crate::card_tools::uniform_range;
    use crate::tree::{TreeBuilder, TreeParams};
    use crate::value_oracle::ZeroValueOracle;

    fn small_params() -> GameParams {
        GameParams::new(100.0, 300.0, 3, 2, 1, 2, vec![1.0], 60, 20).unwrap()
    }

    fn build_tree(p: &GameParams, limit_to_street: bool) -> (BetSizing, PublicTree) {
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, p);
        (bs, tree)
    }

    #[test]
    fn resolve_first_node_produces_normalized_strategy() {
        let p = small_params();
        let (_bs, tree) = build_tree(&p, true);
        let oracle = ZeroValueOracle;
        let mut lookahead = Lookahead::new(&tree, &p, &oracle);
        let range0 = uniform_range(&[], &p);
        let range1 = uniform_range(&[], &p);
        lookahead.resolve_first_node(range0, range1);
        let results = lookahead.get_results();
        for h in 0..p.card_count() {
            let sum: f64 = (0..results.num_root_actions).map(|a| results.strategy[h * results.num_root_actions + a]).sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn resolve_with_gadget_reports_no_root_cfvs() {
        let p = small_params();
        let (_bs, tree) = build_tree(&p, true);
        let oracle = ZeroValueOracle;
        let mut lookahead = Lookahead::new(&tree, &p, &oracle);
        let player_range = uniform_range(&[], &p);
        let opponent_cfvs = vec![0.0; p.card_count()];
        lookahead.resolve(player_range, opponent_cfvs);
        let results = lookahead.get_results();
        assert!(results.root_cfvs.is_none());
    }

    #[test]
    fn children_cfvs_shaped_by_root_action_count() {
        let p = small_params();
        let (_bs, tree) = build_tree(&p, true);
        let oracle = ZeroValueOracle;
        let mut lookahead = Lookahead::new(&tree, &p, &oracle);
        let range0 = uniform_range(&[], &p);
        let range1 = uniform_range(&[], &p);
        lookahead.resolve_first_node(range0, range1);
        let results = lookahead.get_results();
        assert_eq!(results.children_cfvs.len(), results.num_root_actions * p.card_count());
    }

    #[test]
    fn root_cfv_both_players_zeros_board_blocked_hands() {
        let p = GameParams::new(100.0, 1200.0, 3, 2, 1, 2, vec![1.0], 100, 20).unwrap();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let board = vec![2u8];
        let tp = TreeParams { street: 2, bets: [100.0, 100.0], current_player: 0, board: board.clone(), limit_to_street: true, bet_sizing: &bs };
        let tree = TreeBuilder::build(&tp, &p);
        let oracle = ZeroValueOracle;
        let mut lookahead = Lookahead::new(&tree, &p, &oracle);

        let player_range = vec![0.1429, 0.0607, 0.0, 0.3054, 0.1803, 0.3107];
        let opponent_range = vec![0.2500, 0.2328, 0.0, 0.0446, 0.2514, 0.2212];
        lookahead.resolve_first_node(player_range.clone(), opponent_range.clone());

        let cfvs = lookahead.get_root_cfv_both_players();
        assert_eq!(cfvs[0][2], 0.0);
        assert_eq!(cfvs[1][2], 0.0);
        for h in 0..p.card_count() {
            if h != 2 {
                assert!(cfvs[0][h].is_finite());
                assert!(cfvs[1][h].is_finite());
            }
        }

        let zero_sum: f64 = (0..p.card_count()).map(|h| player_range[h] * cfvs[0][h] + opponent_range[h] * cfvs[1][h]).sum();
        assert!(zero_sum.abs() < 5.0, "root cfvs should be near zero-sum, got {zero_sum}");
    }
}
