//! Continual re-solving: tracks the resolving player's range and the
//! opponent's counterfactual values across a hand, re-solving a fresh
//! depth-limited lookahead at every decision instead of storing one
//! strategy for the whole game tree up front.

use rand::Rng;

use crate::bet_sizing::BetSizing;
use crate::card_tools::{normalize_range, uniform_range};
use crate::cards::Card;
use crate::config::GameParams;
use crate::lookahead::{chance_action_cfv, Lookahead};
use crate::tree::{Action, TreeBuilder, TreeParams};
use crate::value_oracle::ValueOracle;

/// A game state the resolving player must act at.
pub struct DecisionNode {
    pub board: Vec<Card>,
    pub street: u8,
    pub current_player: u8,
    pub bets: [f64; 2],
}

/// The re-solving player's hole card and the chosen action at a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChosenAction {
    pub action: Action,
    pub action_index: usize,
}

pub struct ContinualResolver<'a> {
    params: &'a GameParams,
    oracle: &'a dyn ValueOracle,
    bet_sizing: BetSizing,
    hand: Card,
    position: u8,

    starting_player_range: Vec<f64>,
    starting_cfvs: Vec<f64>,

    current_player_range: Vec<f64>,
    current_opponent_cfvs: Vec<f64>,

    last_street: Option<u8>,
    /// State from the previous decision's solved lookahead, kept around just
    /// long enough to bridge a street change: the resolving player's range
    /// after taking the action that ended the previous street, the
    /// opponent's range at that point, the pot behind that action, and whose
    /// turn it was. The lookahead itself doesn't survive past the call that
    /// solved it, so this is all `get_chance_action_cfv` needs reconstructed.
    last_transition: Option<StreetTransition>,
    decision_id: usize,
}

#[derive(Clone)]
struct StreetTransition {
    range0: Vec<f64>,
    range1: Vec<f64>,
    pot: f64,
    current_player: usize,
}

impl<'a> ContinualResolver<'a> {
    /// Does a depth-limited solve of the game's first node to obtain opponent
    /// cfvs for the case where the resolving player acts second.
    pub fn new(params: &'a GameParams, oracle: &'a dyn ValueOracle, hand: Card, position: u8) -> Self {
        let starting_player_range = uniform_range(&[], params);
        let bet_sizing = BetSizing::new(params.bet_sizing.clone());

        let root = DecisionNode { board: Vec::new(), street: 1, current_player: 0, bets: [params.ante, params.ante] };
        let tp = TreeParams {
            street: root.street,
            bets: root.bets,
            current_player: root.current_player,
            board: root.board.clone(),
            limit_to_street: true,
            bet_sizing: &bet_sizing,
        };
        let tree = TreeBuilder::build(&tp, params);
        let mut lookahead = Lookahead::new(&tree, params, oracle);
        let player_range = uniform_range(&[], params);
        let opponent_range = uniform_range(&[], params);
        lookahead.resolve_first_node(player_range, opponent_range);
        let results = lookahead.get_results();
        let starting_cfvs = results.achieved_cfvs;

        ContinualResolver {
            params,
            oracle,
            bet_sizing,
            hand,
            position,
            starting_player_range,
            starting_cfvs,
            current_player_range: Vec::new(),
            current_opponent_cfvs: Vec::new(),
            last_street: None,
            last_transition: None,
            decision_id: 0,
        }
    }

    /// Resets book-keeping to start a new hand from the root.
    pub fn start_new_hand(&mut self, hand: Card, position: u8) {
        self.hand = hand;
        self.position = position;
        self.last_street = None;
        self.last_transition = None;
        self.decision_id = 0;
        self.current_player_range = Vec::new();
        self.current_opponent_cfvs = Vec::new();
    }

    fn update_invariant(&mut self, node: &DecisionNode) {
        match self.last_street {
            Some(last) if last != node.street => {
                let t = self
                    .last_transition
                    .as_ref()
                    .expect("street change always follows a recorded action");
                self.current_opponent_cfvs =
                    chance_action_cfv(self.oracle, self.params, &node.board, &t.range0, &t.range1, t.current_player, t.pot);
                self.current_player_range = normalize_range(&node.board, &self.current_player_range, self.params);
            }
            None if self.decision_id == 0 && self.position == 1 => {
                self.current_player_range = self.starting_player_range.clone();
                self.current_opponent_cfvs = self.starting_cfvs.clone();
            }
            _ => {}
        }
    }

    /// Re-solves at `node` and samples the resolving player's next action
    /// for `self.hand`, updating the tracked range and opponent cfvs.
    pub fn compute_action<R: Rng>(&mut self, node: &DecisionNode, rng: &mut R) -> ChosenAction {
        let tp = TreeParams {
            street: node.street,
            bets: node.bets,
            current_player: node.current_player,
            board: node.board.clone(),
            limit_to_street: true,
            bet_sizing: &self.bet_sizing,
        };
        let tree = TreeBuilder::build(&tp, self.params);
        let mut lookahead = Lookahead::new(&tree, self.params, self.oracle);

        if self.decision_id == 0 && self.position == 0 {
            self.current_player_range = self.starting_player_range.clone();
            lookahead.resolve_first_node(self.current_player_range.clone(), self.starting_player_range.clone());
        } else {
            self.update_invariant(node);
            lookahead.resolve(self.current_player_range.clone(), self.current_opponent_cfvs.clone());
        }

        let results = lookahead.get_results();
        let na = results.num_root_actions;
        let hand = self.hand as usize;

        let mut cumulative = 0.0;
        let r: f64 = rng.gen();
        let mut chosen = na - 1;
        for a in 0..na {
            cumulative += results.strategy[hand * na + a];
            if r < cumulative {
                chosen = a;
                break;
            }
        }

        self.current_opponent_cfvs = (0..self.params.card_count())
            .map(|h| results.children_cfvs[h * na + chosen])
            .collect();

        let root_range = lookahead.root_range();
        let resolving = node.current_player as usize;
        let mut range0 = root_range[0].clone();
        let mut range1 = root_range[1].clone();
        {
            let acting_range = if resolving == 0 { &mut range0 } else { &mut range1 };
            for (h, p) in acting_range.iter_mut().enumerate() {
                *p *= results.strategy[h * na + chosen];
            }
        }
        let root_id = tree.root();
        let child_id = tree.node(root_id).children[chosen];
        let pot = tree.node(child_id).pot;
        self.last_transition = Some(StreetTransition { range0, range1, pot, current_player: resolving });

        for (h, p) in self.current_player_range.iter_mut().enumerate() {
            *p *= results.strategy[h * na + chosen];
        }
        self.current_player_range = normalize_range(&node.board, &self.current_player_range, self.params);

        self.decision_id += 1;
        self.last_street = Some(node.street);
        let action = tree_root_action(&tree, chosen);
        log::debug!("decision {}: street {} player {} -> action {:?}", self.decision_id, node.street, node.current_player, action);

        ChosenAction { action, action_index: chosen }
    }
}

fn tree_root_action(tree: &crate::tree::PublicTree, action_index: usize) -> Action {
    let root = tree.node(tree.root());
    root.actions[action_index]
}
