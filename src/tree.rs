//! The public game tree: nodes hold betting/board state, not ranges. Stored
//! as a flat arena (`Vec<PublicNode>`) with children/parent referenced by
//! index, so the tree can be built once and walked by index from the
//! lookahead without pointer chasing.

use serde::{Deserialize, Serialize};

use crate::bet_sizing::{BetSizing, BetState};
use crate::cards::{enumerate_boards, Card};
use crate::config::GameParams;

pub type NodeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A player must act.
    Player,
    /// A board card is dealt; exactly one street-transition in this game.
    Chance,
    /// One player folded.
    TerminalFold,
    /// Both players' bets matched at showdown (or one shoved and the other called).
    TerminalCall,
}

/// The action that produced a child from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Fold,
    /// Check (bets already equal) or call (matches the opponent's bet).
    Call,
    /// A raise to this total commitment for the acting player.
    Bet(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicNode {
    pub kind: NodeKind,
    pub street: u8,
    pub board: Vec<Card>,
    /// 0 or 1 for a player node, 2 for chance/terminal (no player acts there).
    pub current_player: u8,
    pub bets: [f64; 2],
    pub pot: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Parallel to `children`: the action that leads to each child.
    pub actions: Vec<Action>,
    /// Height of the subtree rooted here (0 for a leaf).
    pub depth: u32,
}

pub const CHANCE_PLAYER: u8 = 2;

impl PublicNode {
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::TerminalFold | NodeKind::TerminalCall)
    }
}

/// An arena-backed public tree, built once by [`TreeBuilder::build`].
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicTree {
    nodes: Vec<PublicNode>,
    root: NodeId,
}

impl PublicTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &PublicNode {
        &self.nodes[id as usize]
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id as usize].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A serializable snapshot of the tree, for the out-of-scope visualizer
    /// boundary: this crate produces the data, nothing here renders it.
    pub fn to_view(&self) -> PublicNodeView {
        self.view_of(self.root)
    }

    fn view_of(&self, id: NodeId) -> PublicNodeView {
        let n = &self.nodes[id as usize];
        PublicNodeView {
            kind: n.kind,
            street: n.street,
            board: n.board.clone(),
            current_player: n.current_player,
            bets: n.bets,
            pot: n.pot,
            depth: n.depth,
            children: n.children.iter().map(|&c| self.view_of(c)).collect(),
        }
    }
}

/// Serde-only snapshot of a subtree, independent of arena indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicNodeView {
    pub kind: NodeKind,
    pub street: u8,
    pub board: Vec<Card>,
    pub current_player: u8,
    pub bets: [f64; 2],
    pub pot: f64,
    pub depth: u32,
    pub children: Vec<PublicNodeView>,
}

impl PublicNodeView {
    /// Pretty-printed JSON, for handing a snapshot to an external visualizer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Parameters for the root of a tree to build.
pub struct TreeParams<'a> {
    pub street: u8,
    pub bets: [f64; 2],
    pub current_player: u8,
    pub board: Vec<Card>,
    /// Stop expanding past the current street: chance nodes are left as
    /// leaves, which is exactly the depth limit a value oracle fills in.
    pub limit_to_street: bool,
    pub bet_sizing: &'a BetSizing,
}

pub struct TreeBuilder<'a> {
    params: &'a GameParams,
    bet_sizing: &'a BetSizing,
    limit_to_street: bool,
    nodes: Vec<PublicNode>,
}

impl<'a> TreeBuilder<'a> {
    pub fn build(tree_params: &TreeParams<'a>, params: &'a GameParams) -> PublicTree {
        let mut builder = TreeBuilder {
            params,
            bet_sizing: tree_params.bet_sizing,
            limit_to_street: tree_params.limit_to_street,
            nodes: Vec::new(),
        };
        let root = builder.push(PublicNode {
            kind: NodeKind::Player,
            street: tree_params.street,
            board: tree_params.board.clone(),
            current_player: tree_params.current_player,
            bets: tree_params.bets,
            pot: tree_params.bets[0].min(tree_params.bets[1]),
            parent: None,
            children: Vec::new(),
            actions: Vec::new(),
            depth: 0,
        });
        builder.build_dfs(root);
        PublicTree { nodes: builder.nodes, root }
    }

    fn push(&mut self, node: PublicNode) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    fn build_dfs(&mut self, id: NodeId) {
        let node = self.nodes[id as usize].clone();
        if node.is_terminal() {
            return;
        }
        let (children, actions) = if node.current_player == CHANCE_PLAYER {
            self.chance_children(&node, id)
        } else {
            self.player_children(&node, id)
        };

        let mut depth = 0u32;
        let mut child_ids = Vec::with_capacity(children.len());
        for child in children {
            let cid = self.push(child);
            self.build_dfs(cid);
            depth = depth.max(self.nodes[cid as usize].depth);
            child_ids.push(cid);
        }
        let node = &mut self.nodes[id as usize];
        node.children = child_ids;
        node.actions = actions;
        node.depth = depth + 1;
    }

    fn chance_children(&self, node: &PublicNode, parent: NodeId) -> (Vec<PublicNode>, Vec<Action>) {
        if self.limit_to_street {
            return (Vec::new(), Vec::new());
        }
        let mut children = Vec::new();
        for board in enumerate_boards(self.params) {
            if !node.board.iter().all(|c| board.contains(c)) {
                continue;
            }
            children.push(PublicNode {
                kind: NodeKind::Player,
                street: node.street + 1,
                board,
                current_player: 0,
                bets: node.bets,
                pot: node.bets[0].min(node.bets[1]),
                parent: Some(parent),
                children: Vec::new(),
                actions: Vec::new(),
                depth: 0,
            });
        }
        let actions = vec![Action::Call; children.len()];
        (children, actions)
    }

    fn player_children(&self, node: &PublicNode, parent: NodeId) -> (Vec<PublicNode>, Vec<Action>) {
        let mut children = Vec::new();
        let mut actions = Vec::new();

        let opponent = 1 - node.current_player;

        // fold
        children.push(PublicNode {
            kind: NodeKind::TerminalFold,
            street: node.street,
            board: node.board.clone(),
            current_player: opponent,
            bets: node.bets,
            pot: node.bets[0].min(node.bets[1]),
            parent: Some(parent),
            children: Vec::new(),
            actions: Vec::new(),
            depth: 0,
        });
        actions.push(Action::Fold);

        let bets_equal = node.bets[0] == node.bets[1];
        let max_bet = node.bets[0].max(node.bets[1]);

        if node.current_player == 0 && bets_equal {
            // check: action passes to the opponent, nothing else changes.
            children.push(PublicNode {
                kind: NodeKind::Player,
                street: node.street,
                board: node.board.clone(),
                current_player: opponent,
                bets: node.bets,
                pot: node.bets[0].min(node.bets[1]),
                parent: Some(parent),
                children: Vec::new(),
                actions: Vec::new(),
                depth: 0,
            });
            actions.push(Action::Call);
        } else if node.street < self.params.streets_count
            && ((node.current_player == 1 && bets_equal)
                || (!bets_equal && max_bet < self.params.stack))
        {
            // a call that still has another street left to deal transitions
            // to a chance node rather than going straight to showdown.
            children.push(PublicNode {
                kind: NodeKind::Chance,
                street: node.street,
                board: node.board.clone(),
                current_player: CHANCE_PLAYER,
                bets: [max_bet, max_bet],
                pot: max_bet,
                parent: Some(parent),
                children: Vec::new(),
                actions: Vec::new(),
                depth: 0,
            });
            actions.push(Action::Call);
        } else {
            // last street, or one side is already all-in: call ends the hand.
            children.push(PublicNode {
                kind: NodeKind::TerminalCall,
                street: node.street,
                board: node.board.clone(),
                current_player: opponent,
                bets: [max_bet, max_bet],
                pot: max_bet,
                parent: Some(parent),
                children: Vec::new(),
                actions: Vec::new(),
                depth: 0,
            });
            actions.push(Action::Call);
        }

        let state = BetState { bets: node.bets, current_player: node.current_player as usize };
        for bet in self.bet_sizing.possible_bets(&state, self.params.ante, self.params.stack) {
            children.push(PublicNode {
                kind: NodeKind::Player,
                street: node.street,
                board: node.board.clone(),
                current_player: opponent,
                bets: bet,
                pot: bet[0].min(bet[1]),
                parent: Some(parent),
                children: Vec::new(),
                actions: Vec::new(),
                depth: 0,
            });
            actions.push(Action::Bet(bet[0].max(bet[1])));
        }

        (children, actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GameParams {
        GameParams::leduc_default()
    }

    #[test]
    fn root_has_fold_and_call_children() {
        let p = params();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: true,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, &p);
        let root = tree.node(tree.root());
        assert_eq!(root.kind, NodeKind::Player);
        assert!(root.actions.contains(&Action::Fold));
        assert!(root.actions.contains(&Action::Call));
    }

    #[test]
    fn limit_to_street_leaves_chance_nodes_childless() {
        let p = params();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: true,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, &p);
        let root = tree.node(tree.root());
        let check_child = tree.node(root.children[1]);
        assert_eq!(check_child.kind, NodeKind::Player);
        let check_child_state = BetState { bets: check_child.bets, current_player: 1 };
        let _ = check_child_state;
        // opponent checks back too: should transition to a chance node, left childless.
        let second_check = tree.node(check_child.children[1]);
        assert_eq!(second_check.kind, NodeKind::Chance);
        assert!(second_check.children.is_empty());
    }

    #[test]
    fn fully_built_tree_reaches_showdown() {
        let p = params();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: false,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, &p);
        assert!(tree.len() > 1);
        fn has_terminal(tree: &PublicTree, id: NodeId) -> bool {
            let n = tree.node(id);
            if n.is_terminal() {
                return true;
            }
            n.children.iter().any(|&c| has_terminal(tree, c))
        }
        assert!(has_terminal(&tree, tree.root()));
    }

    #[test]
    fn betting_past_stack_is_never_offered() {
        let p = params();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: false,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, &p);
        for n in 0..tree.len() as NodeId {
            let node = tree.node(n);
            assert!(node.bets[0] <= p.stack && node.bets[1] <= p.stack);
        }
    }

    #[test]
    fn view_round_trips_through_json() {
        let p = params();
        let bs = BetSizing::new(p.bet_sizing.clone());
        let tp = TreeParams {
            street: 1,
            bets: [p.ante, p.ante],
            current_player: 0,
            board: Vec::new(),
            limit_to_street: true,
            bet_sizing: &bs,
        };
        let tree = TreeBuilder::build(&tp, &p);
        let view = tree.to_view();
        let json = view.to_json().unwrap();
        let parsed: PublicNodeView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, view.kind);
        assert_eq!(parsed.children.len(), view.children.len());
    }
}
