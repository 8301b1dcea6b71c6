//! Depth-limited continual re-solving core for a Leduc-family
//! imperfect-information poker game: a public game tree, CFR+ over it, a
//! value-oracle seam at the depth limit, and the continual re-solving loop
//! that turns per-decision solves into play.

pub mod best_response;
pub mod bet_sizing;
pub mod bucket_conversion;
pub mod bucketer;
pub mod card_tools;
pub mod cards;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod gadget;
pub mod lookahead;
pub mod resolver;
pub mod terminal_equity;
pub mod training_data;
pub mod tree;
pub mod value_oracle;

pub use best_response::{exploitability, BestResponse};
pub use config::GameParams;
pub use error::{CoreError, CoreResult};
pub use lookahead::{Lookahead, ResolveResults};
pub use resolver::{ChosenAction, ContinualResolver, DecisionNode};
pub use tree::{PublicTree, TreeBuilder, TreeParams};
pub use value_oracle::ValueOracle;
