pub mod alpha_beta_searcher;
pub mod arena;
pub mod bot;
pub mod evaluate;
pub mod mcts;
pub mod move_selector;
pub mod position;
pub mod traits;
