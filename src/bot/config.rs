//! Bot parameter sets and the roster file they are loaded from.
//!
//! A roster is a TOML file listing bots:
//!
//! ```toml
//! [[bots]]
//! name = "anchored"
//! seed = 3
//!
//! [bots.strategy]
//! kind = "alpha-beta"
//! depth = { fixed = 3 }
//! evaluator = { model = "piece-square", material_baseline = "search-start" }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alpha_beta_searcher::{AdaptiveDepth, DepthPolicy, MoveOrdering};
use crate::evaluate::{EndgameTrigger, EvaluatorConfig, MaterialBaseline, ScoringModel};
use crate::mcts::MctsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read roster {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse roster: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown bot {0:?}")]
    UnknownBot(String),
    #[error("invalid parameter for bot {bot:?}: {reason}")]
    InvalidParameter { bot: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StrategyConfig {
    UniformRandom,
    DistanceBiased,
    AttackBiased {
        attack_probability: f64,
    },
    AlphaBeta {
        #[serde(default)]
        evaluator: EvaluatorConfig,
        #[serde(default)]
        ordering: MoveOrdering,
        #[serde(default = "default_depth")]
        depth: DepthPolicy,
    },
    MonteCarlo(MctsConfig),
}

fn default_depth() -> DepthPolicy {
    DepthPolicy::Fixed(2)
}

impl StrategyConfig {
    /// Human-readable strategy name, used as the first part of a bot's
    /// display name.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyConfig::UniformRandom => "Random",
            StrategyConfig::DistanceBiased => "DistanceBiased",
            StrategyConfig::AttackBiased { .. } => "AttackBiased",
            StrategyConfig::AlphaBeta { .. } => "AlphaBeta",
            StrategyConfig::MonteCarlo(_) => "MonteCarlo",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    pub strategy: StrategyConfig,
}

impl BotConfig {
    pub fn new(name: &str, seed: u64, strategy: StrategyConfig) -> Self {
        Self {
            name: name.to_string(),
            seed,
            strategy,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidParameter {
            bot: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }

        match &self.strategy {
            StrategyConfig::UniformRandom | StrategyConfig::DistanceBiased => Ok(()),
            StrategyConfig::AttackBiased { attack_probability } => {
                if (0.0..=1.0).contains(attack_probability) {
                    Ok(())
                } else {
                    Err(invalid("attack_probability must be within [0, 1]"))
                }
            }
            StrategyConfig::AlphaBeta {
                evaluator, depth, ..
            } => {
                if evaluator.mate_bonus <= 0 {
                    return Err(invalid("mate_bonus must be positive"));
                }
                match depth {
                    DepthPolicy::Fixed(0) => Err(invalid("depth must be at least 1")),
                    DepthPolicy::Adaptive(adaptive) if adaptive.min_depth == 0 => {
                        Err(invalid("min_depth must be at least 1"))
                    }
                    DepthPolicy::Adaptive(adaptive) if adaptive.min_depth > adaptive.max_depth => {
                        Err(invalid("min_depth must not exceed max_depth"))
                    }
                    _ => Ok(()),
                }
            }
            StrategyConfig::MonteCarlo(config) => {
                if config.iterations == 0 || config.rollouts_per_expansion == 0 {
                    Err(invalid("iterations and rollouts_per_expansion must be positive"))
                } else if !(config.exploration >= 0.0) {
                    Err(invalid("exploration must be non-negative"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub bots: Vec<BotConfig>,
}

impl Default for Roster {
    /// The built-in line-up, weakest first.
    fn default() -> Self {
        let piece_square = EvaluatorConfig {
            model: ScoringModel::PieceSquare,
            ..EvaluatorConfig::default()
        };

        Self {
            bots: vec![
                BotConfig::new("random", 1, StrategyConfig::UniformRandom),
                BotConfig::new("dumb", 2, StrategyConfig::DistanceBiased),
                BotConfig::new(
                    "lessdumb",
                    3,
                    StrategyConfig::AttackBiased {
                        attack_probability: 0.8,
                    },
                ),
                BotConfig::new(
                    "ok",
                    4,
                    StrategyConfig::AlphaBeta {
                        evaluator: EvaluatorConfig::material(),
                        ordering: MoveOrdering::Shuffled,
                        depth: DepthPolicy::Fixed(2),
                    },
                ),
                BotConfig::new(
                    "victor",
                    5,
                    StrategyConfig::AlphaBeta {
                        evaluator: piece_square,
                        ordering: MoveOrdering::Shuffled,
                        depth: DepthPolicy::Fixed(3),
                    },
                ),
                BotConfig::new(
                    "anchored",
                    9,
                    StrategyConfig::AlphaBeta {
                        evaluator: EvaluatorConfig {
                            material_baseline: MaterialBaseline::SearchStart,
                            endgame: EndgameTrigger::MoveNumber(15),
                            ..piece_square
                        },
                        ordering: MoveOrdering::Shuffled,
                        depth: DepthPolicy::Fixed(3),
                    },
                ),
                BotConfig::new(
                    "adaptive",
                    6,
                    StrategyConfig::AlphaBeta {
                        evaluator: piece_square,
                        ordering: MoveOrdering::Prioritized { best: 5, random: 3 },
                        depth: DepthPolicy::Adaptive(AdaptiveDepth::new(2, 20_000)),
                    },
                ),
                BotConfig::new(
                    "complex",
                    7,
                    StrategyConfig::AlphaBeta {
                        evaluator: EvaluatorConfig::attack_defense(),
                        ordering: MoveOrdering::Shuffled,
                        depth: DepthPolicy::Fixed(2),
                    },
                ),
                BotConfig::new("monte", 8, StrategyConfig::MonteCarlo(MctsConfig::default())),
            ],
        }
    }
}

impl Roster {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let roster: Roster = toml::from_str(contents)?;
        roster.validate()?;
        Ok(roster)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for bot in &self.bots {
            bot.validate()?;
            if !names.insert(bot.name.as_str()) {
                return Err(ConfigError::InvalidParameter {
                    bot: bot.name.clone(),
                    reason: "duplicate bot name".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&BotConfig, ConfigError> {
        self.bots
            .iter()
            .find(|bot| bot.name == name)
            .ok_or_else(|| ConfigError::UnknownBot(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bots.iter().map(|bot| bot.name.as_str())
    }
}
