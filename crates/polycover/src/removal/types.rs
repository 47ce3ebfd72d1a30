/// Order in which a sweep visits pieces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalOrder {
    /// Highest index first.
    #[default]
    Reverse,
    Shuffled,
    /// Least harmful removal first, by [`removal_score`](super::removal_score).
    ByScore,
}

/// Knobs for the removal local search.
#[derive(Clone, Debug)]
pub struct RemovalCfg {
    /// Shuffle replacement candidates.
    pub randomize: bool,
    /// Shrink the removed piece and each candidate to what is strictly needed first.
    pub minimize: bool,
    /// Candidates tried per removal; 0 = all.
    pub replacement_choices: usize,
    /// Removals attempted per sweep; 0 = all pieces.
    pub removal_attempts: usize,
    pub order: RemovalOrder,
}

impl Default for RemovalCfg {
    fn default() -> Self {
        Self {
            randomize: false,
            minimize: false,
            replacement_choices: 0,
            removal_attempts: 0,
            order: RemovalOrder::Reverse,
        }
    }
}

impl RemovalCfg {
    /// Randomized candidates and a shuffled sweep.
    pub fn randomized() -> Self {
        Self {
            randomize: true,
            order: RemovalOrder::Shuffled,
            ..Self::default()
        }
    }
}
