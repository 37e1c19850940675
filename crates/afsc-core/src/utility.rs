//! Utility scoring of (cadet, job) pairs.
//!
//! Scores come from an ordered table of [`UtilityRule`]s evaluated top to
//! bottom; the first rule whose qualification and rank conditions match
//! decides the formula. The default table ([`DEFAULT_RULES`]):
//!
//! | Qualification | Ranked | Score |
//! |---|---|---|
//! | Mandatory | yes | `10 * percentile / rank + 250` |
//! | Desired | yes | `10 * percentile / rank + 150` |
//! | Permitted | yes | `10 * percentile / rank` |
//! | Mandatory | no | `100 * percentile` |
//! | Desired | no | `50 * percentile` |
//! | Permitted | no | `0` |
//! | unspecified | any | deviation penalty |

use std::borrow::Cow;

use crate::domain::{Cadet, JobCategory, Qualification, Rank};

/// Default utility of assigning a cadet to a job they are not qualified for.
pub const DEFAULT_DEVIATION_PENALTY: f64 = -50_000.0;

/// Scale applied to `percentile / rank` for ranked placements.
pub const RANK_WEIGHT_SCALE: f64 = 10.0;

/// Qualification condition of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualificationMatch {
    /// The cadet holds exactly this tier for the job.
    Tier(Qualification),
    /// The cadet has no attested tier for the job.
    Unspecified,
    /// Any tier, attested or not.
    Any,
}

impl QualificationMatch {
    fn matches(self, qualification: Option<Qualification>) -> bool {
        match self {
            QualificationMatch::Tier(tier) => qualification == Some(tier),
            QualificationMatch::Unspecified => qualification.is_none(),
            QualificationMatch::Any => true,
        }
    }
}

/// Rank condition of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMatch {
    Ranked,
    Unranked,
    Any,
}

impl RankMatch {
    fn matches(self, rank: Option<Rank>) -> bool {
        match self {
            RankMatch::Ranked => rank.is_some(),
            RankMatch::Unranked => rank.is_none(),
            RankMatch::Any => true,
        }
    }
}

/// Formula applied once a rule matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UtilityFormula {
    /// `RANK_WEIGHT_SCALE * percentile / rank + bonus`. An unranked pair
    /// contributes only `bonus`.
    RankWeighted { bonus: f64 },
    /// `factor * percentile`.
    PercentileScaled { factor: f64 },
    /// A fixed utility.
    Constant(f64),
    /// The scorer's deviation penalty.
    DeviationPenalty,
}

impl UtilityFormula {
    fn evaluate(self, percentile: f64, rank: Option<Rank>, deviation_penalty: f64) -> f64 {
        match self {
            UtilityFormula::RankWeighted { bonus } => {
                let weight = rank.map_or(0.0, Rank::weight);
                RANK_WEIGHT_SCALE * percentile * weight + bonus
            }
            UtilityFormula::PercentileScaled { factor } => factor * percentile,
            UtilityFormula::Constant(value) => value,
            UtilityFormula::DeviationPenalty => deviation_penalty,
        }
    }
}

/// One row of the utility table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilityRule {
    pub qualification: QualificationMatch,
    pub rank: RankMatch,
    pub formula: UtilityFormula,
}

impl UtilityRule {
    pub const fn new(
        qualification: QualificationMatch,
        rank: RankMatch,
        formula: UtilityFormula,
    ) -> Self {
        Self {
            qualification,
            rank,
            formula,
        }
    }

    /// Returns true when both conditions hold for the given inputs.
    pub fn matches(&self, qualification: Option<Qualification>, rank: Option<Rank>) -> bool {
        self.qualification.matches(qualification) && self.rank.matches(rank)
    }
}

/// The default ordered rule table.
pub const DEFAULT_RULES: &[UtilityRule] = &[
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Mandatory),
        RankMatch::Ranked,
        UtilityFormula::RankWeighted { bonus: 250.0 },
    ),
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Desired),
        RankMatch::Ranked,
        UtilityFormula::RankWeighted { bonus: 150.0 },
    ),
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Permitted),
        RankMatch::Ranked,
        UtilityFormula::RankWeighted { bonus: 0.0 },
    ),
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Mandatory),
        RankMatch::Unranked,
        UtilityFormula::PercentileScaled { factor: 100.0 },
    ),
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Desired),
        RankMatch::Unranked,
        UtilityFormula::PercentileScaled { factor: 50.0 },
    ),
    UtilityRule::new(
        QualificationMatch::Tier(Qualification::Permitted),
        RankMatch::Unranked,
        UtilityFormula::Constant(0.0),
    ),
    UtilityRule::new(
        QualificationMatch::Unspecified,
        RankMatch::Any,
        UtilityFormula::DeviationPenalty,
    ),
];

/// Maps (cadet, job) pairs to utility.
///
/// Pure and deterministic: the score depends only on the cadet's tier and
/// rank for the job, their percentile, and the scorer's table and penalty.
///
/// # Example
///
/// ```
/// use afsc_core::{Cadet, JobCategory, Preferences, Qualification, UtilityScorer};
///
/// let job = JobCategory::new("17D", 2);
/// let cadet = Cadet::new("Cadet 1", 0.6)
///     .unwrap()
///     .with_preferences(Preferences::from_ordered([job.id().clone()]).unwrap())
///     .with_qualification(job.id().clone(), Qualification::Mandatory);
///
/// let scorer = UtilityScorer::default();
/// assert!((scorer.score(&cadet, &job) - 256.0).abs() < 1e-9);
///
/// let stranger = Cadet::new("Cadet 2", 0.6).unwrap();
/// assert_eq!(scorer.score(&stranger, &job), scorer.deviation_penalty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UtilityScorer {
    rules: Cow<'static, [UtilityRule]>,
    deviation_penalty: f64,
}

impl UtilityScorer {
    /// Creates a scorer using [`DEFAULT_RULES`].
    pub fn new(deviation_penalty: f64) -> Self {
        Self {
            rules: Cow::Borrowed(DEFAULT_RULES),
            deviation_penalty,
        }
    }

    /// Replaces the rule table.
    pub fn with_rules(mut self, rules: Vec<UtilityRule>) -> Self {
        self.rules = Cow::Owned(rules);
        self
    }

    /// Replaces the deviation penalty, keeping the rule table.
    pub fn with_deviation_penalty(mut self, deviation_penalty: f64) -> Self {
        self.deviation_penalty = deviation_penalty;
        self
    }

    pub fn rules(&self) -> &[UtilityRule] {
        &self.rules
    }

    pub fn deviation_penalty(&self) -> f64 {
        self.deviation_penalty
    }

    /// Scores assigning `cadet` to `job`.
    pub fn score(&self, cadet: &Cadet, job: &JobCategory) -> f64 {
        let id = job.id();
        self.score_inputs(
            cadet.qualification_for(id),
            cadet.rank_for(id),
            cadet.percentile(),
        )
    }

    /// Scores raw inputs. Inputs matching no rule score the deviation penalty.
    pub fn score_inputs(
        &self,
        qualification: Option<Qualification>,
        rank: Option<Rank>,
        percentile: f64,
    ) -> f64 {
        match self.matching_rule(qualification, rank) {
            Some(rule) => rule
                .formula
                .evaluate(percentile, rank, self.deviation_penalty),
            None => self.deviation_penalty,
        }
    }

    /// Returns the first rule matching the inputs.
    pub fn matching_rule(
        &self,
        qualification: Option<Qualification>,
        rank: Option<Rank>,
    ) -> Option<&UtilityRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(qualification, rank))
    }
}

impl Default for UtilityScorer {
    fn default() -> Self {
        Self::new(DEFAULT_DEVIATION_PENALTY)
    }
}
