//! Most general unifier strategies
//!
//! Every strategy takes a [`TermPair`] and either finds the most general
//! unifier of its two sides or reports that none exists. Strategies never
//! modify the pair they are given, those which work destructively take a
//! [deep copy](TermPair::deep_copy) first.

use std::{fmt, str::FromStr};

use value_type::value_type;

pub use self::{
    disagreement::DisagreementSet, paterson_wegman::PatersonWegman,
    polynomial::PolynomialRobinson, robinson::Robinson,
};
use crate::{
    substitution::Substitution,
    term::{Name, Term, TermPair},
};

mod disagreement;
mod paterson_wegman;
mod polynomial;
mod robinson;

/// A way of computing most general unifiers
pub trait Strategy: fmt::Debug + Send + Sync {
    /// Short human readable name
    fn name(&self) -> &'static str;

    /// Compute the most general unifier of the two sides of `pair`
    ///
    /// `pair` is left exactly as it was
    fn find_unifier(&self, pair: &TermPair) -> UnificationResult;
}

/// Outcome of a unification attempt
///
/// If the terms are not unifiable the unifier is the identity and carries no
/// meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnificationResult {
    unifiable: bool,
    unifier: Substitution,
}

impl UnificationResult {
    /// Successful outcome
    #[must_use]
    pub fn unifiable(unifier: Substitution) -> Self {
        Self {
            unifiable: true,
            unifier,
        }
    }

    /// Failed outcome
    #[must_use]
    pub fn not_unifiable() -> Self {
        Self {
            unifiable: false,
            unifier: Substitution::identity(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_unifiable(&self) -> bool {
        self.unifiable
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn unifier(&self) -> &Substitution {
        &self.unifier
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn into_unifier(self) -> Substitution {
        self.unifier
    }

    /// Apply the unifier to the left side of `pair`, giving the common
    /// instance of both sides. `None` if the sides are not unifiable
    #[must_use]
    pub fn unified_term(&self, pair: &TermPair) -> Option<Term> {
        self.unifiable
            .then(|| self.unifier.instantiate_variables(&pair.term1()))
    }
}

/// Reasons a strategy gives up
#[derive(Debug, thiserror::Error)]
pub(crate) enum Mismatch {
    #[error("Symbol clash between {left} and {right}")]
    SymbolClash { left: Term, right: Term },
    #[error("Variable {variable} occurs in {term}")]
    OccursCheck { variable: Name, term: Term },
    #[error("Cycle through {term}")]
    Cycle { term: Term },
}

fn conclude(
    strategy: &'static str,
    outcome: Result<Substitution, Mismatch>,
) -> UnificationResult {
    match outcome {
        Ok(unifier) => {
            tracing::debug!(strategy, %unifier, "Found unifier");
            UnificationResult::unifiable(unifier)
        }
        Err(mismatch) => {
            tracing::debug!(strategy, %mismatch, "Not unifiable");
            UnificationResult::not_unifiable()
        }
    }
}

/// The strategies available by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// [`Robinson`]
    #[default]
    Robinson,
    /// [`PolynomialRobinson`]
    PolynomialRobinson,
    /// [`PatersonWegman`]
    PatersonWegman,
}

impl Algorithm {
    /// Every registered algorithm
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Robinson,
        Algorithm::PolynomialRobinson,
        Algorithm::PatersonWegman,
    ];

    /// Name used to select the algorithm
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Robinson => "robinson",
            Algorithm::PolynomialRobinson => "robinson-poly",
            Algorithm::PatersonWegman => "paterson-wegman",
        }
    }

    /// Fresh instance of the strategy
    #[must_use]
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Algorithm::Robinson => Box::new(Robinson),
            Algorithm::PolynomialRobinson => Box::new(PolynomialRobinson),
            Algorithm::PatersonWegman => Box::new(PatersonWegman),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// No algorithm is registered under the requested key
#[value_type]
#[derive(thiserror::Error)]
#[error("No such strategy {0:?}")]
pub struct UnknownStrategyError(pub String);

impl FromStr for Algorithm {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.key() == s)
            .ok_or_else(|| UnknownStrategyError(s.to_owned()))
    }
}

/// Look up a strategy by key
pub fn create(key: &str) -> Result<Box<dyn Strategy>, UnknownStrategyError> {
    let algorithm = key.parse::<Algorithm>()?;
    tracing::debug!(key, %algorithm, "Selected strategy");
    Ok(algorithm.strategy())
}
