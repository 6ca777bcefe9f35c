//! Enrichment passes and their per-version outcomes

use serde_json::Value;

use crate::error::CookbookError;

/// One enrichment step over a version record
///
/// Steps always run in declaration order: a git remote must be resolved to a
/// URL before a sub-path or hash can be derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Pass {
    /// Rewrite `git@github.com:` remotes into GitHub archive URLs
    GitRemote,
    /// Record the top-level directory of GitHub archives
    SubPath,
    /// Hash the source archive
    SourceHash,
    /// Hash the Buck build file
    BuildHash,
}

impl Pass {
    pub const ALL: [Pass; 4] = [
        Pass::GitRemote,
        Pass::SubPath,
        Pass::SourceHash,
        Pass::BuildHash,
    ];

    /// Dotted path of the field this pass writes
    pub fn field(self) -> &'static str {
        match self {
            Pass::GitRemote => "source.url",
            Pass::SubPath => "source.subPath",
            Pass::SourceHash => "source.sha256",
            Pass::BuildHash => "buck.sha256",
        }
    }
}

/// The set of passes enabled for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passes {
    enabled: [bool; 4],
}

impl Passes {
    pub fn all() -> Self {
        Self {
            enabled: [true; 4],
        }
    }

    /// Enable exactly the given passes; an empty selection enables all of them
    pub fn from_selection(selection: &[Pass]) -> Self {
        if selection.is_empty() {
            return Self::all();
        }
        let mut enabled = [false; 4];
        for pass in selection {
            enabled[*pass as usize] = true;
        }
        Self { enabled }
    }

    pub fn contains(self, pass: Pass) -> bool {
        self.enabled[pass as usize]
    }
}

impl Default for Passes {
    fn default() -> Self {
        Self::all()
    }
}

/// Why a step left its field alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The pass was not selected for this run
    Disabled,
    /// The version has nothing this pass works on
    NotApplicable,
    /// The field already has a value and is never re-derived
    AlreadyPresent,
    /// The input field exists but lacks what the pass needs (e.g. a `url`)
    MissingPrerequisite,
    /// An earlier step failed and the version is left as it was
    EarlierFailure,
}

/// Result of one step on one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Enriched { value: String },
    Unchanged(SkipReason),
    Failed(CookbookError),
}

/// An enriched version record and what happened to each of its fields
#[derive(Debug, Clone)]
pub struct VersionOutcome {
    pub version: Value,
    pub steps: Vec<(Pass, StepOutcome)>,
}

impl VersionOutcome {
    pub fn into_report(self, key: String) -> (Value, VersionReport) {
        (
            self.version,
            VersionReport {
                key,
                steps: self.steps,
            },
        )
    }
}

/// Step outcomes for one version key, kept after the record is written back
#[derive(Debug, Clone)]
pub struct VersionReport {
    pub key: String,
    pub steps: Vec<(Pass, StepOutcome)>,
}

impl VersionReport {
    pub fn enriched(&self) -> impl Iterator<Item = (Pass, &str)> {
        self.steps.iter().filter_map(|(pass, outcome)| match outcome {
            StepOutcome::Enriched { value } => Some((*pass, value.as_str())),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (Pass, &CookbookError)> {
        self.steps.iter().filter_map(|(pass, outcome)| match outcome {
            StepOutcome::Failed(err) => Some((*pass, err)),
            _ => None,
        })
    }

    pub fn is_degraded(&self) -> bool {
        self.failures().next().is_some()
    }
}
