//! Per-version enrichment
//!
//! [`VersionEnricher::enrich`] never fails. Each step either writes one field,
//! leaves it alone with a [`SkipReason`], or records the error that stopped it;
//! fields outside the four it manages are never touched.

use serde_json::{Map, Value};

use super::outcome::{Pass, Passes, SkipReason, StepOutcome, VersionOutcome};
use crate::fetch::FetchCache;
use crate::source::source_ref::{SHA256, SUB_PATH, URL, present_field};
use crate::source::{SourceRef, github};

pub const SOURCE: &str = "source";
pub const BUCK: &str = "buck";

/// Applies the enabled passes to a single version record
#[derive(Clone, Copy)]
pub struct VersionEnricher<'a> {
    cache: &'a FetchCache,
    passes: Passes,
}

impl<'a> VersionEnricher<'a> {
    pub fn new(cache: &'a FetchCache, passes: Passes) -> Self {
        Self { cache, passes }
    }

    /// Enrich one version record
    pub fn enrich(&self, mut version: Value) -> VersionOutcome {
        let steps = match version.as_object_mut() {
            Some(map) => self.run_steps(map),
            None => Pass::ALL
                .iter()
                .map(|p| (*p, StepOutcome::Unchanged(SkipReason::NotApplicable)))
                .collect(),
        };
        VersionOutcome { version, steps }
    }

    fn run_steps(&self, map: &mut Map<String, Value>) -> Vec<(Pass, StepOutcome)> {
        let mut steps = Vec::with_capacity(Pass::ALL.len());

        for (index, pass) in Pass::ALL.into_iter().enumerate() {
            let outcome = if self.passes.contains(pass) {
                match pass {
                    Pass::GitRemote => resolve_git_remote(map),
                    Pass::SubPath => derive_sub_path(map),
                    Pass::SourceHash => self.hash_source(map),
                    Pass::BuildHash => self.hash_build_file(map),
                }
            } else {
                StepOutcome::Unchanged(SkipReason::Disabled)
            };

            let malformed_remote =
                pass == Pass::GitRemote && matches!(outcome, StepOutcome::Failed(_));
            steps.push((pass, outcome));
            if malformed_remote {
                // The version is left exactly as it was
                steps.extend(
                    Pass::ALL[index + 1..]
                        .iter()
                        .map(|p| (*p, StepOutcome::Unchanged(SkipReason::EarlierFailure))),
                );
                break;
            }
        }

        steps
    }

    fn hash_source(&self, map: &mut Map<String, Value>) -> StepOutcome {
        let source = match map.get(SOURCE).map(SourceRef::classify) {
            None => return StepOutcome::Unchanged(SkipReason::NotApplicable),
            Some(SourceRef::Structured(source)) => source,
            Some(_) => return StepOutcome::Unchanged(SkipReason::MissingPrerequisite),
        };
        if source.sha256.is_some() {
            return StepOutcome::Unchanged(SkipReason::AlreadyPresent);
        }

        match self.cache.bytes_hash(&source.url) {
            Ok(hash) => {
                set_nested(map, SOURCE, SHA256, &hash);
                StepOutcome::Enriched { value: hash }
            }
            Err(err) => StepOutcome::Failed(err),
        }
    }

    fn hash_build_file(&self, map: &mut Map<String, Value>) -> StepOutcome {
        let buck = match map.get(BUCK) {
            None | Some(Value::Null) => return StepOutcome::Unchanged(SkipReason::NotApplicable),
            Some(Value::Object(buck)) => buck,
            Some(_) => return StepOutcome::Unchanged(SkipReason::MissingPrerequisite),
        };
        if present_field(buck, SHA256).is_some() {
            return StepOutcome::Unchanged(SkipReason::AlreadyPresent);
        }
        let Some(url) = buck.get(URL).and_then(Value::as_str).map(str::to_string) else {
            return StepOutcome::Unchanged(SkipReason::MissingPrerequisite);
        };

        match self.cache.text_hash(&url) {
            Ok(hash) => {
                set_nested(map, BUCK, SHA256, &hash);
                StepOutcome::Enriched { value: hash }
            }
            Err(err) => StepOutcome::Failed(err),
        }
    }
}

fn resolve_git_remote(map: &mut Map<String, Value>) -> StepOutcome {
    let Some(source) = map.get(SOURCE).map(SourceRef::classify) else {
        return StepOutcome::Unchanged(SkipReason::NotApplicable);
    };
    if !matches!(source, SourceRef::BareGitRemote(_)) {
        return StepOutcome::Unchanged(SkipReason::NotApplicable);
    }

    match source.resolve_git_remote() {
        Ok(SourceRef::Structured(resolved)) => {
            let mut structured = Map::new();
            structured.insert(URL.to_string(), Value::String(resolved.url.clone()));
            map.insert(SOURCE.to_string(), Value::Object(structured));
            StepOutcome::Enriched {
                value: resolved.url,
            }
        }
        Ok(_) => StepOutcome::Unchanged(SkipReason::NotApplicable),
        Err(err) => StepOutcome::Failed(err),
    }
}

fn derive_sub_path(map: &mut Map<String, Value>) -> StepOutcome {
    match map.get(SOURCE).map(SourceRef::classify) {
        None => StepOutcome::Unchanged(SkipReason::NotApplicable),
        Some(SourceRef::BareZipUrl(url)) => match github::sub_path_from_url(&url) {
            Some(sub_path) => {
                let mut structured = Map::new();
                structured.insert(URL.to_string(), Value::String(url));
                structured.insert(SUB_PATH.to_string(), Value::String(sub_path.clone()));
                map.insert(SOURCE.to_string(), Value::Object(structured));
                StepOutcome::Enriched { value: sub_path }
            }
            None => StepOutcome::Unchanged(SkipReason::NotApplicable),
        },
        Some(SourceRef::Structured(source)) => {
            if source.sub_path.is_some() {
                return StepOutcome::Unchanged(SkipReason::AlreadyPresent);
            }
            match source.derive_sub_path() {
                Some(sub_path) => {
                    set_nested(map, SOURCE, SUB_PATH, &sub_path);
                    StepOutcome::Enriched { value: sub_path }
                }
                None => StepOutcome::Unchanged(SkipReason::NotApplicable),
            }
        }
        Some(SourceRef::BareGitRemote(_) | SourceRef::Unrecognized) => {
            StepOutcome::Unchanged(SkipReason::MissingPrerequisite)
        }
    }
}

/// Set `map[parent][key]`, appending the key if it is new
fn set_nested(map: &mut Map<String, Value>, parent: &str, key: &str, value: &str) {
    if let Some(Value::Object(object)) = map.get_mut(parent) {
        object.insert(key.to_string(), Value::String(value.to_string()));
    }
}
