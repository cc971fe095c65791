//! The three named pipeline steps and their ordering

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Extract,
    LoadToStaging,
    MergeToTarget,
}

impl PipelineStep {
    /// Every step, in execution order
    pub const ALL: [PipelineStep; 3] = [
        PipelineStep::Extract,
        PipelineStep::LoadToStaging,
        PipelineStep::MergeToTarget,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineStep::Extract => "extract",
            PipelineStep::LoadToStaging => "load_to_staging",
            PipelineStep::MergeToTarget => "merge_to_target",
        }
    }

    /// The step that must succeed before this one may start
    pub fn depends_on(&self) -> Option<PipelineStep> {
        match self {
            PipelineStep::Extract => None,
            PipelineStep::LoadToStaging => Some(PipelineStep::Extract),
            PipelineStep::MergeToTarget => Some(PipelineStep::LoadToStaging),
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelineStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `transform` is the historical name of the merge task.
        if s == "transform" {
            return Ok(PipelineStep::MergeToTarget);
        }

        PipelineStep::ALL
            .into_iter()
            .find(|step| step.name() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid step '{s}'. Must be one of: extract, load_to_staging, merge_to_target (or transform)"
                )
            })
    }
}
