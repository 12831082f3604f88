use std::fmt;
use std::time::Duration;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CleanSchools,
    CleanLunch,
    Join,
    Filter,
    Reshape,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CleanSchools => "clean_schools",
            Stage::CleanLunch => "clean_lunch",
            Stage::Join => "join",
            Stage::Filter => "filter",
            Stage::Reshape => "reshape",
        };
        f.write_str(name)
    }
}

/// Events emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    StageStarted { stage: Stage, input_rows: usize },
    StageFinished {
        stage: Stage,
        input_rows: usize,
        output_rows: usize,
        elapsed: Duration,
    },
    StageFailed { stage: Stage, error: String },
}

/// Observer hook for pipeline events.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Writes pipeline events to the [`log`] facade under the `pipeline` target.
#[derive(Debug, Default)]
pub struct LogPipelineObserver;

impl PipelineObserver for LogPipelineObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage, input_rows } => {
                log::debug!(target: "pipeline", "{stage} started input_rows={input_rows}");
            }
            PipelineEvent::StageFinished {
                stage,
                input_rows,
                output_rows,
                elapsed,
            } => {
                log::info!(
                    target: "pipeline",
                    "{stage} finished input_rows={input_rows} output_rows={output_rows} \
                     elapsed={elapsed:?}"
                );
            }
            PipelineEvent::StageFailed { stage, error } => {
                log::error!(target: "pipeline", "{stage} failed: {error}");
            }
        }
    }
}
