pub mod manifest;
pub mod pipeline;
pub mod process;
pub mod stage;
pub mod stream;
#[cfg(test)]
pub mod stub;

pub use manifest::{PackageManifest, TargetDescription};
pub use pipeline::{EventSender, ExecuteOutcome, PipelineEvent, PlaygroundPipeline, RunSummary};
pub use process::ProcessStageRunner;
pub use stage::{StageCommand, BUILD_STAGE, EXECUTE_STAGE, MANIFEST_STAGE};
pub use stream::{ChunkSender, StreamChunk, StreamKind, StreamSinks};
