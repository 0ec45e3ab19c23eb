pub mod batch;
pub mod channel;
pub mod dispatch;
pub mod finish;
pub mod framework;
pub mod registry;
pub mod slots;
pub mod task;

pub use batch::{AccelBatch, BatchOp, EngineBatchState};
pub use channel::{AccelChannel, ChannelManager};
pub use dispatch::DUALCAST_ALIGNMENT;
pub use finish::{FiniHandle, FinishCallback, FinishSequencer, FinishState};
pub use framework::{AccelFramework, AccelFrameworkBuilder};
pub use registry::ModuleRegistry;
pub use slots::EngineSlots;
pub use task::{AccelCompletionCb, AccelTask, Completion, EngineTask};
