use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration that controls how a [Builder](crate::Builder) tree is
/// evaluated. The output of an evaluation never depends on this config, only
/// how the work gets scheduled.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BuildConfig {
    /// Evaluate the two operands of every union/intersection/subtraction
    /// concurrently. When disabled, the whole tree is evaluated on the
    /// calling thread.
    pub parallel: bool,

    /// Maximum tree depth at which operands are still forked onto separate
    /// tasks. Below this depth, subtrees are evaluated sequentially within
    /// whichever task reached them. Deep trees produce lots of tiny tasks,
    /// and forking those costs more than it saves.
    #[validate(range(min = 0, max = 64))]
    pub max_parallel_depth: u32,

    /// When classifying the bounding relationship between two areas, scan
    /// each operand's hexes on a separate task.
    pub parallel_bounding: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            max_parallel_depth: 16,
            parallel_bounding: true,
        }
    }
}
