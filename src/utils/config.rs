//! Configuration and constants for the decoder, analyzer and CLI.

use std::time::Duration;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Wire ticks are converted with this divisor.
// The producer emits microsecond ticks, which yields milliseconds here.
pub const TICKS_PER_SECOND: f64 = 1000.0;

/// Slack allowed when testing whether one interval ends inside another.
///
/// Tick-to-time division can push a child's end marginally past its parent's.
pub const CONTAINMENT_EPSILON: f64 = 1e-5;

// Chunk tags
pub const PROFILE_MAGIC: &[u8; 4] = b"PROF";
pub const STRINGS_MAGIC: &[u8; 4] = b"STRS";

// Record strides (bytes)
pub const SAMPLE_STRIDE_REVISION_A: usize = 20;
pub const SAMPLE_STRIDE_REVISION_B: usize = 24;
pub const SCOPE_RECORD_SIZE: usize = 12;
pub const COUNTER_RECORD_SIZE: usize = 8;
pub const STRING_ENTRY_HEADER_SIZE: usize = 6;

/// Name and scope of the synthetic per-frame root
pub const ROOT_NAME: &str = "Root.Root";
pub const ROOT_SCOPE: &str = "Root";

/// Sample names that mark resource load and create events
pub const RESOURCE_LOAD_MARKER: &str = "Resource.Load";
pub const RESOURCE_CREATE_MARKER: &str = "Resource.Create";

/// Bucket that collects everything outside the top series
pub const OTHER_SERIES: &str = "Other";

// Series defaults
pub const DEFAULT_SERIES_TOP: usize = 6;
pub const DEFAULT_SERIES_MIN_SELF: f64 = 0.1;

// Capture transport
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(100);
pub const MAX_CAPTURE_FRAMES: usize = 2500;
pub const PROGRESS_INTERVAL: usize = 10;
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8002";

// Chunk persistence file names
pub const STRINGS_CHUNK_FILE: &str = "strings.bin";
pub const FRAME_CHUNK_PREFIX: &str = "frame-";
pub const CHUNK_FILE_EXTENSION: &str = "bin";
