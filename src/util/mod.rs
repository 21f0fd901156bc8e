//! Shared concurrency and timing primitives that the FEC/codec layers, affiliation
//! engine, lookup reloaders, and network transport all build on.

pub mod ring_buffer;
pub mod stopwatch;
pub mod task;

pub use ring_buffer::RingBuffer;
pub use stopwatch::StopWatch;
pub use task::{CancellationToken, Task};
