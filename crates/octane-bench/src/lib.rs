//! Benchmark profiles for the Octane capture transcoder.
//!
//! Provides a pre-built capture profile so the frame benches measure
//! the same workload from run to run.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use octane_net::Version;
use octane_test_utils::random_capture;

/// Channel cap used by the reference capture.
pub const REFERENCE_MAX_CHANNELS: u32 = 1023;

/// Version pair used by the reference capture.
pub const REFERENCE_VERSION: Version = Version {
    major: 868,
    minor: 14,
};

/// Build the reference benchmark capture: 120 frames of seeded
/// spawn/update/despawn traffic.
pub fn reference_capture() -> (Vec<u8>, usize) {
    random_capture(0xB_EE5, 120, REFERENCE_MAX_CHANNELS, (868, 14))
}
