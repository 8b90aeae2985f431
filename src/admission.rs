//! Metadata admission gate
//!
//! Before a body transfer is allowed, the probe metadata must pass an
//! ordered chain of conditions. The order is a contract: when several
//! conditions would fail, only the first one in the chain is reported,
//! so reordering changes user-visible behavior.
//!
//! Chain, in order:
//! 1. header shape — content type, length and fingerprint all present
//! 2. content-type whitelist membership
//! 3. maximum size (declared length strictly below the cap)
//! 4. minimum size (declared length strictly above the floor)
//! 5. free space — the download volume keeps its safety margin after the
//!    transfer
//!
//! The free-space probe is consulted lazily, only when the chain reaches
//! condition 5.

use crate::config::LimitsConfig;
use crate::error::AdmissionError;
use crate::metadata::RemoteMetadata;
use crate::space::{self, SpaceProbe};
use std::path::Path;

/// Ordered admission-condition evaluator.
///
/// Holds the configured limits and the free-space probe; one instance is
/// shared by all workers of a run.
#[derive(Clone)]
pub struct AdmissionGate {
    limits: LimitsConfig,
    probe: SpaceProbe,
}

impl AdmissionGate {
    /// Create a gate with an explicit space probe (used by tests and
    /// embedders that track space themselves).
    #[must_use]
    pub fn new(limits: LimitsConfig, probe: SpaceProbe) -> Self {
        Self { limits, probe }
    }

    /// Create a gate backed by the platform free-space query.
    #[must_use]
    pub fn with_default_probe(limits: LimitsConfig) -> Self {
        Self::new(limits, space::default_probe())
    }

    /// Run the condition chain against one resource's metadata.
    ///
    /// `check_path` is the volume the artifact would land on. Returns the
    /// first failing condition; later conditions are not evaluated.
    pub fn admit(
        &self,
        meta: &RemoteMetadata,
        check_path: &Path,
    ) -> std::result::Result<(), AdmissionError> {
        let size = meta.content_length_bytes();

        let conditions: [(AdmissionError, &dyn Fn() -> bool); 5] = [
            (AdmissionError::HeadersMalformed, &|| meta.is_well_formed()),
            (AdmissionError::ContentTypeRejected, &|| {
                self.content_type_admissible(meta.content_type.as_deref())
            }),
            (AdmissionError::TooLarge, &|| size < self.limits.max_file_size),
            (AdmissionError::TooSmall, &|| size > self.limits.min_file_size),
            (AdmissionError::InsufficientSpace, &|| {
                self.space_available(size, check_path)
            }),
        ];

        for (kind, holds) in conditions {
            if !holds() {
                return Err(kind);
            }
        }
        Ok(())
    }

    fn content_type_admissible(&self, content_type: Option<&str>) -> bool {
        content_type.is_some_and(|t| self.limits.allowed_types.iter().any(|allowed| allowed == t))
    }

    /// Advisory point-in-time check: free bytes minus the declared size must
    /// exceed the configured margin. A probe failure counts as no space —
    /// the check cannot reserve anything, so erring toward rejection is the
    /// only safe answer.
    fn space_available(&self, size: u64, check_path: &Path) -> bool {
        match (self.probe)(check_path) {
            Ok(free) => free.saturating_sub(size) > self.limits.min_free_space,
            Err(e) => {
                tracing::warn!(path = %check_path.display(), error = %e, "Disk space probe failed");
                false
            }
        }
    }
}
