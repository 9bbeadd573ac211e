use crate::wire::{HealthRes, InfoRes};

/// Simple health service used by the REST API and the CLI.
///
/// This service provides a standardised way to check the health status of the patient
/// records service.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patient records service is alive".into(),
        }
    }

    /// Banner returned from the root endpoint.
    pub fn info() -> InfoRes {
        InfoRes {
            message: "Patient Management System API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
