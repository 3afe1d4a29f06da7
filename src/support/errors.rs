use thiserror::Error;

/// Vehicle construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VehicleError {
    #[error("unknown or missing vehicle type: {0:?}")]
    UnknownType(String),

    #[error("invalid license plate for vehicle type {0}")]
    InvalidLicensePlate(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid vehicle: {0}")]
    InvalidVehicle(#[from] VehicleError),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl From<VehicleError> for AppError {
    fn from(err: VehicleError) -> Self {
        Self::Domain(DomainError::InvalidVehicle(err))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for operations that may also fail in infrastructure
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_error_converts_into_invalid_vehicle() {
        let err: AppError = VehicleError::UnknownType("Spaceship".into()).into();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidVehicle(VehicleError::UnknownType(_)))
        ));
        assert_eq!(
            err.to_string(),
            "Invalid vehicle: unknown or missing vehicle type: \"Spaceship\""
        );
    }

    #[test]
    fn not_found_message() {
        let err = DomainError::NotFound {
            entity: "City",
            field: "name",
            value: "oslo".into(),
        };
        assert_eq!(err.to_string(), "Not found: City with name=oslo");
    }
}
