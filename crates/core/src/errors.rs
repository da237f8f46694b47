use thiserror::Error;

use crate::commission::TierTableError;

/// Input fields named the way the public API names them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    SalespersonId,
    Date,
    Amount,
    StartDate,
    EndDate,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SalespersonId => "vendedor_id",
            Self::Date => "fecha",
            Self::Amount => "monto",
            Self::StartDate => "fecha_inicio",
            Self::EndDate => "fecha_fin",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(Field),
    #[error("both `fecha_inicio` and `fecha_fin` are required")]
    MissingDateRange,
    #[error("field `{field}` must be a date formatted as YYYY-MM-DD, got `{value}`")]
    InvalidDate { field: Field, value: String },
    #[error("field `monto` must be greater than zero")]
    NonPositiveAmount,
    #[error("salesperson `{0}` does not exist")]
    UnknownSalesperson(String),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("could not decode stored row: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("commission tier table is invalid: {0}")]
    TierTable(#[from] TierTableError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    /// Text safe to return to callers. Validation messages describe caller
    /// input only; internal failures never expose storage details.
    pub fn user_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } => message,
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl EngineError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<EngineError> for InterfaceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::Validation(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            EngineError::TierTable(_) | EngineError::Ledger(_) => Self::Internal {
                message: value.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
        }
    }
}
