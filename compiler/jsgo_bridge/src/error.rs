//! Conversion failures at the host boundary.

/// Why a value could not cross the boundary. Always wrapped in a
/// `FatalError`: a well-typed program never produces one.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("cannot externalize {0}")]
    CannotExternalize(String),

    #[error("cannot internalize {0}")]
    CannotInternalize(String),

    #[error("cannot internalize {host} as a {ty}")]
    UnexpectedHostValue { host: &'static str, ty: String },

    #[error("got array with wrong size from JavaScript native: expected {expected}, got {got}")]
    WrongArrayLength { expected: usize, got: usize },

    #[error("cannot internalize {ty} from {got}, must be Date")]
    NotADate { ty: String, got: &'static str },

    #[error("cannot internalize js.Object, use *js.Object instead")]
    HandleByValue,

    #[error("interface conversion: {got} is not {expected}")]
    TypeAssertion { expected: String, got: String },

    #[error("hash of unhashable type {0}")]
    UnhashableKey(String),

    #[error("value does not match its type {ty}: expected {expected}")]
    ValueMismatch { ty: String, expected: &'static str },

    #[error("value graph nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("type {0} has no runtime descriptor")]
    Unlowerable(String),

    #[error("no descriptor defined at index {0}")]
    UnknownDescriptor(usize),

    #[error("call of nil function")]
    NilFunction,
}
