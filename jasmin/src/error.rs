use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("codegen error: no lowering for {kind} in `{inst}`")]
    Unmapped { kind: String, inst: String },
    #[error("codegen error: variable `{var}` of method `{method}` has no descriptor (in `{inst}`)")]
    MissingDescriptor {
        var: String,
        method: String,
        inst: String,
    },
    #[error("codegen error: invalid literal `{value}` in `{inst}`")]
    InvalidLiteral { value: String, inst: String },
}
