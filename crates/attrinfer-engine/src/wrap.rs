//! Adapts an already-boxed `std::error::Error` into a concrete type, since
//! [`attrinfer_core::InferenceError::user_block`] needs a `'static` `Error`
//! impl to box itself rather than a trait object it would have to re-box.

#[derive(Debug)]
pub(crate) struct UserErrWrapper(pub(crate) Box<dyn std::error::Error>);

impl std::fmt::Display for UserErrWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UserErrWrapper {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

pub(crate) fn wrap(err: Box<dyn std::error::Error>) -> UserErrWrapper {
    UserErrWrapper(err)
}
