pub type ScreentoneResult<T> = Result<T, ScreentoneError>;

#[derive(thiserror::Error, Debug)]
pub enum ScreentoneError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScreentoneError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ScreentoneError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            ScreentoneError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            ScreentoneError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ScreentoneError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
