pub type PanelResult<T> = Result<T, PanelError>;

#[derive(thiserror::Error, Debug)]
pub enum PanelError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown pose: {0}")]
    UnknownPose(String),

    #[error("unknown expression: {0}")]
    UnknownExpression(String),

    #[error("projection error: {0}")]
    Projection(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_pose(name: impl Into<String>) -> Self {
        Self::UnknownPose(name.into())
    }

    pub fn unknown_expression(name: impl Into<String>) -> Self {
        Self::UnknownExpression(name.into())
    }

    pub fn projection(msg: impl Into<String>) -> Self {
        Self::Projection(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PanelError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            PanelError::unknown_pose("x")
                .to_string()
                .contains("unknown pose:")
        );
        assert!(
            PanelError::projection("x")
                .to_string()
                .contains("projection error:")
        );
        assert!(
            PanelError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PanelError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
