use miette::{Diagnostic, SourceSpan};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result},
};

#[derive(Debug, Diagnostic)]
pub enum CanvasColorError {
    #[diagnostic(
        code(canvas_color::invalid_format),
        help("expected a CSS name, #rgb/#rrggbb, a packed integer, rgb()/hsl(), object or tuple")
    )]
    InvalidColorFormat {
        #[source_code]
        src: String,
        #[label("not a recognized color")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(canvas_color::out_of_range))]
    OutOfRangeComponent {
        #[source_code]
        src: String,
        #[label("out of range")]
        err_span: SourceSpan,
        component: String,
        msg: String,
    },

    #[diagnostic(code(canvas_color::unsupported_format))]
    UnsupportedOutputFormat {
        #[source_code]
        src: String,
        #[label("unknown format tag")]
        err_span: SourceSpan,
    },
}

pub type CanvasColorResult<T> = std::result::Result<T, CanvasColorError>;

impl Display for CanvasColorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CanvasColorError::InvalidColorFormat { msg, .. } => {
                write!(f, "Invalid color format: {}", msg)
            }
            CanvasColorError::OutOfRangeComponent { component, msg, .. } => {
                write!(f, "Component `{}` out of range: {}", component, msg)
            }
            CanvasColorError::UnsupportedOutputFormat { src, .. } => {
                write!(f, "Unsupported output format: {}", src)
            }
        }
    }
}

impl Error for CanvasColorError {}

impl CanvasColorError {
    pub fn invalid_format(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidColorFormat {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    pub fn out_of_range(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        component: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::OutOfRangeComponent {
            src: src.into(),
            err_span: err_span.into(),
            component: component.into(),
            msg: msg.into(),
        }
    }

    pub fn unsupported_format(src: impl Into<String>) -> Self {
        let src = src.into();
        let len = src.len();
        Self::UnsupportedOutputFormat {
            src,
            err_span: (0, len).into(),
        }
    }

    /// Whether this error came from a numeric channel outside its range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, CanvasColorError::OutOfRangeComponent { .. })
    }

    /// Whether this error came from an input that matched no known shape
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, CanvasColorError::InvalidColorFormat { .. })
    }
}
