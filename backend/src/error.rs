use thiserror::Error;

/// Why a prediction request failed.
///
/// Every variant reaches the client the same way, as
/// `{"success": false, "error": <message>}`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("invalid form body: {0}")]
    Form(String),

    #[error("missing form field '{0}'")]
    MissingField(String),

    #[error("could not convert value of '{field}' to float: '{value}'")]
    Parse { field: String, value: String },

    #[error("value of '{field}' is not a finite number: '{value}'")]
    NonFinite { field: String, value: String },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// True when the caller sent something unusable, false for model-side failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PredictError::Inference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let missing = PredictError::MissingField("PM2.5".into());
        assert_eq!(missing.to_string(), "missing form field 'PM2.5'");

        let parse = PredictError::Parse {
            field: "CO".into(),
            value: "abc".into(),
        };
        assert_eq!(parse.to_string(), "could not convert value of 'CO' to float: 'abc'");

        let non_finite = PredictError::NonFinite {
            field: "O3".into(),
            value: "inf".into(),
        };
        assert_eq!(non_finite.to_string(), "value of 'O3' is not a finite number: 'inf'");
    }

    #[test]
    fn only_inference_failures_are_server_side() {
        assert!(PredictError::Form("bad".into()).is_client_error());
        assert!(PredictError::MissingField("NO".into()).is_client_error());
        assert!(PredictError::NonFinite {
            field: "NO".into(),
            value: "NaN".into()
        }
        .is_client_error());
        assert!(!PredictError::Inference("nan".into()).is_client_error());
    }
}
