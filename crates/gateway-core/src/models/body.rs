use serde_json::Value;

/// A request body that a body-parsing stage has already decoded.
///
/// The raw bytes always travel with the request as well; this is the decoded
/// view for handlers that want to inspect fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

impl ParsedBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParsedBody::Json(value) => Some(value),
            ParsedBody::Form(_) => None,
        }
    }

    /// Look up a top-level string field, from either a JSON object or a form.
    ///
    /// For forms the first occurrence wins.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            ParsedBody::Json(value) => value.get(name).and_then(Value::as_str),
            ParsedBody::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
        }
    }
}
