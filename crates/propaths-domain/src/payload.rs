//! Payload module - the documents exchanged by the query pipeline

use crate::interactor::Interactor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder used when a document does not name its query protein
pub const UNKNOWN_MAIN: &str = "UNKNOWN";

/// One half of a payload document: the query protein and its interactors
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayloadContext {
    /// Query protein symbol
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Interactors in discovery order
    #[serde(default)]
    pub interactors: Vec<Interactor>,

    /// Any other keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PayloadContext {
    /// Create a context for a query protein
    pub fn new(main: impl Into<String>) -> Self {
        Self {
            main: Some(main.into()),
            ..Default::default()
        }
    }

    /// Find an interactor by its primary symbol
    pub fn interactor(&self, primary: &str) -> Option<&Interactor> {
        self.interactors.iter().find(|i| i.primary == primary)
    }

    /// Find an interactor by its primary symbol, mutably
    pub fn interactor_mut(&mut self, primary: &str) -> Option<&mut Interactor> {
        self.interactors.iter_mut().find(|i| i.primary == primary)
    }
}

/// A query result: working context plus the snapshot served to readers
///
/// `snapshot_json.interactors` mirrors `ctx_json.interactors`; call
/// [`PayloadDocument::sync_snapshot`] after changing the context.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayloadDocument {
    /// Working context
    #[serde(default)]
    pub ctx_json: PayloadContext,

    /// Derived snapshot
    #[serde(default)]
    pub snapshot_json: PayloadContext,

    /// Any other keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PayloadDocument {
    /// Create an empty document for a query protein
    pub fn new(main: impl Into<String>) -> Self {
        let main = main.into();
        Self {
            ctx_json: PayloadContext::new(main.clone()),
            snapshot_json: PayloadContext::new(main),
            extra: Map::new(),
        }
    }

    /// Create a document from a list of interactors, snapshot in sync
    pub fn with_interactors(main: impl Into<String>, interactors: Vec<Interactor>) -> Self {
        let mut document = Self::new(main);
        document.ctx_json.interactors = interactors;
        document.sync_snapshot();
        document
    }

    /// Query protein symbol, or `UNKNOWN`
    pub fn main(&self) -> &str {
        self.ctx_json
            .main
            .as_deref()
            .or(self.snapshot_json.main.as_deref())
            .unwrap_or(UNKNOWN_MAIN)
    }

    /// Interactors of the working context
    pub fn interactors(&self) -> &[Interactor] {
        &self.ctx_json.interactors
    }

    /// Find an interactor by its primary symbol
    pub fn interactor(&self, primary: &str) -> Option<&Interactor> {
        self.ctx_json.interactor(primary)
    }

    /// Copy the context's interactors into the snapshot
    pub fn sync_snapshot(&mut self) {
        self.snapshot_json.interactors = self.ctx_json.interactors.clone();
        if self.snapshot_json.main.is_none() {
            self.snapshot_json.main = self.ctx_json.main.clone();
        }
    }

    /// True when the snapshot mirrors the context
    pub fn snapshot_in_sync(&self) -> bool {
        self.snapshot_json.interactors == self.ctx_json.interactors
    }

    /// Parse a document as stored in the cache
    ///
    /// Accepts a full document, or a bare context (`{main, interactors}`),
    /// which is taken as both context and snapshot.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let is_document = value
            .as_object()
            .is_some_and(|o| o.contains_key("ctx_json") || o.contains_key("snapshot_json"));

        if is_document {
            let mut document: PayloadDocument = serde_json::from_value(value)?;
            if document.ctx_json.interactors.is_empty() && !document.snapshot_json.interactors.is_empty() {
                document.ctx_json = document.snapshot_json.clone();
            }
            Ok(document)
        } else {
            let context: PayloadContext = serde_json::from_value(value)?;
            Ok(PayloadDocument {
                ctx_json: context.clone(),
                snapshot_json: context,
                extra: Map::new(),
            })
        }
    }
}

/// A partial update produced by one pipeline step or arrow worker
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PayloadUpdate {
    /// The interactors to fold in (and optionally the query protein)
    #[serde(default)]
    pub ctx_json: PayloadContext,
}

impl PayloadUpdate {
    /// Create an update from interactor fragments
    pub fn new(interactors: Vec<Interactor>) -> Self {
        Self {
            ctx_json: PayloadContext {
                main: None,
                interactors,
                extra: Map::new(),
            },
        }
    }

    /// Parse worker output
    ///
    /// Accepts raw JSON or JSON inside a Markdown code fence, shaped either as
    /// `{"ctx_json": {...}}` or as a bare `{"interactors": [...]}` object.
    ///
    /// # Examples
    ///
    /// ```
    /// use propaths_domain::PayloadUpdate;
    ///
    /// let text = "```json\n{\"interactors\": [{\"primary\": \"VCP\", \"arrow\": \"binds\"}]}\n```";
    /// let update = PayloadUpdate::parse(text).unwrap();
    /// assert_eq!(update.ctx_json.interactors[0].primary, "VCP");
    /// ```
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(strip_code_fence(text))?;
        match value {
            Value::Object(mut object) => match object.remove("ctx_json") {
                Some(ctx) => Ok(Self {
                    ctx_json: serde_json::from_value(ctx)?,
                }),
                None => Ok(Self {
                    ctx_json: serde_json::from_value(Value::Object(object))?,
                }),
            },
            other => Err(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Primary keys this update addresses
    pub fn primaries(&self) -> Vec<&str> {
        self.ctx_json.interactors.iter().map(|i| i.primary.as_str()).collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strip a surrounding Markdown code fence, if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (`json`, `JSON`, ...) on the opening line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
