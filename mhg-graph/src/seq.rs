use derive_more::{
    Display,
    From,
};
use std::sync::Arc;

/// Opaque sequence identifier. Cheaply cloneable: the partitioner never inspects
/// the contents, only compares and hashes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From, Display)]
pub struct SeqId(Arc<str>);

impl SeqId {
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SeqId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for SeqId {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}
