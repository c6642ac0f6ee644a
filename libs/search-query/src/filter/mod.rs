//! Client filter model.
//!
//! A [`FilterRequest`] is what a client sends for one logical filter: a
//! signature naming the targeted field(s) and, per concrete index field, the
//! values that were selected. A [`FilterConverter`] consumes it and produces a
//! [`ConvertedFilter`].

mod converter;
pub mod family;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use converter::{QueryFilterConverter, ValuesFilterConverter};
pub use family::{ClassificationFamily, GENE_PRODUCT_TYPE, KNOWN_FAMILIES};

/// Filter as supplied by a client, before conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Field(s) this filter logically targets.
    #[serde(default)]
    pub signature: Vec<String>,
    /// Index field name -> selected raw values.
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl FilterRequest {
    pub fn new<I, S>(signature: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signature: signature.into_iter().map(Into::into).collect(),
            properties: BTreeMap::new(),
        }
    }

    /// Add (or replace) the selected values of `field`.
    pub fn with_property<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn values(&self, field: &str) -> Option<&[String]> {
        self.properties.get(field).map(Vec::as_slice)
    }

    pub(crate) fn has_any_value(&self) -> bool {
        self.properties.values().any(|values| !values.is_empty())
    }
}

/// Result of converting a [`FilterRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFilter<T> {
    converted_value: T,
}

impl<T> ConvertedFilter<T> {
    pub fn new(converted_value: T) -> Self {
        Self { converted_value }
    }

    pub fn value(&self) -> &T {
        &self.converted_value
    }

    pub fn into_value(self) -> T {
        self.converted_value
    }
}

/// Turns a [`FilterRequest`] into some compiled representation.
///
/// Implementations are stateless and may be shared between concurrent requests.
pub trait FilterConverter: Send + Sync {
    type Output;

    fn convert(&self, request: &FilterRequest) -> Result<ConvertedFilter<Self::Output>>;
}
