//! Classification families.
//!
//! A family is a classification field whose privileged value admits further
//! restriction by qualifying fields. The qualifiers only ever constrain the
//! privileged value; other classification values pass through unqualified.

use super::FilterRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationFamily {
    pub classification_field: &'static str,
    pub privileged_value: &'static str,
    pub qualifying_fields: &'static [&'static str],
}

/// Gene product type: only proteins can be restricted by subset or proteome.
pub const GENE_PRODUCT_TYPE: ClassificationFamily = ClassificationFamily {
    classification_field: "geneProductType",
    privileged_value: "protein",
    qualifying_fields: &["geneProductSubset", "proteome"],
};

/// Families recognised by the default converter.
pub static KNOWN_FAMILIES: &[ClassificationFamily] = &[GENE_PRODUCT_TYPE];

impl ClassificationFamily {
    pub fn contains_field(&self, field: &str) -> bool {
        self.classification_field == field || self.qualifying_fields.contains(&field)
    }

    pub fn is_privileged(&self, value: &str) -> bool {
        value.trim().eq_ignore_ascii_case(self.privileged_value)
    }

    /// Whether `request` belongs to this family.
    ///
    /// The signature must name the classification field and nothing outside the
    /// family, and the request must carry classification values.
    pub fn matches(&self, request: &FilterRequest) -> bool {
        !request.signature.is_empty()
            && request
                .signature
                .iter()
                .any(|field| field == self.classification_field)
            && request
                .signature
                .iter()
                .all(|field| self.contains_field(field))
            && request
                .values(self.classification_field)
                .is_some_and(|values| !values.is_empty())
    }
}
