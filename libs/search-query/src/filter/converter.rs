use super::family::{ClassificationFamily, KNOWN_FAMILIES};
use super::{ConvertedFilter, FilterConverter, FilterRequest};
use crate::query::Query;
use crate::{Error, Result};

/// Converts filter requests into [`Query`] nodes.
///
/// Values of one field are OR-ed; distinct fields are AND-ed. Requests that
/// belong to a [`ClassificationFamily`] apply the qualifying fields to the
/// privileged classification value only.
#[derive(Debug, Clone, Copy)]
pub struct QueryFilterConverter {
    families: &'static [ClassificationFamily],
}

impl Default for QueryFilterConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryFilterConverter {
    pub fn new() -> Self {
        Self::with_families(KNOWN_FAMILIES)
    }

    pub fn with_families(families: &'static [ClassificationFamily]) -> Self {
        Self { families }
    }

    fn family_for(&self, request: &FilterRequest) -> Option<&'static ClassificationFamily> {
        self.families.iter().find(|family| family.matches(request))
    }
}

impl FilterConverter for QueryFilterConverter {
    type Output = Query;

    fn convert(&self, request: &FilterRequest) -> Result<ConvertedFilter<Query>> {
        if !request.has_any_value() {
            return Err(Error::invalid(
                "filter request must contain at least one field with at least one value",
            ));
        }

        let query = match self.family_for(request) {
            Some(family) => {
                tracing::debug!(
                    classification = family.classification_field,
                    signature = ?request.signature,
                    "Converting classification family filter"
                );
                convert_family(family, request)?
            }
            None => {
                tracing::debug!(signature = ?request.signature, "Converting generic filter");
                convert_generic(request.properties.iter())?
            }
        };

        query.map(ConvertedFilter::new).ok_or_else(|| {
            Error::IllegalState(format!(
                "filter produced no query for fields [{}]",
                request
                    .properties
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}

/// Extracts the raw values of a single field.
#[derive(Debug, Clone)]
pub struct ValuesFilterConverter {
    field: String,
}

impl ValuesFilterConverter {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl FilterConverter for ValuesFilterConverter {
    type Output = Vec<String>;

    fn convert(&self, request: &FilterRequest) -> Result<ConvertedFilter<Vec<String>>> {
        let values = request.values(&self.field).unwrap_or_default();
        let mut out: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim();
            if !value.is_empty() && !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        }
        if out.is_empty() {
            return Err(Error::invalid(format!(
                "filter request has no values for field '{}'",
                self.field
            )));
        }
        Ok(ConvertedFilter::new(out))
    }
}

/// OR of `field:value` over the non-blank `values`, or `None` if there are none.
fn or_group(field: &str, values: &[String]) -> Result<Option<Query>> {
    let leaves = values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| Query::field(field, v.as_str()))
        .collect::<Result<Vec<_>>>()?;
    if leaves.is_empty() {
        return Ok(None);
    }
    Query::or(leaves).map(Some)
}

fn convert_generic<'a>(
    properties: impl Iterator<Item = (&'a String, &'a Vec<String>)>,
) -> Result<Option<Query>> {
    let mut groups = Vec::new();
    for (field, values) in properties {
        if let Some(group) = or_group(field, values)? {
            groups.push(group);
        }
    }
    if groups.is_empty() {
        return Ok(None);
    }
    Query::and(groups).map(Some)
}

fn convert_family(family: &ClassificationFamily, request: &FilterRequest) -> Result<Option<Query>> {
    let classification = request
        .values(family.classification_field)
        .unwrap_or_default();

    let privileged_present = classification.iter().any(|v| family.is_privileged(v));
    let others: Vec<String> = classification
        .iter()
        .filter(|v| !family.is_privileged(v))
        .cloned()
        .collect();

    let other_query = or_group(family.classification_field, &others)?;

    let privileged_query = if privileged_present {
        let mut parts = vec![Query::field(
            family.classification_field,
            family.privileged_value,
        )?];
        for qualifier in family.qualifying_fields {
            if let Some(values) = request.values(qualifier) {
                if let Some(group) = or_group(qualifier, values)? {
                    parts.push(group);
                }
            }
        }
        Some(Query::and(parts)?)
    } else {
        if family
            .qualifying_fields
            .iter()
            .any(|q| request.values(q).is_some_and(|v| !v.is_empty()))
        {
            tracing::debug!(
                privileged = family.privileged_value,
                "Ignoring qualifying fields without privileged classification value"
            );
        }
        None
    };

    let family_query = match (privileged_query, other_query) {
        (Some(privileged), Some(other)) => Some(privileged.or_with(other)),
        (privileged, other) => privileged.or(other),
    };

    // Fields outside the family still constrain the result.
    let rest = convert_generic(
        request
            .properties
            .iter()
            .filter(|(field, _)| !family.contains_field(field)),
    )?;

    Ok(match (family_query, rest) {
        (Some(family_query), Some(rest)) => Some(family_query.and_with(rest)),
        (family_query, rest) => family_query.or(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fq(field: &str, value: &str) -> Query {
        Query::field(field, value).unwrap()
    }

    #[test]
    fn blank_values_only_is_illegal_state() {
        let request = FilterRequest::new(["db"]).with_property("db", ["", "  "]);
        let err = QueryFilterConverter::new().convert(&request).unwrap_err();
        assert!(matches!(err, Error::IllegalState(msg) if msg.contains("db")));
    }

    #[test]
    fn no_properties_is_invalid() {
        let request = FilterRequest::new(["db"]);
        let err = QueryFilterConverter::new().convert(&request).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let request = FilterRequest::new(["db"]).with_property("db", Vec::<String>::new());
        assert!(QueryFilterConverter::new().convert(&request).is_err());
    }

    #[test]
    fn blank_values_are_skipped_among_real_ones() {
        let request = FilterRequest::new(["db"]).with_property("db", ["", "UniProtKB"]);
        let converted = QueryFilterConverter::new().convert(&request).unwrap();
        assert_eq!(converted.into_value(), fq("db", "UniProtKB"));
    }

    #[test]
    fn qualifiers_without_protein_are_ignored() {
        let request = FilterRequest::new(["geneProductType", "proteome"])
            .with_property("geneProductType", ["complex", "miRNA"])
            .with_property("proteome", ["reference"]);
        let converted = QueryFilterConverter::new().convert(&request).unwrap();
        assert_eq!(
            converted.into_value(),
            Query::or([
                fq("geneProductType", "complex"),
                fq("geneProductType", "miRNA")
            ])
            .unwrap()
        );
    }

    #[test]
    fn values_converter_deduplicates() {
        let request =
            FilterRequest::new(["taxonId"]).with_property("taxonId", ["9606", " 9606", "10090"]);
        let converted = ValuesFilterConverter::new("taxonId")
            .convert(&request)
            .unwrap();
        assert_eq!(converted.value(), &vec!["9606".to_string(), "10090".to_string()]);
    }

    #[test]
    fn values_converter_requires_field() {
        let request = FilterRequest::new(["db"]).with_property("db", ["UniProtKB"]);
        assert!(matches!(
            ValuesFilterConverter::new("taxonId").convert(&request),
            Err(Error::InvalidArgument(_))
        ));
    }
}
