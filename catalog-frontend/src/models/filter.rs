use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// The three user-editable search fields. An empty field applies no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub book_name: String,
    pub author: String,
    pub book_type: String,
}

/// Body of a filter request: `{}` for the whole catalog, or the criteria
/// exactly as the user entered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRequest {
    All,
    Criteria(FilterCriteria),
}

impl Serialize for FilterRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterRequest::All => serializer.serialize_map(Some(0))?.end(),
            FilterRequest::Criteria(criteria) => criteria.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_catalog_request_is_an_empty_object() {
        assert_eq!(serde_json::to_string(&FilterRequest::All).unwrap(), "{}");
    }

    #[test]
    fn criteria_keep_blank_fields() {
        let request = FilterRequest::Criteria(FilterCriteria {
            book_name: "Dune".to_string(),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"book_name":"Dune","author":"","book_type":""}"#
        );
    }
}
