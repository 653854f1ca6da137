use serde::{Deserialize, Serialize};

/// Body of a registration search request. Serialized as-is into the POST.
#[derive(Debug, PartialEq, Eq)]
#[derive(Deserialize, Serialize)]
#[derive(Clone)]
pub struct SearchRequest {
    pub group: String,
    pub key: String,
    pub srcdb: String,
    pub matched: String,
}

#[derive(Debug, PartialEq, Eq)]
#[derive(Clone)]
pub struct CourseWatch {
    pub name: String,
    pub body: SearchRequest,
}

impl CourseWatch {

    /// Builds a watch for one section. `code` is the catalog code ("ANTH 1140"),
    /// `srcdb` the term identifier ("202601").
    pub fn new(code: &str, crn: u32, srcdb: &str) -> Self {
        return CourseWatch {
            name: format!("{} (CRN {})", code, crn),
            body: SearchRequest {
                group: format!("code:{}", code),
                key: format!("crn:{}", crn),
                srcdb: srcdb.to_string(),
                matched: String::new(),
            },
        }
    }

}
