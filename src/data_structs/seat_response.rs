use serde::Deserialize;
use serde_json::{Map, Value};

/// Reply from the registration `details` route. Only the fields we log or
/// scrape are kept; the API sends plenty more.
#[derive(Debug, Default)]
#[derive(Deserialize)]
pub struct SeatResponse {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub crn: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub seats: Option<String>,
}

impl SeatResponse {

    /// Decodes a reply body. Anything but a JSON object is rejected.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(body)?;
        serde_json::from_value(Value::Object(object))
    }

    pub fn title(&self) -> String {
        display_field(&self.title)
    }

    pub fn crn(&self) -> String {
        display_field(&self.crn)
    }

    pub fn code(&self) -> String {
        display_field(&self.code)
    }

    /// The seat-availability HTML fragment, empty when the API left it out.
    pub fn seats_html(&self) -> &str {
        self.seats.as_deref().unwrap_or("")
    }

}

// the API is inconsistent about crn being a string or a number
fn display_field(field: &Option<Value>) -> String {
    match field {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::from("None"),
        Some(other) => other.to_string(),
    }
}
