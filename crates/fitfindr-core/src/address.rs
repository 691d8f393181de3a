use serde::{Deserialize, Serialize};

/// Postal address of a venue, as entered by the user.
///
/// Owned by the location record; geocoding only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "address_line1", default)]
    pub line1: String,
    #[serde(rename = "address_line2", default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

impl AddressRecord {
    /// All non-blank components joined with `", "`, line 2 included.
    #[must_use]
    pub fn full_address(&self) -> String {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.city.as_str()),
            Some(self.state.as_str()),
            Some(self.postal_code.as_str()),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// `true` when no component carries any text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.full_address().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_address_skips_blank_parts() {
        let address = AddressRecord {
            line1: "1800 E 6th St".to_string(),
            line2: Some("  ".to_string()),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            postal_code: String::new(),
            country: "USA".to_string(),
        };
        assert_eq!(address.full_address(), "1800 E 6th St, Austin, TX, USA");
    }

    #[test]
    fn default_address_is_blank() {
        assert!(AddressRecord::default().is_blank());
    }

    #[test]
    fn serde_uses_flat_field_names() {
        let json = serde_json::json!({
            "address_line1": "900 W Riverside Dr",
            "city": "Austin",
            "state": "TX",
            "postal_code": "78704",
            "country": "USA"
        });
        let address: AddressRecord = serde_json::from_value(json).unwrap();
        assert_eq!(address.line1, "900 W Riverside Dr");
        assert!(address.line2.is_none());
        assert_eq!(address.postal_code, "78704");
    }
}
