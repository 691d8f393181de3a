use fitfindr_core::AddressRecord;
use serde::Serialize;

/// One way of rendering an [`AddressRecord`] as a query string, from most
/// to least specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFormat {
    /// Line 1, line 2, city, state, postal code, country.
    Full,
    /// Line 1, city, state, postal code, country.
    WithoutLine2,
    CityStatePostal,
    CityState,
}

impl AddressFormat {
    /// Every format in descending specificity.
    pub const ALL: [AddressFormat; 4] = [
        AddressFormat::Full,
        AddressFormat::WithoutLine2,
        AddressFormat::CityStatePostal,
        AddressFormat::CityState,
    ];

    /// Non-blank trimmed components joined with `", "`. May be empty.
    #[must_use]
    pub fn render(self, address: &AddressRecord) -> String {
        match self {
            AddressFormat::Full => address.full_address(),
            AddressFormat::WithoutLine2 => join(&[
                address.line1.as_str(),
                address.city.as_str(),
                address.state.as_str(),
                address.postal_code.as_str(),
                address.country.as_str(),
            ]),
            AddressFormat::CityStatePostal => {
                join(&[address.city.as_str(), address.state.as_str(), address.postal_code.as_str()])
            }
            AddressFormat::CityState => join(&[address.city.as_str(), address.state.as_str()]),
        }
    }
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
