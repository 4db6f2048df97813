//! Country, city and district lookups used by address forms.

// self
use crate::{
	_prelude::*,
	client::CommerceClient,
	graphql::GraphqlOperation,
	http::{ProviderHttpClient, TransportErrorMapper},
	ops::{self, EqFilter},
};

/// Storefront query listing countries with localized names.
pub const LIST_COUNTRIES_DOCUMENT: &str = r#"
query listCountry($locale: String) {
	listCountry(locale: $locale) {
		id
		name
		iso2
		iso3
		phoneCode
		currency
		currencyCode
		currencySymbol
		emoji
		locationTranslations { tr }
	}
}
"#;

/// Admin query listing the cities of a country state.
pub const LIST_CITIES_DOCUMENT: &str = r#"
query ListCity($stateId: StringFilterInput!, $countryId: StringFilterInput) {
	listCity(stateId: $stateId, countryId: $countryId) {
		id
		cityCode
		name
	}
}
"#;

/// Admin query listing the districts of a city.
pub const LIST_DISTRICTS_DOCUMENT: &str = r#"
query ListDistrict($cityId: StringFilterInput!, $stateId: StringFilterInput) {
	listDistrict(cityId: $cityId, stateId: $stateId) {
		id
		name
	}
}
"#;

/// Country entry; fields outside the typed set stay in `details`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
	/// Provider identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// ISO 3166-1 alpha-2 code.
	#[serde(default)]
	pub iso2: Option<String>,
	/// ISO 3166-1 alpha-3 code.
	#[serde(default)]
	pub iso3: Option<String>,
	/// International dialing prefix.
	#[serde(default)]
	pub phone_code: Option<String>,
	/// ISO currency code.
	#[serde(default)]
	pub currency_code: Option<String>,
	/// Remaining selected fields, verbatim.
	#[serde(flatten)]
	pub details: JsonMap<String, Value>,
}

/// City entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
	/// Provider identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Provider city code.
	#[serde(default)]
	pub city_code: Option<String>,
}

/// District entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct District {
	/// Provider identifier.
	pub id: String,
	/// Display name.
	pub name: String,
}

#[derive(Deserialize)]
struct CountryData {
	#[serde(rename = "listCountry", default)]
	countries: Option<Vec<Country>>,
}

#[derive(Deserialize)]
struct CityData {
	#[serde(rename = "listCity", default)]
	cities: Option<Vec<City>>,
}

#[derive(Deserialize)]
struct DistrictData {
	#[serde(rename = "listDistrict", default)]
	districts: Option<Vec<District>>,
}

/// Lists countries through the storefront endpoint, localized to `locale` when given.
pub async fn list_countries<C, M>(
	client: &CommerceClient<C, M>,
	locale: Option<&str>,
) -> Result<Vec<Country>>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let operation = GraphqlOperation::new(LIST_COUNTRIES_DOCUMENT)?
		.variable("locale", locale)?
		.with_operation_name("listCountry");
	let data: CountryData = client.execute_storefront_as(&operation).await?;

	Ok(data.countries.unwrap_or_default())
}

/// Lists the cities of `state_id`, optionally narrowed to `country_id`.
pub async fn list_cities<C, M>(
	client: &CommerceClient<C, M>,
	country_id: Option<&str>,
	state_id: &str,
) -> Result<Vec<City>>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	ops::require_non_blank("state_id", state_id)?;

	let operation = GraphqlOperation::new(LIST_CITIES_DOCUMENT)?
		.variable("stateId", EqFilter::new(state_id))?
		.variable("countryId", country_id.map(EqFilter::new))?
		.with_operation_name("ListCity");
	let data: CityData = client.execute_as(&operation).await?;

	Ok(data.cities.unwrap_or_default())
}

/// Lists the districts of `city_id`, optionally narrowed to `state_id`.
pub async fn list_districts<C, M>(
	client: &CommerceClient<C, M>,
	city_id: &str,
	state_id: Option<&str>,
) -> Result<Vec<District>>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	ops::require_non_blank("city_id", city_id)?;

	let operation = GraphqlOperation::new(LIST_DISTRICTS_DOCUMENT)?
		.variable("cityId", EqFilter::new(city_id))?
		.variable("stateId", state_id.map(EqFilter::new))?
		.with_operation_name("ListDistrict");
	let data: DistrictData = client.execute_as(&operation).await?;

	Ok(data.districts.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn countries_decode_with_extra_fields() {
		let data: CountryData = serde_json::from_value(json!({
			"listCountry": [{
				"id": "c-1",
				"name": "Türkiye",
				"iso2": "TR",
				"phoneCode": "90",
				"emoji": "🇹🇷",
				"locationTranslations": { "tr": "Türkiye" }
			}]
		}))
		.expect("Country list should decode.");
		let countries = data.countries.expect("Countries should be present.");

		assert_eq!(countries[0].iso2.as_deref(), Some("TR"));
		assert_eq!(countries[0].phone_code.as_deref(), Some("90"));
		assert_eq!(countries[0].details["locationTranslations"], json!({ "tr": "Türkiye" }));
	}

	#[test]
	fn null_lists_decode_as_absent() {
		let data: CityData =
			serde_json::from_value(json!({ "listCity": null })).expect("Null list should decode.");

		assert!(data.cities.is_none());
	}
}
