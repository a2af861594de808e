// crates.io
use oauth2::http::Method;
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	api::Client,
	auth::{DeviceId, SiteId},
	error::ConfigError,
	http::HttpTransport,
	model::{TemperatureRange, TemperatureSensor, TemperatureValue},
	resources::{self, Items},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the temperature sensors of `site` with their latest readings.
	pub async fn temperature_sensors(&self, site: &SiteId) -> Result<Vec<TemperatureSensor>> {
		let path = resources::site_path(site, "device/data/temperature/items");
		let listing: Items<TemperatureSensor> =
			self.execute("get_temperature_sensors", Method::GET, &path).await?;

		Ok(listing.items)
	}

	/// Lists the recorded readings of one sensor, optionally limited to `range`.
	pub async fn temperatures(
		&self,
		site: &SiteId,
		device: &DeviceId,
		range: Option<TemperatureRange>,
	) -> Result<Vec<TemperatureValue>> {
		let path = resources::site_path(site, &format!("device/{device}/data/temperature"));
		let query = range.map(range_query).transpose()?.unwrap_or_default();
		let listing: Items<TemperatureValue> =
			self.execute_with_query("get_temperatures", Method::GET, &path, &query).await?;

		Ok(listing.items)
	}

	/// Finds the sensor with id `device` in the site listing.
	///
	/// Returns `Ok(None)` when the site lists no such sensor.
	pub async fn last_temperature(
		&self,
		site: &SiteId,
		device: &DeviceId,
	) -> Result<Option<TemperatureSensor>> {
		let sensors = self.temperature_sensors(site).await?;

		Ok(sensors.into_iter().find(|sensor| &sensor.device_id == device))
	}
}

fn range_query(range: TemperatureRange) -> Result<Vec<(&'static str, String)>, ConfigError> {
	let format = |at: OffsetDateTime| {
		at.format(&Rfc3339).map_err(|source| ConfigError::InvalidTimestamp { source })
	};

	Ok(vec![("dateFrom", format(range.from)?), ("dateTo", format(range.to)?)])
}
