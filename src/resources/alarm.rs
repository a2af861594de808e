// crates.io
use oauth2::http::Method;
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::Client,
	auth::SiteId,
	http::HttpTransport,
	model::{AlarmState, SecurityLevel},
	resources,
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Reads the current security level of `site`.
	pub async fn alarm_state(&self, site: &SiteId) -> Result<AlarmState> {
		self.execute("get_alarm_state", Method::GET, &resources::site_path(site, "security")).await
	}

	/// Sets the security level of `site`.
	///
	/// The alarm is addressed by site only; there is no device or group variant.
	pub async fn set_alarm_state(&self, site: &SiteId, level: SecurityLevel) -> Result<()> {
		let path = resources::site_path(site, &format!("security/set/{}", level.as_str()));
		let _: IgnoredAny = self.execute("set_alarm_state", Method::POST, &path).await?;

		Ok(())
	}
}
