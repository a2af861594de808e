// crates.io
use oauth2::http::Method;
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::Client,
	auth::{ScenarioId, SiteId},
	http::HttpTransport,
	model::{Device, Scenario},
	resources::{self, Items},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the on-demand scenarios of `site` as device-shaped records.
	///
	/// Scheduled and event-driven scenarios are skipped; each remaining one keeps its id and
	/// label and carries the `Scenario` model label.
	pub async fn scenarios(&self, site: &SiteId) -> Result<Vec<Device>> {
		let path = resources::site_path(site, "scenario/items");
		let listing: Items<Scenario> = self.execute("get_scenarios", Method::GET, &path).await?;

		Ok(on_demand(listing.items))
	}

	/// Plays a scenario.
	pub async fn play_scenario(&self, site: &SiteId, scenario: &ScenarioId) -> Result<()> {
		let path = resources::site_path(site, &format!("scenario/{scenario}/play"));
		let _: IgnoredAny = self.execute("play_scenario", Method::POST, &path).await?;

		Ok(())
	}
}

fn on_demand(scenarios: Vec<Scenario>) -> Vec<Device> {
	scenarios.into_iter().filter(Scenario::is_on_demand).map(Scenario::into_device).collect()
}
