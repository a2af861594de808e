// crates.io
use oauth2::http::Method;
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::Client,
	auth::SiteId,
	http::HttpTransport,
	model::{Addressable, Device, Group, SwitchState, Target},
	resources::{self, Items},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the individually addressable outlets of `site`.
	pub async fn electric_devices(&self, site: &SiteId) -> Result<Vec<Device>> {
		let path = resources::site_path(site, "device/socket/items");
		let listing: Items<Device> =
			self.execute("get_electric_devices", Method::GET, &path).await?;

		Ok(listing.items)
	}

	/// Lists the outlet groups of `site`.
	pub async fn electric_groups(&self, site: &SiteId) -> Result<Vec<Group>> {
		let path = resources::site_path(site, "group/electric/items");
		let listing: Items<Group> = self.execute("get_electric_groups", Method::GET, &path).await?;

		Ok(listing.items)
	}

	/// Lists outlets and outlet groups together, devices first.
	///
	/// Both listings are requested concurrently; the first failure fails the combined call.
	pub async fn electrics(&self, site: &SiteId) -> Result<Vec<Addressable>> {
		let (devices, groups) =
			futures::try_join!(self.electric_devices(site), self.electric_groups(site))?;

		Ok(resources::combine(devices, groups))
	}

	/// Switches an outlet or an outlet group on or off.
	pub async fn switch_electric(
		&self,
		site: &SiteId,
		target: impl Into<Target>,
		state: SwitchState,
	) -> Result<()> {
		let path =
			resources::target_path(site, &target.into(), "socket", "electric", state.as_str());
		let _: IgnoredAny = self.execute("switch_electric", Method::POST, &path).await?;

		Ok(())
	}
}
