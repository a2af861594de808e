// crates.io
use oauth2::http::Method;
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::Client,
	auth::SiteId,
	http::HttpTransport,
	model::{Addressable, Device, Group, ShutterPosition, Target},
	resources::{self, Items},
};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the individually addressable shutters of `site`.
	pub async fn shutter_devices(&self, site: &SiteId) -> Result<Vec<Device>> {
		let path = resources::site_path(site, "device/shutter/items");
		let listing: Items<Device> = self.execute("get_shutter_devices", Method::GET, &path).await?;

		Ok(listing.items)
	}

	/// Lists the shutter groups of `site`.
	pub async fn shutter_groups(&self, site: &SiteId) -> Result<Vec<Group>> {
		let path = resources::site_path(site, "group/shutter/items");
		let listing: Items<Group> = self.execute("get_shutter_groups", Method::GET, &path).await?;

		Ok(listing.items)
	}

	/// Lists shutters and shutter groups together, devices first.
	pub async fn shutters(&self, site: &SiteId) -> Result<Vec<Addressable>> {
		let (devices, groups) =
			futures::try_join!(self.shutter_devices(site), self.shutter_groups(site))?;

		Ok(resources::combine(devices, groups))
	}

	/// Opens or closes a shutter or a shutter group.
	pub async fn set_shutter_position(
		&self,
		site: &SiteId,
		target: impl Into<Target>,
		position: ShutterPosition,
	) -> Result<()> {
		let path =
			resources::target_path(site, &target.into(), "shutter", "shutter", position.as_str());
		let _: IgnoredAny = self.execute("set_shutter_position", Method::POST, &path).await?;

		Ok(())
	}
}
