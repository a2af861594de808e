// crates.io
use oauth2::http::Method;
// self
use crate::{_prelude::*, api::Client, http::HttpTransport, model::Site, resources::Items};

impl<C> Client<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists the sites visible to the authenticated account.
	pub async fn sites(&self) -> Result<Vec<Site>> {
		let listing: Items<Site> =
			self.execute("get_sites", Method::GET, "v2/client/site/items").await?;

		Ok(listing.items)
	}
}
