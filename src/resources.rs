//! Resource accessors: one authenticated call per operation, shaped into [`model`](crate::model)
//! records.
//!
//! Every accessor is an inherent method on [`Client`](crate::api::Client). Listings return the
//! vendor's `items` unchanged and in order; commands return once the envelope reports success.

mod alarm;
mod electrics;
mod scenarios;
mod shutters;
mod sites;
mod temperature;

// self
use crate::{
	_prelude::*,
	auth::SiteId,
	model::{Addressable, Device, Group, Target},
};

/// Listing payload returned by every `.../items` endpoint.
#[derive(Deserialize)]
struct Items<T> {
	items: Vec<T>,
}

fn site_path(site: &SiteId, rest: &str) -> String {
	format!("v2/site/{site}/{rest}")
}

/// Builds the command path for a device or group target.
///
/// `device_kind` and `group_kind` are the vendor's names for the same resource in the device
/// and group templates (`socket` vs `electric` for outlets).
fn target_path(
	site: &SiteId,
	target: &Target,
	device_kind: &str,
	group_kind: &str,
	command: &str,
) -> String {
	match target {
		Target::Device(device) =>
			site_path(site, &format!("device/{device}/{device_kind}/{command}")),
		Target::Group(group) => site_path(site, &format!("group/{group}/{group_kind}/{command}")),
	}
}

/// Concatenates a fan-out result: device-scoped entries first, then group-scoped ones.
fn combine(devices: Vec<Device>, groups: Vec<Group>) -> Vec<Addressable> {
	devices
		.into_iter()
		.map(Addressable::from)
		.chain(groups.into_iter().map(Addressable::from))
		.collect()
}
