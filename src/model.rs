//! Typed vendor records and command parameters.
//!
//! Records keep every attribute the vendor sends: fields the client reads are typed, the rest land
//! in a flattened `attributes` map so items survive a decode/encode cycle unchanged.

// self
use crate::{
	_prelude::*,
	auth::{DeviceId, GroupId, ScenarioId, SiteId},
};

/// Extra vendor attributes carried alongside the typed fields.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Model label given to scenarios surfaced as devices.
pub const SCENARIO_MODEL_LABEL: &str = "Scenario";
/// Scenario type label of scenarios that can be played on demand.
pub const ON_DEMAND_SCENARIO: &str = "onDemand";

/// Installation site visible to the authenticated account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
	/// Site identifier.
	pub site_id: SiteId,
	/// Human-readable label.
	pub label: String,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Individually addressable device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
	/// Device identifier.
	pub device_id: DeviceId,
	/// Human-readable label.
	pub label: String,
	/// Vendor model identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model_id: Option<u64>,
	/// Vendor model label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model_label: Option<String>,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Group of devices addressed as one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	/// Group identifier.
	pub group_id: GroupId,
	/// Human-readable label.
	pub label: String,
	/// Vendor group type.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Entry of a combined device + group listing.
///
/// Deserializes as [`Addressable::Group`] whenever a `groupId` is present and as
/// [`Addressable::Device`] otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Addressable {
	/// Group-scoped entry.
	Group(Group),
	/// Device-scoped entry.
	Device(Device),
}
impl Addressable {
	/// Human-readable label of the entry.
	pub fn label(&self) -> &str {
		match self {
			Self::Group(group) => &group.label,
			Self::Device(device) => &device.label,
		}
	}

	/// Command target for the entry.
	pub fn target(&self) -> Target {
		Target::from(self)
	}
}
impl From<Device> for Addressable {
	fn from(value: Device) -> Self {
		Self::Device(value)
	}
}
impl From<Group> for Addressable {
	fn from(value: Group) -> Self {
		Self::Group(value)
	}
}

/// Receiver of a switch or shutter command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
	/// Single device.
	Device(DeviceId),
	/// Device group.
	Group(GroupId),
}
impl From<&Device> for Target {
	fn from(value: &Device) -> Self {
		Self::Device(value.device_id.clone())
	}
}
impl From<&Group> for Target {
	fn from(value: &Group) -> Self {
		Self::Group(value.group_id.clone())
	}
}
impl From<&Addressable> for Target {
	fn from(value: &Addressable) -> Self {
		match value {
			Addressable::Group(group) => group.into(),
			Addressable::Device(device) => device.into(),
		}
	}
}
impl From<DeviceId> for Target {
	fn from(value: DeviceId) -> Self {
		Self::Device(value)
	}
}
impl From<GroupId> for Target {
	fn from(value: GroupId) -> Self {
		Self::Group(value)
	}
}

/// Scenario as listed by the vendor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
	/// Scenario identifier.
	pub scenario_id: ScenarioId,
	/// Human-readable label.
	pub label: String,
	/// Trigger type (`onDemand`, `scheduled`, `onEvent`, ...).
	pub type_label: String,
	/// Whether the scenario is enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}
impl Scenario {
	/// Returns `true` if the scenario can be played on demand.
	pub fn is_on_demand(&self) -> bool {
		self.type_label == ON_DEMAND_SCENARIO
	}

	/// Shapes the scenario as an addressable device record.
	pub fn into_device(self) -> Device {
		Device {
			device_id: self.scenario_id.into(),
			label: self.label,
			model_id: None,
			model_label: Some(SCENARIO_MODEL_LABEL.to_owned()),
			attributes: Attributes::new(),
		}
	}
}

/// Temperature sensor with its latest reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSensor {
	/// Device identifier of the sensor.
	pub device_id: DeviceId,
	/// Human-readable label.
	pub label: String,
	/// Vendor model label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model_label: Option<String>,
	/// Latest reading in degrees Celsius.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_temperature: Option<f64>,
	/// Timestamp of the latest reading, as sent by the vendor.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_temperature_at: Option<String>,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Historical temperature reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureValue {
	/// Timestamp of the reading, as sent by the vendor.
	pub record_date: String,
	/// Reading in degrees Celsius.
	pub celsius: f64,
}

/// Time window for historical temperature queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemperatureRange {
	/// Inclusive start of the window.
	pub from: OffsetDateTime,
	/// Inclusive end of the window.
	pub to: OffsetDateTime,
}

/// Security level of a site's alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
	/// Alarm is off.
	Disarmed,
	/// Perimeter-only protection.
	Partial,
	/// Full protection.
	Armed,
}
impl SecurityLevel {
	/// Returns the label used in URLs and payloads.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Disarmed => "disarmed",
			Self::Partial => "partial",
			Self::Armed => "armed",
		}
	}
}
impl Display for SecurityLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Alarm state of a site.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmState {
	/// Current security level.
	pub status_label: SecurityLevel,
	/// Remaining vendor attributes.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Electric outlet command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwitchState {
	/// Power on.
	On,
	/// Power off.
	Off,
}
impl SwitchState {
	/// Returns the label used in URLs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::On => "on",
			Self::Off => "off",
		}
	}
}
impl From<bool> for SwitchState {
	fn from(value: bool) -> Self {
		if value { Self::On } else { Self::Off }
	}
}

/// Shutter command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShutterPosition {
	/// Raise the shutter.
	Open,
	/// Lower the shutter.
	Close,
}
impl ShutterPosition {
	/// Returns the label used in URLs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::Close => "close",
		}
	}
}
