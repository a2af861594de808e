#![cfg(feature = "reqwest")]

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
use time::macros;
// self
use myfox_client::{
	_preludet::*,
	DefaultClient,
	auth::{AccessToken, DeviceId, IdentifierError, ScenarioId, SiteId},
	model::{
		Addressable, Device, Group, SecurityLevel, ShutterPosition, SwitchState, TemperatureRange,
	},
};

const ACCESS: &str = "access-seeded";
const SITE: &str = "4021";

fn seeded_client(server: &MockServer) -> ReqwestTestClient {
	let (client, _store) = build_reqwest_test_client(test_config(&server.base_url()));

	client.with_access_token(AccessToken::new(
		ACCESS,
		OffsetDateTime::now_utc() + Duration::hours(1),
	))
}

fn site() -> SiteId {
	SiteId::new(SITE).expect("Site fixture should be valid.")
}

fn ok(payload: Value) -> String {
	json!({ "status": "OK", "payload": payload }).to_string()
}

#[tokio::test]
async fn listing_items_are_returned_unchanged() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let items = json!([
		{ "siteId": "4021", "label": "Home", "brand": "myfox", "timezone": "Europe/Paris" },
		{ "siteId": "4022", "label": "Cottage", "cameraCount": 1 },
	]);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/client/site/items").query_param("access_token", ACCESS);
			then.status(200)
				.header("content-type", "application/json")
				.body(ok(json!({ "items": items.clone() })));
		})
		.await;
	let sites = client.sites().await.expect("Site listing should succeed.");

	mock.assert_async().await;

	assert_eq!(serde_json::to_value(&sites).expect("Sites should serialize."), items);
}

#[tokio::test]
async fn non_ok_envelope_names_the_action() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/client/site/items");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"status":"ERROR","error":"invalid_token"}"#);
		})
		.await;
	let err = client.sites().await.expect_err("ERROR envelope should fail.");

	mock.assert_async().await;

	match err {
		Error::Api { action, status, envelope } => {
			assert_eq!(action, "get_sites");
			assert_eq!(status, "ERROR");
			assert_eq!(envelope, json!({ "status": "ERROR", "error": "invalid_token" }));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn http_failures_carry_status_and_reason() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/security"));
			then.status(500).body("upstream exploded");
		})
		.await;
	let err = client.alarm_state(&site()).await.expect_err("HTTP 500 should fail.");

	mock.assert_async().await;

	match err {
		Error::Http { action, status, status_text } => {
			assert_eq!(action, "get_alarm_state");
			assert_eq!(status, 500);
			assert_eq!(status_text, "Internal Server Error");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn unparseable_bodies_are_parse_errors() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/scenario/items"));
			then.status(200).body("<html>maintenance</html>");
		})
		.await;
	let err = client.scenarios(&site()).await.expect_err("HTML body should fail.");

	mock.assert_async().await;

	assert_eq!(err.action(), Some("get_scenarios"));
	assert!(matches!(err, Error::Parse { ref body, .. } if body == "<html>maintenance</html>"));
}

#[tokio::test]
async fn alarm_state_round_trip() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/security"));
			then.status(200).body(ok(json!({ "status": 1, "statusLabel": "disarmed" })));
		})
		.await;
	let write = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(format!("/v2/site/{SITE}/security/set/armed"))
				.query_param("access_token", ACCESS);
			then.status(200).body(r#"{"status":"OK","timestamp":1735689600,"payload":{}}"#);
		})
		.await;
	let state = client.alarm_state(&site()).await.expect("Alarm state should load.");

	assert_eq!(state.status_label, SecurityLevel::Disarmed);

	client
		.set_alarm_state(&site(), SecurityLevel::Armed)
		.await
		.expect("Arming the alarm should succeed.");

	read.assert_async().await;
	write.assert_async().await;
}

#[tokio::test]
async fn electrics_list_devices_before_groups_regardless_of_timing() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let devices = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/device/socket/items"));
			then.status(200).delay(StdDuration::from_millis(300)).body(ok(json!({
				"items": [
					{ "deviceId": 11, "label": "Lamp", "modelLabel": "Socket" },
					{ "deviceId": 12, "label": "Heater", "modelLabel": "Socket" },
				],
			})));
		})
		.await;
	let groups = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/group/electric/items"));
			then.status(200)
				.body(ok(json!({ "items": [{ "groupId": 21, "label": "Ground floor" }] })));
		})
		.await;
	let electrics = client.electrics(&site()).await.expect("Combined listing should succeed.");

	devices.assert_async().await;
	groups.assert_async().await;

	assert_eq!(
		electrics.iter().map(Addressable::label).collect::<Vec<_>>(),
		["Lamp", "Heater", "Ground floor"]
	);
	assert!(matches!(electrics[2], Addressable::Group(_)));
}

#[tokio::test]
async fn fan_out_fails_when_either_listing_fails() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let _devices = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/device/shutter/items"));
			then.status(200).body(ok(json!({ "items": [] })));
		})
		.await;
	let _groups = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/group/shutter/items"));
			then.status(503);
		})
		.await;
	let err = client.shutters(&site()).await.expect_err("Failed group listing should fail.");

	assert_eq!(err.action(), Some("get_shutter_groups"));
}

#[tokio::test]
async fn switch_electric_picks_group_or_device_template() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let group: Group = serde_json::from_value(json!({ "groupId": 21, "label": "Ground floor" }))
		.expect("Group fixture should deserialize.");
	let device: Device = serde_json::from_value(json!({ "deviceId": 11, "label": "Lamp" }))
		.expect("Device fixture should deserialize.");
	let group_on = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/v2/site/{SITE}/group/21/electric/on"));
			then.status(200).body(ok(Value::Null));
		})
		.await;
	let device_off = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/v2/site/{SITE}/device/11/socket/off"));
			then.status(200).body(ok(Value::Null));
		})
		.await;

	client
		.switch_electric(&site(), &group, SwitchState::On)
		.await
		.expect("Group command should succeed.");
	client
		.switch_electric(&site(), &device, SwitchState::Off)
		.await
		.expect("Device command should succeed.");

	group_on.assert_calls_async(1).await;
	device_off.assert_calls_async(1).await;
}

#[tokio::test]
async fn shutter_commands_accept_listing_entries() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let _devices = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/device/shutter/items"));
			then.status(200)
				.body(ok(json!({ "items": [{ "deviceId": 31, "label": "Kitchen" }] })));
		})
		.await;
	let _groups = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/group/shutter/items"));
			then.status(200).body(ok(json!({ "items": [{ "groupId": 41, "label": "All" }] })));
		})
		.await;
	let device_open = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/v2/site/{SITE}/device/31/shutter/open"));
			then.status(200).body(r#"{"status":"OK"}"#);
		})
		.await;
	let group_close = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/v2/site/{SITE}/group/41/shutter/close"));
			then.status(200).body(r#"{"status":"OK"}"#);
		})
		.await;
	let shutters = client.shutters(&site()).await.expect("Shutter listing should succeed.");

	client
		.set_shutter_position(&site(), &shutters[0], ShutterPosition::Open)
		.await
		.expect("Opening a device should succeed.");
	client
		.set_shutter_position(&site(), &shutters[1], ShutterPosition::Close)
		.await
		.expect("Closing a group should succeed.");

	device_open.assert_calls_async(1).await;
	group_close.assert_calls_async(1).await;
}

#[tokio::test]
async fn scenarios_keep_on_demand_entries_only() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let _listing = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/scenario/items"));
			then.status(200).body(ok(json!({
				"items": [
					{ "scenarioId": 7, "label": "Leaving", "typeLabel": "onDemand", "enabled": true },
					{ "scenarioId": 8, "label": "Sunrise", "typeLabel": "scheduled" },
					{ "scenarioId": 9, "label": "Alarm", "typeLabel": "onEvent" },
				],
			})));
		})
		.await;
	let play = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(format!("/v2/site/{SITE}/scenario/7/play"))
				.query_param("access_token", ACCESS);
			then.status(200).body(r#"{"status":"OK"}"#);
		})
		.await;
	let scenarios = client.scenarios(&site()).await.expect("Scenario listing should succeed.");

	assert_eq!(
		serde_json::to_value(&scenarios).expect("Scenarios should serialize."),
		json!([{ "deviceId": "7", "label": "Leaving", "modelLabel": "Scenario" }])
	);

	client
		.play_scenario(&site(), &ScenarioId::from(&scenarios[0].device_id))
		.await
		.expect("Playing a scenario should succeed.");

	play.assert_calls_async(1).await;
}

#[tokio::test]
async fn temperature_history_forwards_the_range() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/v2/site/{SITE}/device/55/data/temperature"))
				.query_param("dateFrom", "2025-01-01T00:00:00Z")
				.query_param("dateTo", "2025-01-02T00:00:00Z")
				.query_param("access_token", ACCESS);
			then.status(200).body(ok(json!({
				"items": [
					{ "recordDate": "2025-01-01T06:00:00Z", "celsius": 18.5 },
					{ "recordDate": "2025-01-01T18:00:00Z", "celsius": 21.0 },
				],
			})));
		})
		.await;
	let values = client
		.temperatures(
			&site(),
			&DeviceId::new("55").expect("Device fixture should be valid."),
			Some(TemperatureRange {
				from: macros::datetime!(2025-01-01 00:00 UTC),
				to: macros::datetime!(2025-01-02 00:00 UTC),
			}),
		)
		.await
		.expect("Temperature history should load.");

	mock.assert_async().await;

	assert_eq!(values.iter().map(|value| value.celsius).collect::<Vec<_>>(), [18.5, 21.0]);
}

#[tokio::test]
async fn last_temperature_searches_the_sensor_listing() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/device/data/temperature/items"));
			then.status(200).body(ok(json!({
				"items": [
					{ "deviceId": 55, "label": "Living room", "lastTemperature": 20.5 },
					{ "deviceId": 56, "label": "Bedroom", "lastTemperature": 18.0 },
				],
			})));
		})
		.await;
	let found = client
		.last_temperature(&site(), &DeviceId::new("56").expect("Device fixture should be valid."))
		.await
		.expect("Sensor lookup should succeed.")
		.expect("Sensor 56 should be listed.");

	assert_eq!(found.label, "Bedroom");
	assert_eq!(found.last_temperature, Some(18.0));

	let missing = client
		.last_temperature(&site(), &DeviceId::new("99").expect("Device fixture should be valid."))
		.await
		.expect("Sensor lookup should succeed.");

	assert!(missing.is_none());

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn expired_token_is_refreshed_before_the_call() {
	let server = MockServer::start_async().await;
	let (client, _store) = build_reqwest_test_client(test_config(&server.base_url()));
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-fresh","token_type":"Bearer","expires_in":3600}"#,
			);
		})
		.await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/client/site/items")
				.query_param("access_token", "access-fresh");
			then.status(200).body(ok(json!({ "items": [] })));
		})
		.await;
	let (first, second) = tokio::join!(client.sites(), client.sites());

	assert!(first.expect("First listing should succeed.").is_empty());
	assert!(second.expect("Second listing should succeed.").is_empty());

	token.assert_calls_async(1).await;
	listing.assert_calls_async(2).await;
}

#[tokio::test]
async fn path_altering_identifiers_never_reach_the_server() {
	let server = MockServer::start_async().await;
	let client = seeded_client(&server);
	let site_listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/client/site/items");
			then.status(200).body(ok(json!({ "items": [] })));
		})
		.await;
	let devices = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/device/socket/items"));
			then.status(200).body(ok(json!({
				"items": [{ "deviceId": "11/../../../client/site/items", "label": "Lamp" }],
			})));
		})
		.await;

	assert!(matches!(
		SiteId::new("1/../../client/site/items?x="),
		Err(IdentifierError::ReservedCharacter { character: '/', .. })
	));

	let err = client
		.electric_devices(&site())
		.await
		.expect_err("Listing with a path-altering device id should fail.");

	devices.assert_calls_async(1).await;
	site_listing.assert_calls_async(0).await;

	assert!(matches!(err, Error::Parse { action: "get_electric_devices", .. }));
}

#[tokio::test]
async fn default_transport_does_not_follow_redirects() {
	let server = MockServer::start_async().await;
	let expires_at = OffsetDateTime::now_utc() + Duration::hours(1);
	let client = DefaultClient::new(test_config(&server.base_url()))
		.expect("Default client should build.")
		.with_access_token(AccessToken::new(ACCESS, expires_at));
	let redirect = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/client/site/items");
			then.status(302).header("location", format!("{}/elsewhere", server.base_url()));
		})
		.await;
	let elsewhere = server
		.mock_async(|when, then| {
			when.path("/elsewhere");
			then.status(200).body(ok(json!({ "items": [] })));
		})
		.await;
	let err = client.sites().await.expect_err("Redirect should surface as an HTTP failure.");

	redirect.assert_calls_async(1).await;
	elsewhere.assert_calls_async(0).await;

	assert!(matches!(err, Error::Http { action: "get_sites", status: 302, .. }));
}

async fn refresh_list_and_fail(server: &MockServer, debug: bool) -> (String, Value, String) {
	let config = test_config(&server.base_url()).with_debug(debug).with_debug_payloads(debug);
	let (client, _store) = build_reqwest_test_client(config);
	let token = client.valid_token().await.expect("Refresh should succeed.");
	let sites = client.sites().await.expect("Site listing should succeed.");
	let err = client.alarm_state(&site()).await.expect_err("HTTP 500 should fail.");

	(
		token.expose().to_owned(),
		serde_json::to_value(&sites).expect("Sites should serialize."),
		format!("{err:?}"),
	)
}

#[tokio::test]
async fn debug_flags_leave_results_unchanged() {
	#[cfg(feature = "tracing")]
	let _subscriber = tracing::subscriber::set_default(
		tracing_subscriber::fmt()
			.with_max_level(tracing::Level::DEBUG)
			.with_test_writer()
			.finish(),
	);
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-fresh","token_type":"Bearer","expires_in":3600}"#,
			);
		})
		.await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/client/site/items")
				.query_param("access_token", "access-fresh");
			then.status(200).body(ok(json!({ "items": [{ "siteId": "4021", "label": "Home" }] })));
		})
		.await;
	let failing = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/v2/site/{SITE}/security"));
			then.status(500).body("upstream exploded");
		})
		.await;
	let quiet = refresh_list_and_fail(&server, false).await;
	let verbose = refresh_list_and_fail(&server, true).await;

	token.assert_calls_async(2).await;
	listing.assert_calls_async(2).await;
	failing.assert_calls_async(2).await;

	assert_eq!(verbose, quiet);
	assert_eq!(quiet.0, "access-fresh");
	assert!(quiet.2.contains("status: 500"));
}
