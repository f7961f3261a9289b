#[cfg(test)]
mod tests {
    use hc_battery_check::*;

    fn battery(state: &str, name: &str) -> DeviceState {
        DeviceState::new(state)
            .with_attribute(ATTR_DEVICE_CLASS, "battery")
            .with_attribute(ATTR_FRIENDLY_NAME, name)
    }

    fn descriptions(findings: &[DeviceFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.description.as_str()).collect()
    }

    fn aggregator(exclude: &[&str]) -> Aggregator {
        Aggregator::new(
            Classifier::new(
                exclude.iter().map(|e| e.to_string()),
                DEFAULT_LEVEL_EXCLUSION_TERMS,
            ),
            Thresholds::new(10.0, 20.0),
        )
    }

    #[test]
    fn test_critical_and_low_buckets() {
        let snapshot = Snapshot::new()
            .with("sensor.a", battery("5", "a"))
            .with("sensor.b", battery("15", "b"));

        let report = aggregator(&[]).aggregate(&snapshot);
        assert_eq!(descriptions(&report.critical), vec!["• a: 5%"]);
        assert_eq!(descriptions(&report.low), vec!["• b: 15%"]);
        assert_eq!(report.critical[0].severity, Severity::Critical);
        assert_eq!(report.low[0].entity_id, "sensor.b");

        let report = aggregator(&["sensor.a"]).aggregate(&snapshot);
        assert!(report.critical.is_empty());
        assert_eq!(descriptions(&report.low), vec!["• b: 15%"]);
    }

    #[test]
    fn test_binary_indicators() {
        let snapshot = Snapshot::new()
            .with("binary_sensor.x_islow", DeviceState::new("on"))
            .with("binary_sensor.y_battery", DeviceState::new("on"))
            .with("binary_sensor.z_battery", DeviceState::new("off"))
            .with("binary_sensor.w_islow", DeviceState::new("off"));

        let report = aggregator(&[]).aggregate(&snapshot);
        assert_eq!(
            descriptions(&report.critical),
            vec!["• binary_sensor.x_islow: KRITISK LÅG BATTERI"]
        );
        assert_eq!(
            descriptions(&report.low),
            vec!["• binary_sensor.y_battery: Lågt batteri"]
        );
    }

    #[test]
    fn test_order_follows_identifiers_not_severity_or_name() {
        let snapshot = Snapshot::new()
            .with("sensor.c", battery("1", "Alpha"))
            .with("sensor.a", battery("9", "Zulu"))
            .with("sensor.b", battery("3", "Mike"))
            .with("sensor.d", battery("18", "Bravo"))
            .with("sensor.0", battery("12", "Yankee"));

        let report = aggregator(&[]).aggregate(&snapshot);
        let critical: Vec<&str> = report.critical.iter().map(|f| f.entity_id.as_str()).collect();
        let low: Vec<&str> = report.low.iter().map(|f| f.entity_id.as_str()).collect();
        assert_eq!(critical, vec!["sensor.a", "sensor.b", "sensor.c"]);
        assert_eq!(low, vec!["sensor.0", "sensor.d"]);
    }

    #[test]
    fn test_exclude_list_is_absolute() {
        let snapshot = Snapshot::new()
            .with("sensor.louies_iphone_2028", battery("15", "Louie's iPhone"))
            .with("sensor.excluded_device", battery("5", "Excluded Device"))
            .with("sensor.test_device", battery("25", "Test Device"))
            .with("sensor.low_battery_device", battery("15", "Low Battery Device"))
            .with(
                "binary_sensor.test_low_battery",
                DeviceState::new("on").with_attribute(ATTR_FRIENDLY_NAME, "Test Low Battery Binary"),
            );

        let report = aggregator(&["sensor.louies_iphone_2028", "sensor.excluded_device"])
            .aggregate(&snapshot);
        let all: Vec<&DeviceFinding> = report.critical.iter().chain(report.low.iter()).collect();
        assert!(all.iter().all(|f| f.name != "Louie's iPhone" && f.name != "Excluded Device"));
        assert!(report.critical.is_empty());
        assert_eq!(
            descriptions(&report.low),
            vec![
                "• Test Low Battery Binary: Lågt batteri",
                "• Low Battery Device: 15%",
            ]
        );
    }

    #[test]
    fn test_malformed_entities_do_not_stop_the_scan() {
        let snapshot = Snapshot::new()
            .with("sensor.a_broken", battery("charging", "Broken"))
            .with("sensor.b_gone", battery("unavailable", "Gone"))
            .with("sensor.c_unknown", battery("unknown", "Unknown"))
            .with(
                "sensor.d_no_state",
                DeviceState {
                    state: None,
                    ..battery("0", "No state")
                },
            )
            .with("sensor.e_ok", battery("4.5", "Fine"));

        let report = aggregator(&[]).aggregate(&snapshot);
        assert_eq!(descriptions(&report.critical), vec!["• Fine: 4.5%"]);
        assert!(report.low.is_empty());
    }

    #[test]
    fn test_companion_and_unrelated_entities_are_ignored() {
        let snapshot = Snapshot::new()
            .with("sensor.phone_battery_charging_status", battery("3", "Charging"))
            .with("sensor.ups_power", battery("1", "UPS power"))
            .with("sensor.temperature", DeviceState::new("2"))
            .with("light.kitchen", DeviceState::new("on"));

        assert!(aggregator(&[]).aggregate(&snapshot).is_empty());
    }

    #[test]
    fn test_unit_and_missing_name() {
        let snapshot = Snapshot::new().with(
            "sensor.remote",
            DeviceState::new("12")
                .with_attribute(ATTR_DEVICE_CLASS, "battery")
                .with_attribute(ATTR_UNIT_OF_MEASUREMENT, "%"),
        );
        let report = aggregator(&[]).aggregate(&snapshot);
        assert_eq!(descriptions(&report.low), vec!["• sensor.remote: 12%"]);
        assert_eq!(report.low[0].name, "sensor.remote");
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "sensor.door": {"state": "7", "attributes": {"device_class": "battery", "friendly_name": "Door"}},
            "binary_sensor.smoke_low_battery": {"state": "on", "attributes": {}},
            "sun.sun": {"state": "above_horizon", "attributes": {"elevation": 12.5}}
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        let report = aggregator(&[]).aggregate(&snapshot);
        assert_eq!(descriptions(&report.critical), vec!["• Door: 7%"]);
        assert_eq!(
            descriptions(&report.low),
            vec!["• binary_sensor.smoke_low_battery: Lågt batteri"]
        );
    }
}
