fn main() {
    println!("Run `cargo test -p registry-compat` to execute registry compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use serde::Deserialize;
    use steamserver_networking::{
        IpAddress, NetworkingIdentity, NetworkingRegistries, Settings,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads and deserializes a fixture file.
    fn load_fixture<T: serde::de::DeserializeOwned>(name: &str) -> T {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct AddressCase {
        input: String,
        with_port: String,
        without_port: String,
        ipv4: u32,
        localhost: bool,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct IdentityCase {
        input: String,
        canonical: String,
        kind: i32,
        steam_id: u64,
    }

    #[derive(Debug, Deserialize)]
    struct Fixture<T> {
        accepted: Vec<T>,
        rejected: Vec<String>,
    }

    // --- Address strings ---

    #[test]
    fn fixture_address_accepted() {
        let fixture: Fixture<AddressCase> = load_fixture("address_strings.json");
        let regs = NetworkingRegistries::default();

        for case in &fixture.accepted {
            assert!(regs.addresses.parse("a", &case.input), "parse {}", case.input);
            assert_eq!(regs.addresses.to_string("a", true), case.with_port, "{}", case.input);
            assert_eq!(regs.addresses.to_string("a", false), case.without_port, "{}", case.input);
            assert_eq!(regs.addresses.get_ipv4("a").unwrap_or(0), case.ipv4, "{}", case.input);
            assert_eq!(regs.addresses.is_localhost("a"), case.localhost, "{}", case.input);
        }
    }

    #[test]
    fn fixture_address_reparse_is_stable() {
        let fixture: Fixture<AddressCase> = load_fixture("address_strings.json");

        for case in &fixture.accepted {
            let first: IpAddress = case.input.parse().unwrap();
            let second: IpAddress = first.to_string_with_port(true).parse().unwrap();
            assert_eq!(first, second, "{}", case.input);
            assert_eq!(second.to_string_with_port(true), case.with_port);
        }
    }

    #[test]
    fn fixture_address_rejected() {
        let fixture: Fixture<AddressCase> = load_fixture("address_strings.json");
        let regs = NetworkingRegistries::default();
        regs.addresses.set_ipv4("a", 0x0102_0304, 5);

        for text in &fixture.rejected {
            assert!(!regs.addresses.parse("a", text), "accepted {text:?}");
            assert_eq!(regs.addresses.to_string("a", true), "1.2.3.4:5");
        }
    }

    // --- Identity strings ---

    #[test]
    fn fixture_identity_accepted() {
        let fixture: Fixture<IdentityCase> = load_fixture("identity_strings.json");
        let regs = NetworkingRegistries::default();

        for case in &fixture.accepted {
            assert!(regs.identities.parse("id", &case.input), "parse {}", case.input);
            assert_eq!(regs.identities.to_string("id"), case.canonical, "{}", case.input);

            let entry = regs
                .identities
                .enumerate()
                .into_iter()
                .find(|e| e.reference_name == "id")
                .unwrap();
            assert_eq!(entry.identity_type, case.kind, "{}", case.input);
            assert_eq!(entry.steam_id, case.steam_id, "{}", case.input);
        }
    }

    #[test]
    fn fixture_identity_canonical_is_fixed_point() {
        let fixture: Fixture<IdentityCase> = load_fixture("identity_strings.json");

        for case in &fixture.accepted {
            let parsed: NetworkingIdentity = case.canonical.parse().unwrap();
            assert_eq!(parsed.to_string(), case.canonical);
        }
    }

    #[test]
    fn fixture_identity_rejected() {
        let fixture: Fixture<IdentityCase> = load_fixture("identity_strings.json");
        let regs = NetworkingRegistries::default();
        regs.identities.set_generic_string("id", "keep-me");

        for text in &fixture.rejected {
            assert!(!regs.identities.parse("id", text), "accepted {text:?}");
            assert_eq!(regs.identities.get_generic_string("id").as_deref(), Some("keep-me"));
        }
    }

    // --- Registry behavior ---

    #[test]
    fn implicit_insert_on_read_is_preserved_by_default() {
        let regs = NetworkingRegistries::default();
        assert_eq!(regs.addresses.get_ipv4("never_added").unwrap_or(0), 0);
        assert!(
            regs.addresses
                .enumerate()
                .iter()
                .any(|e| e.reference_name == "never_added")
        );
    }

    #[test]
    fn implicit_insert_can_be_disabled() {
        let regs = NetworkingRegistries::new(Settings {
            insert_on_read: false,
            ..Settings::default()
        });
        assert_eq!(regs.addresses.get_ipv4("never_added"), None);
        assert!(regs.addresses.enumerate().is_empty());
    }

    #[test]
    fn enumerate_counts_distinct_adds() {
        let regs = NetworkingRegistries::default();
        let names = ["p1", "p2", "p3", "p4", "p5"];
        for name in names {
            regs.identities.add(name);
            regs.addresses.add(name);
        }
        regs.identities.set_steam_id64("p3", 76561198000000000);
        regs.addresses.set_ipv6_localhost("p3", 1);

        assert_eq!(regs.identities.enumerate().len(), names.len());
        assert_eq!(regs.addresses.enumerate().len(), names.len());
    }

    #[test]
    fn options_keep_length_and_order() {
        let regs = NetworkingRegistries::default();
        let options: Vec<serde_json::Value> = serde_json::from_str(
            r#"[[24, 1, 5000], [25, 1, 10000], [9, 2, 1048576], [38, 4, "srv"]]"#,
        )
        .unwrap();

        let out = regs.option_converter().convert(&options).unwrap();
        assert_eq!(out.len(), options.len());
        let keys: Vec<i32> = out.iter().map(|v| v.key.0).collect();
        assert_eq!(keys, vec![24, 25, 9, 38]);
    }
}
