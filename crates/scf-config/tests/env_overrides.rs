//! Environment variables override every file source.

use figment::Jail;
use scf_config::ScfSettings;

#[test]
fn env_sets_nested_fields() {
    Jail::expect_with(|jail| {
        jail.set_env("SCF_SERVER__PORT", "9000");
        jail.set_env("SCF_DATABASE__PATH", "/tmp/scf-test.db");
        jail.set_env("SCF_BOOTSTRAP__DEFAULT_DOMAIN", "Other");

        let settings = ScfSettings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.database.path, "/tmp/scf-test.db");
        assert_eq!(settings.bootstrap.default_domain, "Other");
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".scf")?;
        jail.create_file(".scf/config.toml", "[logging]\nlevel = \"warn\"\n")?;
        jail.set_env("SCF_LOGGING__LEVEL", "debug");

        let settings = ScfSettings::load().map_err(|e| e.to_string())?;
        assert_eq!(settings.logging.level, "debug");
        Ok(())
    });
}

#[test]
fn env_host_feeds_bind_addr() {
    Jail::expect_with(|jail| {
        jail.set_env("SCF_SERVER__HOST", "0.0.0.0");
        jail.set_env("SCF_SERVER__PORT", "8181");

        let settings = ScfSettings::load().map_err(|e| e.to_string())?;
        let addr = settings.server.bind_addr().map_err(|e| e.to_string())?;
        assert_eq!(addr.to_string(), "0.0.0.0:8181");
        Ok(())
    });
}
