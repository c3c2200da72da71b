use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde::Deserialize;

use keepsake_archive::{Archive, ArchiveConfig, FsKvStore, InMemoryKvStore, KvStore};
use keepsake_media::{FsBlobStore, MediaConfig, MediaStore};
use keepsake_server::{AppState, KeepsakeServer, ServerConfig};

use crate::cli::{Cli, Command, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
    }
}

/// Optional TOML config file. Every field has a default; command-line
/// flags win over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind: Option<String>,
    data_dir: Option<String>,
    #[serde(default)]
    strict_media: bool,
    #[serde(default)]
    seed_demo: bool,
}

impl FileConfig {
    fn load(path: &str) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config file {path}"))
    }
}

/// Effective settings after merging the config file with the flags.
struct ServeSettings {
    bind: SocketAddr,
    data_dir: Option<PathBuf>,
    strict_media: bool,
    seed_demo: bool,
}

fn resolve_settings(args: &ServeArgs) -> anyhow::Result<ServeSettings> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let bind = args
        .bind
        .clone()
        .or(file.bind)
        .unwrap_or_else(|| ServerConfig::default().bind_addr.to_string());
    let bind: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    Ok(ServeSettings {
        bind,
        data_dir: args.data_dir.clone().or(file.data_dir).map(PathBuf::from),
        strict_media: args.strict_media || file.strict_media,
        seed_demo: args.seed_demo || file.seed_demo,
    })
}

fn build_state(settings: &ServeSettings) -> anyhow::Result<AppState> {
    let mut archive_config = if settings.strict_media {
        ArchiveConfig::strict()
    } else {
        ArchiveConfig::default()
    };
    archive_config.seed_demo_entries = settings.seed_demo;

    let (kv, media): (Arc<dyn KvStore>, MediaStore) = match &settings.data_dir {
        Some(dir) => {
            let kv = FsKvStore::open(dir.join("archive"))
                .with_context(|| format!("failed to open archive at {}", dir.display()))?;
            let blobs = FsBlobStore::open(dir.join("media"))
                .with_context(|| format!("failed to open media store at {}", dir.display()))?;
            (
                Arc::new(kv),
                MediaStore::new(Arc::new(blobs), MediaConfig::default()),
            )
        }
        None => (
            Arc::new(InMemoryKvStore::new()),
            MediaStore::sandboxed(MediaConfig::default()),
        ),
    };

    let archive = Archive::new(kv, archive_config);
    Ok(AppState::new(Arc::new(archive), Arc::new(media)))
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args)?;
    let state = build_state(&settings)?;

    let storage = match &settings.data_dir {
        Some(dir) => format!("{}", dir.display()).bold(),
        None => "in-memory (sandboxed media)".yellow(),
    };
    println!(
        "{} Keepsake serving on {} — storage: {}",
        "✓".green().bold(),
        settings.bind.to_string().bold(),
        storage,
    );

    let server = KeepsakeServer::new(
        ServerConfig {
            bind_addr: settings.bind,
        },
        state,
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::cli::ServeArgs;

    #[test]
    fn defaults_without_config_or_flags() {
        let settings = resolve_settings(&ServeArgs::default()).unwrap();
        assert_eq!(settings.bind, "127.0.0.1:8787".parse().unwrap());
        assert!(settings.data_dir.is_none());
        assert!(!settings.strict_media);
        assert!(!settings.seed_demo);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind = \"0.0.0.0:9000\"\nstrict_media = true").unwrap();

        let args = ServeArgs {
            bind: Some("127.0.0.1:9001".into()),
            config: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.bind, "127.0.0.1:9001".parse().unwrap());
        assert!(settings.strict_media);
    }

    #[test]
    fn config_file_fills_unset_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = \"/tmp/keepsake-data\"\nseed_demo = true").unwrap();

        let args = ServeArgs {
            config: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/keepsake-data")));
        assert!(settings.seed_demo);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bnid = \"0.0.0.0:9000\"").unwrap();

        let args = ServeArgs {
            config: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert!(resolve_settings(&args).is_err());
    }

    #[test]
    fn invalid_bind_address_is_an_error() {
        let args = ServeArgs {
            bind: Some("not-an-address".into()),
            ..Default::default()
        };
        assert!(resolve_settings(&args).is_err());
    }

    #[test]
    fn builds_durable_state_under_a_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ServeSettings {
            bind: "127.0.0.1:8787".parse().unwrap(),
            data_dir: Some(dir.path().to_path_buf()),
            strict_media: false,
            seed_demo: false,
        };
        build_state(&settings).unwrap();
        assert!(dir.path().join("archive").is_dir());
        assert!(dir.path().join("media").is_dir());
    }
}
