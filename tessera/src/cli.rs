use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "tessera")]
#[command(about = "HTTP service that runs OCR on uploaded images")]
#[command(version)]
pub struct Args {
    /// Address to bind (also accepted as `-ip`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Engine configuration file; must exist when given
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse process arguments, accepting the legacy `-ip` spelling.
    pub fn from_env() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }

    /// Command-line values override whatever the environment provided.
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = self.config {
            config.ocr.engine_config = Some(path);
        }
    }
}

/// Rewrite `-ip <addr>` and `-ip=<addr>` to `--host`. clap only supports
/// single-character short flags.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-ip") => OsString::from("--host"),
            Some(s) if s.starts_with("-ip=") => OsString::from(format!("--host={}", &s[4..])),
            _ => arg,
        })
        .collect()
}
