#![forbid(unsafe_code)]

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use edgesign_core::{settings, SignatureAlgorithm, SigningConfig};
use edgesign_embed::link::DEFAULT_PROXY_BASE;
use edgesign_embed::{render_download_link, sign_or_fallback, DownloadLink, Fallback};
use edgesign_sign::{verify_signed_url, PublicKey, Signer};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "edgesign",
    version,
    about = "Time-limited signed URLs for CDN resources (canned policy)."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Sign one or more resource URLs.
    Sign {
        /// Resource URLs to sign.
        #[arg(required = true)]
        resources: Vec<String>,

        /// Settings JSON (pem or pem_file, key_pair_id, lifetime_minutes).
        #[arg(long, env = "EDGESIGN_SETTINGS")]
        settings: PathBuf,

        /// Signing time as UNIX epoch seconds (default: now).
        #[arg(long)]
        now: Option<i64>,

        /// Output JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render an HTML download link for a signed resource.
    Link {
        /// Resource URL to sign.
        resource: String,

        #[arg(long, env = "EDGESIGN_SETTINGS")]
        settings: PathBuf,

        /// Link text.
        #[arg(long)]
        label: Option<String>,

        /// Filename suggested to the download proxy.
        #[arg(long)]
        filename: Option<String>,

        /// Base path of the download proxy.
        #[arg(long, default_value = DEFAULT_PROXY_BASE)]
        proxy_base: String,

        /// Link the unsigned resource if signing fails.
        #[arg(long)]
        allow_unsigned: bool,

        #[arg(long)]
        now: Option<i64>,
    },

    /// Verify a signed URL against the CDN public key.
    Verify {
        /// Signed URL.
        url: String,

        /// Path to the RSA public key PEM.
        #[arg(long)]
        pubkey: PathBuf,

        /// Signature algorithm: rsa-sha1, rsa-sha256.
        #[arg(long, default_value = "rsa-sha1")]
        algorithm: SignatureAlgorithm,

        /// Verification time as UNIX epoch seconds (default: now).
        #[arg(long)]
        now: Option<i64>,

        #[arg(long)]
        json: bool,
    },

    /// Validate a settings file and print it with the key redacted.
    Settings {
        #[arg(long, env = "EDGESIGN_SETTINGS")]
        settings: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Sign {
            resources,
            settings,
            now,
            json,
        } => cmd_sign(&resources, &settings, now, json),

        Cmd::Link {
            resource,
            settings,
            label,
            filename,
            proxy_base,
            allow_unsigned,
            now,
        } => cmd_link(
            &resource,
            &settings,
            label,
            filename,
            &proxy_base,
            allow_unsigned,
            now,
        ),

        Cmd::Verify {
            url,
            pubkey,
            algorithm,
            now,
            json,
        } => cmd_verify(&url, &pubkey, algorithm, now, json),

        Cmd::Settings { settings, json } => cmd_settings(&settings, json),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn resolve_now(now: Option<i64>) -> Result<DateTime<Utc>> {
    match now {
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| anyhow!("--now {secs} is out of range")),
        None => Ok(Utc::now()),
    }
}

fn load_config(path: &Path) -> Result<SigningConfig> {
    let settings = settings::load(path)
        .with_context(|| format!("cannot load settings {}", path.display()))?;
    let config = settings
        .to_signing_config()
        .with_context(|| format!("{}: invalid settings", path.display()))?;
    Ok(config)
}

fn cmd_sign(
    resources: &[String],
    settings_path: &Path,
    now: Option<i64>,
    json_out: bool,
) -> Result<()> {
    let config = load_config(settings_path)?;
    let signer = Signer::from_config(&config)?;
    let now = resolve_now(now)?;

    let mut signed = Vec::with_capacity(resources.len());
    for resource in resources {
        let url = signer
            .sign_url(resource, now)
            .with_context(|| format!("cannot sign {resource}"))?;
        signed.push(url);
    }

    if json_out {
        let out: Vec<_> = signed
            .iter()
            .map(|url| {
                json!({
                    "url": url.as_str(),
                    "expires": url.expires(),
                    "key_pair_id": signer.key_pair_id(),
                    "algorithm": signer.algorithm(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for url in &signed {
            println!("{url}");
        }
    }
    eprintln!(
        "  signed {} URL(s) (key_pair_id: {})",
        signed.len(),
        signer.key_pair_id()
    );
    Ok(())
}

fn cmd_link(
    resource: &str,
    settings_path: &Path,
    label: Option<String>,
    filename: Option<String>,
    proxy_base: &str,
    allow_unsigned: bool,
    now: Option<i64>,
) -> Result<()> {
    let config = load_config(settings_path)?;
    let now = resolve_now(now)?;
    let fallback = if allow_unsigned {
        Fallback::Unsigned
    } else {
        Fallback::Deny
    };

    let outcome = sign_or_fallback(resource, &config, now, fallback)
        .with_context(|| format!("cannot sign {resource}"))?;

    let mut attrs = Vec::new();
    if let Some(label) = label.as_deref() {
        attrs.push(("label", label));
    }
    if let Some(filename) = filename.as_deref() {
        attrs.push(("filename", filename));
    }
    let link = DownloadLink::from_attributes(attrs);

    println!("{}", render_download_link(outcome.as_str(), &link, proxy_base));
    if !outcome.is_signed() {
        eprintln!("  linked UNSIGNED {resource}");
    }
    Ok(())
}

fn cmd_verify(
    url: &str,
    pubkey_path: &Path,
    algorithm: SignatureAlgorithm,
    now: Option<i64>,
    json_out: bool,
) -> Result<()> {
    let pem = std::fs::read_to_string(pubkey_path)
        .with_context(|| format!("cannot read pubkey {}", pubkey_path.display()))?;
    let public_key = PublicKey::from_pem(&pem)?;
    let now = resolve_now(now)?;

    match verify_signed_url(url, &public_key, algorithm, now) {
        Ok(verified) => {
            if json_out {
                let out = json!({
                    "valid": true,
                    "resource": verified.resource,
                    "expires": verified.expires,
                    "key_pair_id": verified.key_pair_id,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            eprintln!(
                "  signature valid (key_pair_id: {}, expires: {})",
                verified.key_pair_id, verified.expires
            );
            Ok(())
        }
        Err(err) if json_out => {
            let out = json!({
                "valid": false,
                "error": err.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            std::process::exit(1);
        }
        Err(err) => bail!("verification failed: {err}"),
    }
}

fn cmd_settings(settings_path: &Path, json_out: bool) -> Result<()> {
    let settings = settings::load(settings_path)
        .with_context(|| format!("cannot load settings {}", settings_path.display()))?;
    let config = settings
        .to_signing_config()
        .with_context(|| format!("{}: invalid settings", settings_path.display()))?;
    let signer = Signer::from_config(&config)
        .with_context(|| format!("{}: unusable key", settings_path.display()))?;

    if json_out {
        println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
    }
    eprintln!(
        "  ok  {} (key_pair_id: {}, lifetime: {} min, algorithm: {})",
        settings_path.display(),
        signer.key_pair_id(),
        settings.lifetime_minutes,
        signer.algorithm()
    );
    Ok(())
}
