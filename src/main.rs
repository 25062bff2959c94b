mod cli;

use mirrorcast::mirror::MirrorResolver;
use mirrorcast::{producer, resolve};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mc_av::ToolRegistry;
use mc_core::config::Config;
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn produce(
    config: &Config,
    input: &Path,
    output_dir: &Path,
    mirrors: Vec<String>,
    force: bool,
) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);

    let rt = tokio::runtime::Runtime::new()?;
    let asset = rt.block_on(producer::produce(
        config, &tools, input, output_dir, &mirrors, force,
    ))?;

    tracing::info!("Playlist written to {}", asset.playlist_path.display());
    println!("{}", asset.manifest.to_json_pretty());
    Ok(())
}

fn resolve(config: &Config, key_out: Option<PathBuf>) -> Result<()> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("Usage: cat manifest.json | mirrorcast resolve");
    }

    let mut raw = String::new();
    stdin
        .read_to_string(&mut raw)
        .context("Failed to read manifest from stdin")?;

    let resolver = MirrorResolver::from_config(&config.resolver);
    let rt = tokio::runtime::Runtime::new()?;
    let resolved = rt.block_on(resolve::resolve_manifest(
        config,
        &resolver,
        &raw,
        key_out.as_deref(),
    ))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(resolved.playlist.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = ToolRegistry::discover(&config.tools).check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. `produce` needs ffmpeg in PATH or tools.ffmpeg_path.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config file {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!(
        "  Encoder: {}p, crf {}, {}s segments",
        config.encoder.height, config.encoder.crf, config.encoder.segment_duration_secs
    );
    println!("  Manifest kind: {}", config.manifest.kind);
    println!(
        "  Resolver: {} concurrent segments, {}s probe timeout",
        config.resolver.concurrency, config.resolver.probe_timeout_secs
    );
    println!("  Key dir: {}", config.resolver.key_dir().display());

    for warning in config.validate() {
        println!("  ! {}", warning);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref());

    match cli.command {
        Commands::Produce {
            input,
            output_dir,
            mirrors,
            force,
        } => produce(&config, &input, &output_dir, mirrors, force),
        Commands::Resolve { key_out } => resolve(&config, key_out),
        Commands::CheckTools => check_tools(&config),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging on stderr; stdout carries manifests and playlists.
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mirrorcast=trace,mc_av=debug,mc_media=debug,mc_core=debug".to_string()
        } else {
            "mirrorcast=info,mc_av=info,mc_media=info,mc_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<mc_core::Error>()
                .map_or(1, mc_core::Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
