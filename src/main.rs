#[cfg(not(any(feature = "stream", feature = "sequence")))]
fn main() {
    eprintln!(
        "The fruity-player CLI requires a playback backend. Rebuild with the default \"stream\"/\"sequence\" features."
    );
}

#[cfg(any(feature = "stream", feature = "sequence"))]
mod cli {
    use std::env;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use fruity_music::{
        create_player, write_pack, AppLifecycle, AssetPack, AssetSource, AudioConfig,
        BackendChoice, DirAssets,
    };

    const USAGE: &str = "\
fruity-player: looping music playback for Fruity Frank assets

Usage:
  fruity-player pack <asset-dir> <out.fpak>
  fruity-player play <assets> <track> [--backend stream|sequence|silent]
                     [--speed FACTOR] [--seconds SECS] [--config FILE]
  fruity-player render <assets> <track> <out.wav>
                     [--speed FACTOR] [--seconds SECS] [--config FILE]

<assets> is a pack file or a directory of loose assets. Tracks are logical
names without extension, e.g. \"level 1\".";

    /// Flags shared by the play and render commands.
    struct PlaybackArgs {
        assets: String,
        track: String,
        backend: Option<String>,
        speed: f32,
        seconds: f32,
        config: AudioConfig,
        extra: Vec<String>,
    }

    fn parse_playback_args(args: &[String]) -> Result<PlaybackArgs> {
        let mut positional = Vec::new();
        let mut backend = None;
        let mut speed = 1.0f32;
        let mut seconds = 10.0f32;
        let mut config = AudioConfig::default();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--backend" => {
                    backend = Some(
                        iter.next()
                            .context("--backend expects a backend name")?
                            .clone(),
                    );
                }
                "--speed" => {
                    speed = iter
                        .next()
                        .context("--speed expects a number")?
                        .parse()
                        .context("--speed expects a number")?;
                }
                "--seconds" => {
                    seconds = iter
                        .next()
                        .context("--seconds expects a number")?
                        .parse()
                        .context("--seconds expects a number")?;
                }
                "--config" => {
                    let path = iter.next().context("--config expects a file path")?;
                    config = AudioConfig::load(path)
                        .with_context(|| format!("Failed to load config '{path}'"))?;
                }
                other if other.starts_with("--") => bail!("Unknown flag '{other}'"),
                _ => positional.push(arg.clone()),
            }
        }

        if positional.len() < 2 {
            bail!("Expected <assets> and <track> arguments\n\n{USAGE}");
        }
        let assets = positional.remove(0);
        let track = positional.remove(0);

        Ok(PlaybackArgs {
            assets,
            track,
            backend,
            speed,
            seconds,
            config,
            extra: positional,
        })
    }

    fn open_assets(path: &str) -> Result<Arc<dyn AssetSource>> {
        let p = Path::new(path);
        if p.is_dir() {
            Ok(Arc::new(DirAssets::new(p)))
        } else {
            let pack =
                AssetPack::open(p).with_context(|| format!("Failed to open pack '{path}'"))?;
            Ok(Arc::new(pack))
        }
    }

    fn cmd_pack(args: &[String]) -> Result<()> {
        let [dir, out] = args else {
            bail!("Expected <asset-dir> and <out.fpak> arguments\n\n{USAGE}");
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read '{dir}'"))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let data = std::fs::read(entry.path())?;
            entries.push((name, data));
        }
        // Deterministic pack layout regardless of directory iteration order
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        if entries.is_empty() {
            bail!("No files found in '{dir}'");
        }

        write_pack(out, &entries)?;
        println!("Packed {} assets into {out}", entries.len());
        for (name, data) in &entries {
            println!("  {name} ({} bytes)", data.len());
        }
        Ok(())
    }

    fn cmd_play(args: &[String]) -> Result<()> {
        let args = parse_playback_args(args)?;
        if let Some(extra) = args.extra.first() {
            bail!("Unexpected argument '{extra}'\n\n{USAGE}");
        }

        let default_backend = if cfg!(feature = "sequence") {
            "sequence"
        } else {
            "stream"
        };
        let backend_name = args.backend.as_deref().unwrap_or(default_backend);
        let choice = BackendChoice::from_name(backend_name)
            .with_context(|| format!("Unknown backend '{backend_name}'"))?;

        let assets = open_assets(&args.assets)?;
        let mut lifecycle = AppLifecycle::new(create_player(choice, assets, &args.config));

        println!(
            "Playing '{}' at {:.2}x via {backend_name} backend for {:.1}s",
            args.track, args.speed, args.seconds
        );
        lifecycle.player().play(&args.track, args.speed);
        thread::sleep(Duration::from_secs_f32(args.seconds));
        lifecycle.shutdown();

        println!("Playback released");
        Ok(())
    }

    #[cfg(feature = "export-wav")]
    fn cmd_render(args: &[String]) -> Result<()> {
        use fruity_music::sequence::format::Sequence;

        let args = parse_playback_args(args)?;
        let [out] = args.extra.as_slice() else {
            bail!("Expected an <out.wav> argument\n\n{USAGE}");
        };

        let assets = open_assets(&args.assets)?;
        let (name, data) =
            fruity_music::assets::resolve_track(assets.as_ref(), &args.track, &[".seq"])?;
        let sequence = Sequence::parse(&data)?;

        println!(
            "Rendering '{name}' at {:.2}x to {out} ({:.1}s)",
            args.speed, args.seconds
        );
        fruity_music::export::render_wav(
            sequence,
            args.config.sample_rate,
            args.speed,
            args.seconds,
            out,
        )?;
        Ok(())
    }

    pub fn run() -> Result<()> {
        env_logger::init();

        let args: Vec<String> = env::args().skip(1).collect();
        let Some(command) = args.first() else {
            println!("{USAGE}");
            return Ok(());
        };

        match command.as_str() {
            "pack" => cmd_pack(&args[1..]),
            "play" => cmd_play(&args[1..]),
            #[cfg(feature = "export-wav")]
            "render" => cmd_render(&args[1..]),
            #[cfg(not(feature = "export-wav"))]
            "render" => {
                bail!("The render command requires the \"export-wav\" feature")
            }
            other => bail!("Unknown command '{other}'\n\n{USAGE}"),
        }
    }
}

#[cfg(any(feature = "stream", feature = "sequence"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}
