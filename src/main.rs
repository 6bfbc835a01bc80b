use clap::{Args, Parser, Subcommand};
use promptpix::{
    logger::{self, LogLevel},
    Config, ImageFetcher, PageQuery, PollinationsClient, Preset, PromptToImageController,
    RequestState, SizeOption,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "promptpix")]
#[command(about = "Generate images from text prompts via Pollinations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a text prompt
    Generate(GenerateArgs),

    /// List the size presets
    Presets,

    /// Show the form state a share link restores
    Restore {
        /// Share link carrying q/h/w parameters
        link: String,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Size preset (tiktok, youtube, instagram, portrait, custom)
    #[arg(short, long, value_parser = parse_size_option)]
    preset: Option<SizeOption>,

    /// Custom image width in pixels (custom mode only)
    #[arg(long)]
    width: Option<u32>,

    /// Custom image height in pixels (custom mode only)
    #[arg(long)]
    height: Option<u32>,

    /// Save the image; defaults to the configured download directory
    #[arg(short, long, num_args = 0..=1)]
    download: Option<Option<PathBuf>>,

    /// Keep the result hidden, only report the outcome
    #[arg(long)]
    no_show: bool,
}

fn parse_size_option(value: &str) -> Result<SizeOption, String> {
    value.parse().map_err(|e: promptpix::ImageGenError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut logger_config = config.logger_config();
    if cli.verbose {
        logger_config = logger_config.with_level(LogLevel::Debug);
    }
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }
    logger::log_config_info(&config);

    match cli.command {
        Commands::Generate(args) => generate(args, &config, cli.json).await,
        Commands::Presets => {
            list_presets(cli.json);
            Ok(())
        }
        Commands::Restore { link } => restore(&link, &config, cli.json),
    }
}

async fn generate(
    args: GenerateArgs,
    config: &Config,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = PollinationsClient::new(config.service.clone());
    let mut controller = PromptToImageController::from_config(client, config);

    controller.set_prompt(args.prompt.clone());
    apply_size(&mut controller, &args)?;
    if args.no_show {
        controller.toggle_modal(false);
    }

    if let RequestState::Failed = controller.submit().await? {
        return Err("no image was generated".into());
    }

    let share_url = match &config.page_url {
        Some(base) => Some(controller.share_url(base)?),
        None => None,
    };

    let saved = match args.download {
        Some(dir) => {
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            Some(controller.download(&dir).await?)
        }
        None => None,
    };

    if json_output {
        let output = json!({
            "state": controller.state(),
            "size": controller.size(),
            "option": controller.active_option(),
            "share_url": share_url,
            "saved_to": saved,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if controller.is_modal_visible() {
        if let Some(url) = controller.image_url() {
            println!("{}", url);
        }
    } else {
        println!("Image generated ({})", controller.size());
    }
    if let Some(link) = share_url {
        println!("Share: {}", link);
    }
    if let Some(path) = saved {
        println!("Saved: {}", path.display());
    }
    Ok(())
}

/// Width/height only combine with `--preset custom` or no preset at all.
fn apply_size<F: ImageFetcher>(
    controller: &mut PromptToImageController<F>,
    args: &GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let has_dimensions = args.width.is_some() || args.height.is_some();

    match args.preset {
        Some(SizeOption::Preset(preset)) if has_dimensions => {
            return Err(format!(
                "--width/--height need a custom size, not the '{}' preset",
                preset
            )
            .into());
        }
        Some(option) => controller.select_option(option),
        None if has_dimensions => controller.select_custom(),
        None => {}
    }

    if let Some(width) = args.width {
        controller.set_custom_width(width)?;
    }
    if let Some(height) = args.height {
        controller.set_custom_height(height)?;
    }
    Ok(())
}

fn list_presets(json_output: bool) {
    if json_output {
        let presets: Vec<_> = Preset::ALL
            .iter()
            .map(|preset| json!({ "name": preset, "label": preset.label(), "size": preset.size() }))
            .collect();
        println!("{}", serde_json::Value::Array(presets));
        return;
    }

    for preset in Preset::ALL {
        println!("{:<10} {:<10} {}", preset.as_str(), preset.label(), preset.size());
    }
    println!("{:<10} {:<10} any width/height", "custom", "Custom");
}

fn restore(
    link: &str,
    config: &Config,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = PageQuery::from_url(link)?;
    let client = PollinationsClient::new(config.service.clone());
    let mut controller = PromptToImageController::from_config(client, config);
    controller.restore_from_query(&query);

    if json_output {
        let output = json!({
            "prompt": controller.prompt(),
            "size": controller.size(),
            "option": controller.active_option(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Prompt: {}", controller.prompt());
        println!("Size:   {} ({})", controller.size(), controller.active_option());
    }
    Ok(())
}
