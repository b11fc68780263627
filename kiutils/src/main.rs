use clap::{Parser, Subcommand};
use kiutils_rs::convert::{
    convert_image_file, create_thumbnail, ConversionOptions, Fit, OutputFormat,
};
use kiutils_rs::rank_card::{BackgroundKind, BackgroundOptions, RankCardOptions, RankCardRenderer};
use kiutils_rs::sourcebin::BinClient;
use kiutils_rs::waifu::{NsfwCategory, SfwCategory, WaifuClient, WaifuKind};
use kiutils_rs::{random, utils, FontConfig, ImageSource, Result};
use log::info;
use std::path::PathBuf;

/// kiutils: Discord rank cards and small image utilities
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a rank card to a PNG file
    RankCard {
        /// Path to the PNG file to create
        #[clap(short, long)]
        output: PathBuf,

        /// JSON file with rank card options
        #[clap(short, long)]
        config: Option<PathBuf>,

        /// Avatar image path or URL, overriding the config
        #[clap(long)]
        avatar: Option<String>,

        /// Background image path or URL, overriding the config
        #[clap(long)]
        background: Option<String>,

        /// Additional directory to load fonts from
        #[clap(long)]
        font_dir: Vec<PathBuf>,
    },

    /// Convert an image to the format implied by the output extension
    Convert {
        #[clap(short, long)]
        input: PathBuf,

        #[clap(short, long)]
        output: PathBuf,

        /// Encoding quality between 1 and 100
        #[clap(short, long)]
        quality: Option<u8>,

        #[clap(long)]
        width: Option<u32>,

        #[clap(long)]
        height: Option<u32>,

        /// One of cover, contain, fill, inside, outside
        #[clap(long, default_value = "contain")]
        fit: String,
    },

    /// Write a thumbnail no larger than the given size
    Thumbnail {
        #[clap(short, long)]
        input: PathBuf,

        #[clap(short, long)]
        output: PathBuf,

        #[clap(short, long)]
        width: u32,

        #[clap(long)]
        height: Option<u32>,

        /// Output format. Defaults to the output file's extension
        #[clap(short, long)]
        format: Option<String>,
    },

    /// Print a random alphanumeric string
    RandString { length: usize },

    /// Print the URL of a random image from waifu.pics
    Waifu {
        #[clap(long)]
        nsfw: bool,

        #[clap(short, long)]
        category: Option<String>,

        #[clap(long)]
        api_url: Option<String>,
    },

    /// Upload a file to sourceb.in and print the link
    Bin {
        file: PathBuf,

        #[clap(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Args = Args::parse();

    if let Err(err) = run(args.command).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::RankCard {
            output,
            config,
            avatar,
            background,
            font_dir,
        } => {
            let mut options: RankCardOptions = match config {
                Some(path) => serde_json::from_slice(&utils::read(&path)?)?,
                None => RankCardOptions::default(),
            };
            if let Some(avatar) = avatar {
                options.avatar.get_or_insert_with(Default::default).source =
                    Some(ImageSource::from(avatar));
            }
            if let Some(background) = background {
                options.background = Some(BackgroundOptions {
                    kind: Some(BackgroundKind::Image),
                    image: Some(background),
                });
            }

            let renderer = RankCardRenderer::with_font_config(FontConfig {
                font_dirs: font_dir,
                ..FontConfig::default()
            });
            let png = renderer.render(options).await?;
            utils::write(&output, &png)?;
            info!("Wrote rank card to {}", output.display());
        }
        Command::Convert {
            input,
            output,
            quality,
            width,
            height,
            fit,
        } => {
            let options = ConversionOptions {
                quality,
                width,
                height,
                fit: fit.parse::<Fit>()?,
                ..Default::default()
            };
            convert_image_file(&input, &output, &options).await?;
        }
        Command::Thumbnail {
            input,
            output,
            width,
            height,
            format,
        } => {
            let format = match format {
                Some(format) => format.parse()?,
                None => OutputFormat::from_path(&output).unwrap_or(OutputFormat::Png),
            };
            let thumbnail = create_thumbnail(&input, width, height, format).await?;
            utils::write(&output, &thumbnail)?;
        }
        Command::RandString { length } => {
            utils::print(&random::rand_string(length)?);
        }
        Command::Waifu {
            nsfw,
            category,
            api_url,
        } => {
            let client = match api_url {
                Some(url) => WaifuClient::with_base_url(url),
                None => WaifuClient::new(),
            };
            let url = match (nsfw, category) {
                (false, Some(category)) => client.sfw(category.parse::<SfwCategory>()?).await?,
                (true, Some(category)) => client.nsfw(category.parse::<NsfwCategory>()?).await?,
                (false, None) => client.random(WaifuKind::Sfw).await?,
                (true, None) => client.random(WaifuKind::Nsfw).await?,
            };
            utils::print(&url);
        }
        Command::Bin { file, api_url } => {
            let code = String::from_utf8_lossy(&utils::read(&file)?).into_owned();
            let client = match api_url {
                Some(url) => BinClient::with_base_url(url),
                None => BinClient::new(),
            };
            utils::print(&client.upload(&code).await?);
        }
    }
    Ok(())
}
