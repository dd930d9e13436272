use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use easel::{
    Align, Canvas, Color, Editor, ExportOptions, Font, FontVariant, MulticolorStyle, Point,
    ShapeStyle, Text, TextStyle,
};

#[derive(Parser, Debug)]
#[command(name = "easel", version)]
struct Cli {
    /// Log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a rank card with an XP progress bar.
    RankCard(RankCardArgs),
    /// Render a welcome banner for a new member.
    Welcome(WelcomeArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Avatar image: a file path or an http(s) URL. A placeholder is drawn when omitted.
    #[arg(long)]
    avatar: Option<String>,

    /// Output image path; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Open the result in the platform image viewer.
    #[arg(long)]
    show: bool,
}

#[derive(Parser, Debug)]
struct RankCardArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON file with `name`, `level`, `current_xp`, `next_level_xp`; overrides the flags.
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, default_value = "Guddi#9552")]
    name: String,

    #[arg(long, default_value_t = 8)]
    level: u32,

    #[arg(long, default_value_t = 605)]
    current_xp: u64,

    #[arg(long, default_value_t = 820)]
    next_level_xp: u64,
}

#[derive(Parser, Debug)]
struct WelcomeArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON file with `name` and `member`; overrides the flags.
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(long, default_value = "Guddi#9552")]
    name: String,

    /// Member number shown under the greeting.
    #[arg(long, default_value = "1638")]
    member: String,
}

#[derive(serde::Deserialize, Debug)]
struct RankData {
    name: String,
    level: u32,
    current_xp: u64,
    next_level_xp: u64,
}

#[derive(serde::Deserialize, Debug)]
struct WelcomeData {
    name: String,
    member: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("start tokio runtime")?;
    match cli.cmd {
        Command::RankCard(args) => rt.block_on(cmd_rank_card(args)),
        Command::Welcome(args) => rt.block_on(cmd_welcome(args)),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open data '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse data JSON '{}'", path.display()))
}

async fn load_avatar(source: Option<&str>, size: u32) -> anyhow::Result<Editor> {
    let mut avatar = match source {
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => Editor::from_url(s)
            .await
            .with_context(|| format!("fetch avatar '{s}'"))?,
        Some(s) => Editor::load(s)
            .await
            .with_context(|| format!("open avatar '{s}'"))?,
        None => Editor::new(&Canvas::new((size, size), Some(Color::rgb(88, 101, 242)))?)?,
    };
    avatar.resize((size, size), true).await?.circle_image().await?;
    Ok(avatar)
}

async fn finish(card: &Editor, common: &CommonArgs) -> anyhow::Result<()> {
    if let Some(parent) = common.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    card.save(&common.out, ExportOptions::default())
        .await
        .with_context(|| format!("write '{}'", common.out.display()))?;
    eprintln!("wrote {}", common.out.display());

    if common.show {
        card.show().await?;
    }
    Ok(())
}

fn hex(s: &str) -> anyhow::Result<Color> {
    s.parse::<Color>()
        .with_context(|| format!("parse color '{s}'"))
}

async fn cmd_rank_card(args: RankCardArgs) -> anyhow::Result<()> {
    let data = match &args.data {
        Some(path) => read_json::<RankData>(path)?,
        None => RankData {
            name: args.name.clone(),
            level: args.level,
            current_xp: args.current_xp,
            next_level_xp: args.next_level_xp,
        },
    };
    anyhow::ensure!(data.next_level_xp > 0, "next_level_xp must be > 0");

    let mut card = Editor::new(&Canvas::new((900, 300), Some(hex("#23272A")?))?)?;
    let avatar = load_avatar(args.common.avatar.as_deref(), 150).await?;

    let font_big = Font::dejavu_sans(FontVariant::Bold, 40)?;
    let font_small = Font::dejavu_sans(FontVariant::Italic, 30)?;

    let shape = [
        Point::new(600.0, 0.0),
        Point::new(750.0, 300.0),
        Point::new(900.0, 300.0),
        Point::new(900.0, 0.0),
    ];
    let accent = hex("#17F3F6")?;
    let stats = [
        Text::new("Level:", font_small.clone()).color(Color::WHITE),
        Text::new(format!("{}  ", data.level), font_small.clone()).color(accent),
        Text::new("XP:", font_small.clone()).color(Color::WHITE),
        Text::new(
            format!("{} / {}", data.current_xp, data.next_level_xp),
            font_small.clone(),
        )
        .color(accent),
    ];
    let percentage = (data.current_xp as f64 / data.next_level_xp as f64 * 100.0).min(100.0);

    card.polygon(&shape, ShapeStyle::default().fill(hex("#2C2F33")?))
        .await?
        .paste(&avatar, (30, 30))
        .await?
        .rectangle(
            (30.0, 220.0),
            650.0,
            40.0,
            ShapeStyle::default().color(hex("#494b4f")?).radius(20.0),
        )
        .await?
        .bar(
            (30.0, 220.0),
            650.0,
            40.0,
            percentage.floor(),
            ShapeStyle::default().color(hex("#3db374")?).radius(20.0),
        )
        .await?
        .text(
            (200.0, 40.0),
            &data.name,
            &font_big,
            TextStyle::default().color(Color::WHITE),
        )
        .await?
        .rectangle(
            (200.0, 100.0),
            350.0,
            2.0,
            ShapeStyle::default().color(accent),
        )
        .await?
        .multicolor_text((200.0, 130.0), &stats, MulticolorStyle::default())
        .await?;

    finish(&card, &args.common).await
}

async fn cmd_welcome(args: WelcomeArgs) -> anyhow::Result<()> {
    let data = match &args.data {
        Some(path) => read_json::<WelcomeData>(path)?,
        None => WelcomeData {
            name: args.name.clone(),
            member: args.member.clone(),
        },
    };

    let mut card = Editor::new(&Canvas::new((900, 280), Some(hex("#23272A")?))?)?;
    let avatar = load_avatar(args.common.avatar.as_deref(), 200).await?;

    let font_regular = Font::dejavu_sans(FontVariant::Italic, 30)?;
    let font_thin = Font::dejavu_sans(FontVariant::Light, 18)?;
    let font_medium = Font::dejavu_serif(FontVariant::Bold, 40)?;
    let font_big = Font::dejavu_serif(FontVariant::Bold, 50)?;

    let shape = [
        Point::new(0.0, 0.0),
        Point::new(0.0, 270.0),
        Point::new(330.0, 270.0),
        Point::new(260.0, 0.0),
    ];
    let white = TextStyle::default().color(Color::WHITE).align(Align::Center);
    let accent = TextStyle::default().color(hex("#5865f2")?).align(Align::Center);

    card.polygon(&shape, ShapeStyle::default().fill(hex("#2C2F33")?))
        .await?
        .paste(&avatar, (40, 35))
        .await?
        .ellipse(
            (40.0, 35.0),
            200.0,
            200.0,
            ShapeStyle::default().outline(Color::WHITE).stroke_width(3.0),
        )
        .await?
        .text((600.0, 20.0), "WELCOME", &font_big, white)
        .await?
        .text((600.0, 70.0), &data.name, &font_regular, accent)
        .await?
        .text((600.0, 130.0), "YOU ARE MEMBER", &font_medium, white)
        .await?
        .text((600.0, 175.0), &data.member, &font_regular, accent)
        .await?
        .text(
            (620.0, 245.0),
            "THANK YOU FOR JOINING. WE HOPE YOU LIKE IT!",
            &font_thin,
            white,
        )
        .await?;

    finish(&card, &args.common).await
}
